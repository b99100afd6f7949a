use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{Reference, Transaction, TransactionDate},
    query::QueryObject,
    utils::serde_helpers::id_from_string_or_number,
};

/// A sales invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Invoice {
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub id: u64,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default)]
    pub total_amt: Decimal,
    #[serde(default)]
    pub doc_number: String,
    #[serde(default)]
    pub customer_ref: Reference,
    pub txn_date: TransactionDate,
    /// Absent on invoices without payment terms
    #[serde(default)]
    pub due_date: Option<TransactionDate>,
}

impl Invoice {
    #[must_use]
    pub fn customer_name(&self) -> &str {
        &self.customer_ref.name
    }
}

impl Transaction for Invoice {
    const OBJECT: QueryObject = QueryObject::Invoice;

    fn id(&self) -> u64 {
        self.id
    }

    fn total_amt(&self) -> Decimal {
        self.total_amt
    }

    fn txn_date(&self) -> &TransactionDate {
        &self.txn_date
    }

    fn due_date(&self) -> Option<&TransactionDate> {
        self.due_date.as_ref()
    }
}
