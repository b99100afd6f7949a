use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{Transaction, TransactionDate},
    query::QueryObject,
    utils::serde_helpers::id_from_string_or_number,
};

/// An expense, check or credit card purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Purchase {
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub id: u64,
    #[serde(default)]
    pub total_amt: Decimal,
    pub txn_date: TransactionDate,
}

impl Transaction for Purchase {
    const OBJECT: QueryObject = QueryObject::Purchase;

    fn id(&self) -> u64 {
        self.id
    }

    fn total_amt(&self) -> Decimal {
        self.total_amt
    }

    fn txn_date(&self) -> &TransactionDate {
        &self.txn_date
    }
}
