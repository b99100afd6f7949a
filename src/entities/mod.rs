use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned};
use serde_json::Value;
use time::Date;

use crate::error::{Error, Result};
use crate::query::QueryObject;
use crate::utils::date_format::{parse_qb_date, pretty_date};

pub mod bill;
pub mod invoice;
pub mod purchase;
pub mod report;

/// A `yyyy-MM-dd` date as sent by the API, kept together with its parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDate {
    raw: String,
    date: Date,
}

impl TransactionDate {
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        Ok(Self {
            raw: raw.to_string(),
            date: parse_qb_date(raw)?,
        })
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// `dd/MM/yyyy`
    #[must_use]
    pub fn pretty(&self) -> String {
        pretty_date(self.date)
    }
}

impl fmt::Display for TransactionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for TransactionDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl Serialize for TransactionDate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

/// A reference to another entity, e.g. `CustomerRef`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub name: String,
}

/// Fields shared by every queryable transaction record.
pub trait Transaction: DeserializeOwned {
    /// The object name used in queries and as the `QueryResponse` key.
    const OBJECT: QueryObject;

    fn id(&self) -> u64;
    fn total_amt(&self) -> Decimal;
    fn txn_date(&self) -> &TransactionDate;

    fn due_date(&self) -> Option<&TransactionDate> {
        None
    }

    fn txn_date_string(&self) -> &str {
        self.txn_date().raw()
    }

    fn due_date_string(&self) -> Option<&str> {
        self.due_date().map(TransactionDate::raw)
    }

    fn pretty_date_string(&self) -> String {
        self.txn_date().pretty()
    }
}

/// Maps the `QueryResponse.<Object>` array of a query payload. A missing key, as
/// returned when nothing matches, yields an empty vector.
pub fn from_query_response<T: Transaction>(mut payload: Value) -> Result<Vec<T>> {
    let object = T::OBJECT.as_str();
    let items = match payload
        .get_mut("QueryResponse")
        .and_then(|response| response.get_mut(object))
        .map(Value::take)
    {
        Some(Value::Array(items)) => items,
        _ => {
            debug!("query response has no {object} entries");
            return Ok(Vec::new());
        }
    };

    items
        .iter()
        .map(|item| {
            T::deserialize(item).map_err(|e| {
                error!("Failed to map {}: {}", object, e);
                Error::deserialization(e, object, Some(item.to_string()))
            })
        })
        .collect()
}
