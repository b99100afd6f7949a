//! Query-language strings for object queries.
//!
//! ```
//! use quickbooks_rs::query::{Condition, QueryObject, QueryRequest};
//! use time::macros::datetime;
//!
//! let request = QueryRequest::new(
//!     QueryObject::Invoice,
//!     Some(Condition::TxnDate {
//!         start: datetime!(2023-01-01 0:00),
//!         end: datetime!(2023-01-31 0:00),
//!     }),
//! );
//! assert_eq!(
//!     request.string_representation(),
//!     "SELECT * FROM Invoice WHERE TxnDate >= 2023-01-01T00:00:00 AND TxnDate <= 2023-01-31T00:00:00"
//! );
//! ```

use std::fmt;

use time::{Date, PrimitiveDateTime, Time};

use crate::utils::date_format::{beginning_of_month, end_of_month, query_datetime};

/// Filter applied to an object query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Transaction date between `start` and `end`, both inclusive. The bounds are local
    /// date-times in the company's timezone; no offset is sent.
    TxnDate {
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    },
}

impl Condition {
    /// Every transaction in the calendar month containing `date`.
    #[must_use]
    pub fn month_of(date: Date) -> Self {
        Self::TxnDate {
            start: PrimitiveDateTime::new(beginning_of_month(date), Time::MIDNIGHT),
            end: PrimitiveDateTime::new(end_of_month(date), Time::MIDNIGHT),
        }
    }

    #[must_use]
    pub fn query_string(&self) -> String {
        match self {
            Self::TxnDate { start, end } => format!(
                "TxnDate >= {} AND TxnDate <= {}",
                query_datetime(*start),
                query_datetime(*end)
            ),
        }
    }
}

/// Entity that can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryObject {
    Invoice,
    Bill,
    Purchase,
}

impl QueryObject {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::Bill => "Bill",
            Self::Purchase => "Purchase",
        }
    }
}

impl fmt::Display for QueryObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    object: QueryObject,
    condition: Option<Condition>,
}

impl QueryRequest {
    #[must_use]
    pub fn new(object: QueryObject, condition: Option<Condition>) -> Self {
        Self { object, condition }
    }

    #[must_use]
    pub fn object(&self) -> QueryObject {
        self.object
    }

    #[must_use]
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    #[must_use]
    pub fn string_representation(&self) -> String {
        let mut base = format!("SELECT * FROM {}", self.object);
        if let Some(condition) = &self.condition {
            base.push_str(" WHERE ");
            base.push_str(&condition.query_string());
        }
        base
    }
}

impl fmt::Display for QueryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_representation())
    }
}
