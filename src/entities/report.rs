//! Financial report payloads.
//!
//! Reports come back as a header, an ordered list of columns and a tree of rows.
//! Section rows carry a header, a summary and nested rows; data rows carry only
//! their column values. [`Report`] keeps the tree and a flattened
//! title to value index built from the two-column summaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::utils::serde_helpers::null_as_default;

/// Marker appended between a summary value and its entity id.
const ID_SUFFIX: &str = "id: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowType {
    Section,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub title: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub row_type: RowType,
    /// Header column values joined by single spaces
    pub header: String,
    /// Summary column values, each followed by `id: <id>` when the column references an entity
    pub column_data: Vec<String>,
    pub subrows: Option<Vec<Row>>,
    pub title_value_dict: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub name: String,
    pub start_period: String,
    pub end_period: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub title_value_dict: BTreeMap<String, String>,
}

/// One title/value pair of a report summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiInfo {
    pub title: String,
    pub value: String,
}

// Wire layout. Any level may be absent or null; both map to the default.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawReport {
    #[serde(default, deserialize_with = "null_as_default")]
    header: RawReportHeader,
    #[serde(default, deserialize_with = "null_as_default")]
    columns: RawColumns,
    #[serde(default, deserialize_with = "null_as_default")]
    rows: RawRows,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawReportHeader {
    #[serde(default, deserialize_with = "null_as_default")]
    report_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    start_period: String,
    #[serde(default, deserialize_with = "null_as_default")]
    end_period: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawColumns {
    #[serde(default, deserialize_with = "null_as_default")]
    column: Vec<RawColumn>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawColumn {
    #[serde(default, deserialize_with = "null_as_default")]
    col_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    col_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRows {
    #[serde(default, deserialize_with = "null_as_default")]
    row: Option<Vec<RawRow>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRow {
    #[serde(rename = "type")]
    row_type: RowType,
    #[serde(default, deserialize_with = "null_as_default")]
    header: RawColData,
    #[serde(default, deserialize_with = "null_as_default")]
    summary: RawColData,
    #[serde(default, deserialize_with = "null_as_default")]
    rows: Option<RawRows>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawColData {
    #[serde(default, deserialize_with = "null_as_default")]
    col_data: Vec<RawCell>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCell {
    #[serde(default, deserialize_with = "null_as_default")]
    value: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    id: Value,
}

/// Renders a scalar cell value the way the API means it; anything else is empty.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl From<RawRow> for Row {
    fn from(raw: RawRow) -> Self {
        let column_data: Vec<String> = raw
            .summary
            .col_data
            .iter()
            .map(|cell| {
                let mut data = scalar_string(&cell.value).unwrap_or_default();
                if let Some(id) = scalar_string(&cell.id) {
                    data.push_str(ID_SUFFIX);
                    data.push_str(&id);
                }
                data
            })
            .collect();

        let mut title_value_dict = BTreeMap::new();
        if let [title, value] = column_data.as_slice() {
            title_value_dict.insert(title.clone(), value.clone());
        }

        let header = raw
            .header
            .col_data
            .iter()
            .map(|cell| scalar_string(&cell.value).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" ");

        // A nested `Rows` object without a `Row` array is treated as no subrows.
        let subrows = raw
            .rows
            .and_then(|rows| rows.row)
            .map(|rows| rows.into_iter().map(Row::from).collect());

        Self {
            row_type: raw.row_type,
            header,
            column_data,
            subrows,
            title_value_dict,
        }
    }
}

impl Report {
    /// Maps a report payload. Fails when a row carries no valid `type`.
    pub fn from_json(payload: Value) -> Result<Self> {
        let raw = RawReport::deserialize(&payload).map_err(|e| {
            error!("Failed to map report: {}", e);
            Error::deserialization(e, "Report", Some(payload.to_string()))
        })?;

        let rows: Vec<Row> = raw.rows.row.unwrap_or_default().into_iter().map(Row::from).collect();
        let mut title_value_dict = BTreeMap::new();
        fill_title_values(&mut title_value_dict, &rows);

        debug!(
            name = %raw.header.report_name,
            rows = rows.len(),
            titles = title_value_dict.len(),
            "mapped report"
        );

        Ok(Self {
            name: raw.header.report_name,
            start_period: raw.header.start_period,
            end_period: raw.header.end_period,
            columns: raw
                .columns
                .column
                .into_iter()
                .map(|c| Column {
                    title: c.col_title,
                    column_type: c.col_type,
                })
                .collect(),
            rows,
            title_value_dict,
        })
    }

    #[must_use]
    pub fn kpis(&self) -> Vec<KpiInfo> {
        self.title_value_dict
            .iter()
            .map(|(title, value)| KpiInfo {
                title: title.clone(),
                value: value.clone(),
            })
            .collect()
    }
}

impl TryFrom<Value> for Report {
    type Error = Error;

    fn try_from(payload: Value) -> Result<Self> {
        Self::from_json(payload)
    }
}

/// Pre-order merge of row summaries. Stops at the first row of a level that has
/// no subrows; later siblings at that level are not visited.
fn fill_title_values(dict: &mut BTreeMap<String, String>, rows: &[Row]) {
    for row in rows {
        let Some(subrows) = &row.subrows else {
            break;
        };
        dict.extend(row.title_value_dict.iter().map(|(k, v)| (k.clone(), v.clone())));
        fill_title_values(dict, subrows);
    }
}
