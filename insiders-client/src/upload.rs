//! Upload response-shape detection
//!
//! The upload endpoint has answered with a different envelope in every
//! backend revision. Each known envelope is an extractor; they are tried
//! in order and the first one that yields a non-empty list of row objects
//! wins.

use serde_json::Value;
use shared::CustomerRecord;
use tracing::debug;

use insiders_tabular::RawRow;

/// Which envelope the rows were found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{ "data": [...] }`
    Data,
    /// `[...]`
    BareArray,
    /// `{ "customers": [...] }`
    Customers,
    /// `{ "result": [...] }`
    Result,
    /// `{ "rows": [...] }`
    Rows,
    /// `{ "body": [...] }`
    Body,
    /// First top-level array of record-like objects, under this key
    Scanned(String),
}

/// Where the uploaded rows came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSource {
    /// Structured rows in the backend response
    Backend(ResponseShape),
    /// The backend gave nothing usable; the file was parsed locally
    ClientFallback,
}

/// Result of a successful upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub records: Vec<CustomerRecord>,
    pub source: RowSource,
    /// `message` from the backend response, when it sent one
    pub message: Option<String>,
}

type Extractor = fn(&Value) -> Option<(ResponseShape, Vec<RawRow>)>;

/// Extractors in priority order
const EXTRACTORS: &[Extractor] = &[
    data,
    bare_array,
    customers,
    result,
    rows,
    body,
    scan_top_level,
];

fn data(v: &Value) -> Option<(ResponseShape, Vec<RawRow>)> {
    keyed(v, "data").map(|rows| (ResponseShape::Data, rows))
}

fn bare_array(v: &Value) -> Option<(ResponseShape, Vec<RawRow>)> {
    object_rows(v).map(|rows| (ResponseShape::BareArray, rows))
}

fn customers(v: &Value) -> Option<(ResponseShape, Vec<RawRow>)> {
    keyed(v, "customers").map(|rows| (ResponseShape::Customers, rows))
}

fn result(v: &Value) -> Option<(ResponseShape, Vec<RawRow>)> {
    keyed(v, "result").map(|rows| (ResponseShape::Result, rows))
}

fn rows(v: &Value) -> Option<(ResponseShape, Vec<RawRow>)> {
    keyed(v, "rows").map(|rows| (ResponseShape::Rows, rows))
}

fn body(v: &Value) -> Option<(ResponseShape, Vec<RawRow>)> {
    keyed(v, "body").map(|rows| (ResponseShape::Body, rows))
}

/// Object elements of a JSON array, `None` unless there is at least one
fn object_rows(value: &Value) -> Option<Vec<RawRow>> {
    let rows: Vec<RawRow> = value
        .as_array()?
        .iter()
        .filter_map(|item| item.as_object().cloned())
        .collect();
    (!rows.is_empty()).then_some(rows)
}

fn keyed(value: &Value, key: &str) -> Option<Vec<RawRow>> {
    object_rows(value.as_object()?.get(key)?)
}

/// Whether a value looks like a customer record
fn record_like(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|o| ["id", "email", "name"].iter().any(|k| o.contains_key(*k)))
}

fn scan_top_level(value: &Value) -> Option<(ResponseShape, Vec<RawRow>)> {
    value.as_object()?.iter().find_map(|(key, v)| {
        let first = v.as_array()?.first()?;
        if !record_like(first) {
            return None;
        }
        object_rows(v).map(|rows| (ResponseShape::Scanned(key.clone()), rows))
    })
}

/// Run the extractor chain over an upload response
pub fn extract_rows(response: &Value) -> Option<(ResponseShape, Vec<RawRow>)> {
    let found = EXTRACTORS.iter().find_map(|extract| extract(response));
    if let Some((shape, rows)) = &found {
        debug!(?shape, rows = rows.len(), "Upload response shape detected");
    }
    found
}
