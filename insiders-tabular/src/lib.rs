//! # insiders-tabular
//!
//! Tabular customer data: turning uploaded files and heterogeneous backend
//! rows into canonical [`CustomerRecord`]s, and back out to CSV / XLSX.
//!
//! ## Scope
//!
//! - Client-side CSV fallback parsing (quoted fields, `""` escapes, ragged rows)
//! - Field reconciliation: header normalization, synonym lookup, type coercion
//! - Export of the loaded table
//!
//! Nothing here touches the network. Parsing and reconciliation never fail;
//! bad cells fall back to defaults so the table is always populated.
//!
//! ## Example
//!
//! ```
//! use insiders_tabular::{parse_csv, Reconciler};
//!
//! let rows = parse_csv("ID,Name,Phone,Points\n1,Jane Doe,555-1234,150\n");
//! let records = Reconciler::new().reconcile_rows(&rows);
//! let jane = records[0].as_fixed().unwrap();
//! assert_eq!(jane.name, "Jane Doe");
//! assert_eq!(jane.earned_points, 150);
//! ```
//!
//! [`CustomerRecord`]: shared::CustomerRecord

mod coerce;
mod csv;
mod error;
mod export;
mod reconcile;

pub use coerce::{
    float_from_value, int_from_value, parse_float_or_default, parse_int_or_default,
    text_from_value, truthy,
};
pub use csv::{parse_csv, parse_csv_line};
pub use error::{TabularError, TabularResult};
pub use export::{Cell, ExportFormat, ExportTable, to_csv, to_xlsx};
pub use reconcile::{FieldLookup, Reconciler, canonical_column, normalize_key};

/// One raw input row: column name → untrusted JSON value, in column order
pub type RawRow = serde_json::Map<String, serde_json::Value>;
