//! `--set column=value` assignments applied to customer records
//!
//! Fixed records route every assignment through the same synonym table the
//! upload path uses, so `--set "Phone No=555"` edits `phone`. Dynamic
//! records take the column name verbatim.

use insiders_tabular::{RawRow, Reconciler, canonical_column};
use serde_json::Value;
use shared::models::SchemaKind;
use shared::{CustomerId, CustomerRecord, DynamicRecord, FixedFields};
use tracing::warn;

/// New record built from assignments only
pub fn draft_record(schema: SchemaKind, fields: &[(String, String)]) -> CustomerRecord {
    let blank = match schema {
        SchemaKind::Fixed => CustomerRecord::Fixed(FixedFields::new(CustomerId::Int(0))),
        SchemaKind::Dynamic => CustomerRecord::Dynamic(DynamicRecord {
            id: CustomerId::Int(0),
            dynamic_fields: Default::default(),
        }),
    };
    apply(&blank, fields)
}

/// Copy of `record` with the assignments applied
pub fn apply(record: &CustomerRecord, fields: &[(String, String)]) -> CustomerRecord {
    match record {
        CustomerRecord::Dynamic(d) => {
            let mut edited = d.clone();
            for (key, value) in fields {
                edited.dynamic_fields.insert(key.as_str(), value.as_str());
            }
            edited.into()
        }
        CustomerRecord::Fixed(_) => {
            let mut row: RawRow = record.to_row();
            for (key, value) in fields {
                match canonical_column(key) {
                    Some(column) => {
                        row.insert(column.key().to_string(), Value::String(value.clone()));
                    }
                    None => warn!(column = %key, "Ignoring unknown column"),
                }
            }
            let mut edited = Reconciler::with_schema(SchemaKind::Fixed).reconcile_row(&row, 0);
            edited.set_id(record.id().clone());
            edited
        }
    }
}
