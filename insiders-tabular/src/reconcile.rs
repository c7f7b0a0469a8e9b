//! Field reconciliation
//!
//! Maps rows with arbitrary column names (`"Phone No"`, `cus_name`,
//! `PointsEarned`, ...) onto the canonical customer shape.

use std::collections::HashMap;

use serde_json::Value;
use shared::models::{FIXED_COLUMNS, FixedColumn, SchemaKind};
use shared::{CustomerId, CustomerRecord, DynamicFields, DynamicRecord, FixedFields};
use tracing::debug;

use crate::RawRow;
use crate::coerce::{float_from_value, int_from_value, text_from_value, truthy};

/// Key under which dynamic-schema backends nest their columns
const DYNAMIC_FIELDS_KEY: &str = "dynamicFields";

/// Normalized synonyms of the id column
const ID_SYNONYMS: &[&str] = &["id", "customerid", "cusid"];

/// Lookup key: lower-cased with spaces, underscores and hyphens removed.
///
/// `"Phone No"`, `"phone_no"` and `"PhoneNo"` all become `"phoneno"`.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalized column names accepted for each canonical field, most specific first
fn synonyms(column: FixedColumn) -> &'static [&'static str] {
    match column {
        FixedColumn::Id => ID_SYNONYMS,
        FixedColumn::DisplayId => &["displayid", "displaycustomerid"],
        FixedColumn::Name => &["name", "cusname", "username", "customername", "fullname"],
        FixedColumn::Phone => &[
            "phone",
            "phoneno",
            "phonenumber",
            "mobile",
            "mobileno",
            "mobilenumber",
        ],
        FixedColumn::Email => &["email", "emailaddress", "mail"],
        FixedColumn::CurrentRank => &["currentrank", "rank"],
        FixedColumn::InternalLoyaltyCustomerId => &[
            "internalloyaltycustomerid",
            "loyaltycustomerid",
            "loyaltyid",
        ],
        FixedColumn::SignUpDate => &["signupdate", "signedup", "joindate", "joined"],
        FixedColumn::LastPurchaseDate => &["lastpurchasedate", "lastpurchase"],
        FixedColumn::StartDate => &["startdate"],
        FixedColumn::EndDate => &["enddate"],
        FixedColumn::EarnedPoints => &["earnedpoints", "points", "pointsearned"],
        FixedColumn::TotalVisits => &["totalvisits", "visits", "visitcount"],
        FixedColumn::TotalSpend => &["totalspend", "totalspent", "spend", "amountspent"],
        FixedColumn::IsEmployee => &["isemployee", "employee"],
    }
}

/// Canonical column a free-form column name maps to, if any
pub fn canonical_column(key: &str) -> Option<FixedColumn> {
    let normalized = normalize_key(key);
    FIXED_COLUMNS
        .iter()
        .copied()
        .find(|column| synonyms(*column).contains(&normalized.as_str()))
}

/// A value counts as present unless it is null or a blank string
fn present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Case/spacing-insensitive view of one raw row
#[derive(Debug)]
pub struct FieldLookup<'a> {
    row: &'a RawRow,
    normalized: HashMap<String, &'a Value>,
}

impl<'a> FieldLookup<'a> {
    pub fn new(row: &'a RawRow) -> Self {
        let mut normalized = HashMap::with_capacity(row.len());
        for (key, value) in row {
            // First column wins when two headers normalize the same way
            normalized.entry(normalize_key(key)).or_insert(value);
        }
        Self { row, normalized }
    }

    /// Exact key first, then each normalized synonym in order.
    pub fn find(&self, exact: &str, synonyms: &[&str]) -> Option<&'a Value> {
        if let Some(value) = self.row.get(exact).filter(|v| present(v)) {
            return Some(value);
        }
        synonyms
            .iter()
            .filter_map(|s| self.normalized.get(*s).copied())
            .find(|v| present(v))
    }

    fn column(&self, column: FixedColumn) -> Option<&'a Value> {
        self.find(column.key(), synonyms(column))
    }

    fn text(&self, column: FixedColumn) -> String {
        text_from_value(self.column(column))
    }

    /// Whether a normalized key names the id column
    fn is_id_key(key: &str) -> bool {
        ID_SYNONYMS.contains(&normalize_key(key).as_str())
    }
}

/// Maps raw rows onto [`CustomerRecord`]s
///
/// With no schema set, a row carrying a `dynamicFields` object becomes a
/// dynamic record and anything else a fixed one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    schema: Option<SchemaKind>,
}

impl Reconciler {
    /// Detect the shape per row
    pub fn new() -> Self {
        Self::default()
    }

    /// Force every row into one shape
    pub fn with_schema(schema: SchemaKind) -> Self {
        Self {
            schema: Some(schema),
        }
    }

    /// Reconcile a batch, assigning 1-based ordinals as placeholder ids
    pub fn reconcile_rows(&self, rows: &[RawRow]) -> Vec<CustomerRecord> {
        let records: Vec<CustomerRecord> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| self.reconcile_row(row, i + 1))
            .collect();
        debug!(rows = records.len(), "Reconciled batch");
        records
    }

    /// Reconcile one row. `ordinal` becomes the id when the row has none.
    pub fn reconcile_row(&self, row: &RawRow, ordinal: usize) -> CustomerRecord {
        let lookup = FieldLookup::new(row);
        let id = lookup
            .column(FixedColumn::Id)
            .and_then(CustomerId::from_value)
            .unwrap_or_else(|| CustomerId::placeholder(ordinal));

        let nested = lookup
            .find(DYNAMIC_FIELDS_KEY, &["dynamicfields"])
            .filter(|v| v.is_object());

        let kind = self.schema.unwrap_or(if nested.is_some() {
            SchemaKind::Dynamic
        } else {
            SchemaKind::Fixed
        });

        match kind {
            SchemaKind::Fixed => CustomerRecord::Fixed(Self::fixed(&lookup, id)),
            SchemaKind::Dynamic => {
                let dynamic_fields = match nested {
                    Some(Value::Object(map)) => map
                        .iter()
                        .map(|(k, v)| (k.clone(), text_from_value(Some(v))))
                        .collect(),
                    _ => Self::flat_dynamic(row),
                };
                CustomerRecord::Dynamic(DynamicRecord { id, dynamic_fields })
            }
        }
    }

    fn fixed(lookup: &FieldLookup<'_>, id: CustomerId) -> FixedFields {
        let name = match lookup.column(FixedColumn::Name) {
            Some(value) => text_from_value(Some(value)),
            None => {
                let first = text_from_value(lookup.find("firstName", &["firstname"]));
                let last = text_from_value(lookup.find("lastName", &["lastname"]));
                format!("{} {}", first.trim(), last.trim()).trim().to_string()
            }
        };

        FixedFields {
            id,
            display_id: lookup.text(FixedColumn::DisplayId),
            current_rank: lookup.text(FixedColumn::CurrentRank),
            internal_loyalty_customer_id: lookup.text(FixedColumn::InternalLoyaltyCustomerId),
            name,
            phone: lookup.text(FixedColumn::Phone),
            email: lookup.text(FixedColumn::Email),
            sign_up_date: lookup.text(FixedColumn::SignUpDate),
            last_purchase_date: lookup.text(FixedColumn::LastPurchaseDate),
            start_date: lookup.text(FixedColumn::StartDate),
            end_date: lookup.text(FixedColumn::EndDate),
            earned_points: int_from_value(lookup.column(FixedColumn::EarnedPoints)),
            total_visits: int_from_value(lookup.column(FixedColumn::TotalVisits)),
            total_spend: float_from_value(lookup.column(FixedColumn::TotalSpend)),
            is_employee: truthy(lookup.column(FixedColumn::IsEmployee)),
        }
    }

    /// A flat row forced into the dynamic shape: every column but the id
    fn flat_dynamic(row: &RawRow) -> DynamicFields {
        row.iter()
            .filter(|(k, _)| !FieldLookup::is_id_key(k))
            .map(|(k, v)| (k.clone(), text_from_value(Some(v))))
            .collect()
    }
}
