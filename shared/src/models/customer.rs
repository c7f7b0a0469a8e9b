//! Customer Model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{CustomerId, DynamicFields, InsiderTier};

/// Which record shape a backend revision speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// Fixed canonical fields (`name`, `earnedPoints`, ...)
    Fixed,
    /// Open `dynamicFields` mapping
    Dynamic,
}

/// Canonical column of a fixed-schema record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedColumn {
    Id,
    DisplayId,
    Name,
    Phone,
    Email,
    CurrentRank,
    InternalLoyaltyCustomerId,
    SignUpDate,
    LastPurchaseDate,
    StartDate,
    EndDate,
    EarnedPoints,
    TotalVisits,
    TotalSpend,
    IsEmployee,
}

/// Column order used for display and export
pub const FIXED_COLUMNS: &[FixedColumn] = &[
    FixedColumn::Id,
    FixedColumn::DisplayId,
    FixedColumn::Name,
    FixedColumn::Phone,
    FixedColumn::Email,
    FixedColumn::CurrentRank,
    FixedColumn::InternalLoyaltyCustomerId,
    FixedColumn::SignUpDate,
    FixedColumn::LastPurchaseDate,
    FixedColumn::StartDate,
    FixedColumn::EndDate,
    FixedColumn::EarnedPoints,
    FixedColumn::TotalVisits,
    FixedColumn::TotalSpend,
    FixedColumn::IsEmployee,
];

impl FixedColumn {
    /// JSON key used on the wire
    pub fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::DisplayId => "displayId",
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::CurrentRank => "currentRank",
            Self::InternalLoyaltyCustomerId => "internalLoyaltyCustomerId",
            Self::SignUpDate => "signUpDate",
            Self::LastPurchaseDate => "lastPurchaseDate",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
            Self::EarnedPoints => "earnedPoints",
            Self::TotalVisits => "totalVisits",
            Self::TotalSpend => "totalSpend",
            Self::IsEmployee => "isEmployee",
        }
    }

    /// Human-readable header
    pub fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::DisplayId => "Display ID",
            Self::Name => "Name",
            Self::Phone => "Phone",
            Self::Email => "Email",
            Self::CurrentRank => "Current Rank",
            Self::InternalLoyaltyCustomerId => "Internal Loyalty Customer ID",
            Self::SignUpDate => "Sign Up Date",
            Self::LastPurchaseDate => "Last Purchase Date",
            Self::StartDate => "Start Date",
            Self::EndDate => "End Date",
            Self::EarnedPoints => "Earned Points",
            Self::TotalVisits => "Total Visits",
            Self::TotalSpend => "Total Spend",
            Self::IsEmployee => "Is Employee",
        }
    }

    pub fn is_date(self) -> bool {
        matches!(
            self,
            Self::SignUpDate | Self::LastPurchaseDate | Self::StartDate | Self::EndDate
        )
    }
}

/// Fixed-schema customer entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedFields {
    pub id: CustomerId,
    #[serde(default)]
    pub display_id: String,
    #[serde(default)]
    pub current_rank: String,
    #[serde(default)]
    pub internal_loyalty_customer_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub sign_up_date: String,
    #[serde(default)]
    pub last_purchase_date: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub earned_points: u64,
    #[serde(default)]
    pub total_visits: u64,
    #[serde(default)]
    pub total_spend: f64,
    #[serde(default)]
    pub is_employee: bool,
}

impl FixedFields {
    /// Empty record carrying only an id, every metric at its default
    pub fn new(id: CustomerId) -> Self {
        Self {
            id,
            display_id: String::new(),
            current_rank: String::new(),
            internal_loyalty_customer_id: String::new(),
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            sign_up_date: String::new(),
            last_purchase_date: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            earned_points: 0,
            total_visits: 0,
            total_spend: 0.0,
            is_employee: false,
        }
    }

    /// Raw (undecorated) cell text for a column
    pub fn column_text(&self, column: FixedColumn) -> String {
        match column {
            FixedColumn::Id => self.id.to_string(),
            FixedColumn::DisplayId => self.display_id.clone(),
            FixedColumn::Name => self.name.clone(),
            FixedColumn::Phone => self.phone.clone(),
            FixedColumn::Email => self.email.clone(),
            FixedColumn::CurrentRank => self.current_rank.clone(),
            FixedColumn::InternalLoyaltyCustomerId => self.internal_loyalty_customer_id.clone(),
            FixedColumn::SignUpDate => self.sign_up_date.clone(),
            FixedColumn::LastPurchaseDate => self.last_purchase_date.clone(),
            FixedColumn::StartDate => self.start_date.clone(),
            FixedColumn::EndDate => self.end_date.clone(),
            FixedColumn::EarnedPoints => self.earned_points.to_string(),
            FixedColumn::TotalVisits => self.total_visits.to_string(),
            FixedColumn::TotalSpend => self.total_spend.to_string(),
            FixedColumn::IsEmployee => self.is_employee.to_string(),
        }
    }

    pub fn tier(&self) -> InsiderTier {
        InsiderTier::for_points(self.earned_points)
    }
}

/// Dynamic-schema customer entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRecord {
    pub id: CustomerId,
    pub dynamic_fields: DynamicFields,
}

/// Canonical customer record, one of the two backend shapes
///
/// The shapes never mix: a backend revision returns one or the other.
/// `Dynamic` is listed first so untagged deserialization only picks it
/// when a `dynamicFields` object is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerRecord {
    Dynamic(DynamicRecord),
    Fixed(FixedFields),
}

impl CustomerRecord {
    pub fn id(&self) -> &CustomerId {
        match self {
            Self::Fixed(f) => &f.id,
            Self::Dynamic(d) => &d.id,
        }
    }

    pub fn set_id(&mut self, id: CustomerId) {
        match self {
            Self::Fixed(f) => f.id = id,
            Self::Dynamic(d) => d.id = id,
        }
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::Fixed(_) => SchemaKind::Fixed,
            Self::Dynamic(_) => SchemaKind::Dynamic,
        }
    }

    pub fn as_fixed(&self) -> Option<&FixedFields> {
        match self {
            Self::Fixed(f) => Some(f),
            Self::Dynamic(_) => None,
        }
    }

    pub fn as_dynamic(&self) -> Option<&DynamicRecord> {
        match self {
            Self::Dynamic(d) => Some(d),
            Self::Fixed(_) => None,
        }
    }

    /// Best display name: the fixed `name`, or a dynamic column called "name"
    pub fn display_name(&self) -> String {
        match self {
            Self::Fixed(f) => f.name.clone(),
            Self::Dynamic(d) => d
                .dynamic_fields
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("name"))
                .map(|(_, v)| v.to_string())
                .unwrap_or_default(),
        }
    }

    /// JSON object form, keyed by canonical names
    pub fn to_row(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

impl From<FixedFields> for CustomerRecord {
    fn from(value: FixedFields) -> Self {
        Self::Fixed(value)
    }
}

impl From<DynamicRecord> for CustomerRecord {
    fn from(value: DynamicRecord) -> Self {
        Self::Dynamic(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_serializes_camel_case() {
        let mut f = FixedFields::new(CustomerId::Int(1));
        f.name = "Jane".into();
        f.earned_points = 150;
        let row = CustomerRecord::from(f).to_row();
        assert_eq!(row["name"], json!("Jane"));
        assert_eq!(row["earnedPoints"], json!(150));
        assert_eq!(row["isEmployee"], json!(false));
        assert!(row.contains_key("internalLoyaltyCustomerId"));
    }

    #[test]
    fn test_untagged_picks_dynamic_only_with_fields() {
        let dynamic: CustomerRecord =
            serde_json::from_value(json!({"id": 3, "dynamicFields": {"Name": "Al"}})).unwrap();
        assert_eq!(dynamic.kind(), SchemaKind::Dynamic);
        assert_eq!(dynamic.display_name(), "Al");

        let fixed: CustomerRecord =
            serde_json::from_value(json!({"id": "a", "name": "Bo", "earnedPoints": 5})).unwrap();
        assert_eq!(fixed.kind(), SchemaKind::Fixed);
        assert_eq!(fixed.as_fixed().unwrap().earned_points, 5);
    }

    #[test]
    fn test_date_columns() {
        let dates: Vec<&str> = FIXED_COLUMNS
            .iter()
            .filter(|c| c.is_date())
            .map(|c| c.key())
            .collect();
        assert_eq!(
            dates,
            vec!["signUpDate", "lastPurchaseDate", "startDate", "endDate"]
        );
    }
}
