//! Create / update payloads

use serde::{Deserialize, Serialize};

use super::{CustomerRecord, DynamicFields};

/// Keys the backend accepts on `PUT /customers/{id}`
pub const UPDATE_ALLOWED_FIELDS: &[&str] = &[
    "name",
    "email",
    "phone",
    "password",
    "isEmployee",
    "displayId",
    "startDate",
    "endDate",
    "earnedPoints",
    "totalVisits",
    "totalSpend",
    "lastPurchaseDate",
    "internalLoyaltyCustomerId",
    "signUpDate",
    "currentRank",
];

/// Update customer payload
///
/// Only allow-listed fields exist here; `None` fields are left out of the
/// JSON body entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_employee: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earned_points: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_visits: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_spend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_purchase_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_loyalty_customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_up_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_rank: Option<String>,
    /// Dynamic-schema backends take the whole mapping back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_fields: Option<DynamicFields>,
}

impl CustomerUpdate {
    /// Full update carrying every field of a record (the id travels in the path)
    pub fn from_record(record: &CustomerRecord) -> Self {
        match record {
            CustomerRecord::Fixed(f) => Self {
                name: Some(f.name.clone()),
                email: Some(f.email.clone()),
                phone: Some(f.phone.clone()),
                password: None,
                is_employee: Some(f.is_employee),
                display_id: Some(f.display_id.clone()),
                start_date: Some(f.start_date.clone()),
                end_date: Some(f.end_date.clone()),
                earned_points: Some(f.earned_points),
                total_visits: Some(f.total_visits),
                total_spend: Some(f.total_spend),
                last_purchase_date: Some(f.last_purchase_date.clone()),
                internal_loyalty_customer_id: Some(f.internal_loyalty_customer_id.clone()),
                sign_up_date: Some(f.sign_up_date.clone()),
                current_rank: Some(f.current_rank.clone()),
                dynamic_fields: None,
            },
            CustomerRecord::Dynamic(d) => Self {
                dynamic_fields: Some(d.dynamic_fields.clone()),
                ..Self::default()
            },
        }
    }

    /// Attach a new password; blank passwords are never sent
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password.filter(|p| !p.is_empty());
        self
    }
}

/// Create customer payload (admin "add customer")
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDraft {
    /// Field values; the id is ignored by the backend and replaced on create
    pub record: CustomerRecord,
    pub password: Option<String>,
}

impl CustomerDraft {
    pub fn new(record: CustomerRecord) -> Self {
        Self {
            record,
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}
