//! Data models
//!
//! Customer records in both backend shapes plus the payloads sent back.

pub mod customer;
pub mod dynamic;
pub mod id;
pub mod payload;
pub mod tier;

pub use customer::{
    CustomerRecord, DynamicRecord, FIXED_COLUMNS, FixedColumn, FixedFields, SchemaKind,
};
pub use dynamic::DynamicFields;
pub use id::CustomerId;
pub use payload::{CustomerDraft, CustomerUpdate, UPDATE_ALLOWED_FIELDS};
pub use tier::InsiderTier;
