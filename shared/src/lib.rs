//! Shared types for the Insiders Club workspace
//!
//! Customer records, request payloads and auth DTOs used by the
//! tabular pipeline, the HTTP client and the console.

pub mod client;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    CustomerDraft, CustomerId, CustomerRecord, CustomerUpdate, DynamicFields, DynamicRecord,
    FixedFields, InsiderTier, SchemaKind,
};
pub use response::MessageResponse;
