//! Insiders Client - HTTP client for the Insiders Club backend
//!
//! Provides the credential flows, customer CRUD and the CSV upload
//! pipeline (upload → response-shape detection → client-side fallback
//! parse → reconciliation) on top of `reqwest`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod table;
pub mod upload;

pub use client::InsidersClient;
pub use config::{AuthEncoding, BackendProfile, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use http::{ApiRequest, Body, HttpClient, NetworkHttpClient, Payload};
pub use session::SessionContext;
pub use table::{CustomerTable, UploadStatus};
pub use upload::{ResponseShape, RowSource, UploadOutcome, extract_rows};

// Re-export shared types for convenience
pub use shared::{CustomerDraft, CustomerId, CustomerRecord, CustomerUpdate, MessageResponse};
