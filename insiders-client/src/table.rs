//! In-memory customer table
//!
//! The table is a snapshot: every mutating call on the backend is
//! followed by a wholesale `replace`. Only optimistic inserts touch
//! single rows, and those carry temporary ids until confirmed.

use shared::{CustomerId, CustomerRecord};
use tracing::{debug, info, warn};

use crate::ClientResult;
use crate::upload::UploadOutcome;

/// Per-upload state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Succeeded {
        rows: usize,
    },
    Failed {
        message: String,
    },
}

impl UploadStatus {
    pub fn is_uploading(&self) -> bool {
        matches!(self, Self::Uploading)
    }
}

/// Loaded customer rows plus upload state
#[derive(Debug, Clone, Default)]
pub struct CustomerTable {
    records: Vec<CustomerRecord>,
    upload: UploadStatus,
}

impl CustomerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Swap in a fresh snapshot
    pub fn replace(&mut self, records: Vec<CustomerRecord>) {
        debug!(rows = records.len(), "Table replaced");
        self.records = records;
    }

    /// Add a record the backend has not confirmed yet; returns its temporary id
    pub fn insert_optimistic(&mut self, mut record: CustomerRecord) -> CustomerId {
        let id = CustomerId::temporary();
        record.set_id(id.clone());
        self.records.push(record);
        id
    }

    /// Replace an optimistic record with the backend's version.
    /// Only temporary ids are matched.
    pub fn confirm(&mut self, temporary: &CustomerId, confirmed: CustomerRecord) -> bool {
        if !temporary.is_temporary() {
            return false;
        }
        match self.records.iter_mut().find(|r| r.id() == temporary) {
            Some(slot) => {
                *slot = confirmed;
                true
            }
            None => false,
        }
    }

    /// Drop an optimistic record the backend rejected
    pub fn discard(&mut self, temporary: &CustomerId) -> bool {
        if !temporary.is_temporary() {
            return false;
        }
        let before = self.records.len();
        self.records.retain(|r| r.id() != temporary);
        before != self.records.len()
    }

    pub fn upload_status(&self) -> &UploadStatus {
        &self.upload
    }

    /// Enter `Uploading`. A second upload may start while one is in flight.
    pub fn begin_upload(&mut self) {
        self.upload = UploadStatus::Uploading;
    }

    /// Record how an upload ended. On success the rows replace the table.
    ///
    /// Whichever upload finishes last wins.
    pub fn finish_upload(&mut self, result: ClientResult<UploadOutcome>) -> ClientResult<()> {
        match result {
            Ok(outcome) => {
                let rows = outcome.records.len();
                info!(rows, source = ?outcome.source, "Upload finished");
                self.replace(outcome.records);
                self.upload = UploadStatus::Succeeded { rows };
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Upload failed");
                self.upload = UploadStatus::Failed {
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }
}
