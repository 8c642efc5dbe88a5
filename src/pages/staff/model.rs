use thiserror::Error;

use crate::import::Cell;

use super::*;

/// Why a single row of a bulk create was not stored.
#[derive(Debug, Error)]
pub(super) enum RowError {
    #[error("`{0}` is required")]
    MissingField(&'static str),
    #[error("staff id `{0}` appears more than once in this batch")]
    DuplicateInBatch(String),
    #[error("a staff member with id `{0}` already exists")]
    AlreadyExists(String),
    #[error("could not be saved: {0}")]
    Database(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct FailedRow {
    /// 1-based position in the submitted batch.
    pub(super) row: usize,
    pub(super) staff_id: Option<String>,
    pub(super) first_name: Option<String>,
    pub(super) error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct BulkCreateReport {
    pub(super) success: Vec<staff::Model>,
    pub(super) failed: Vec<FailedRow>,
    pub(super) total: usize,
}

/// A spreadsheet already decoded by the client, header row first.
#[derive(Debug, Deserialize)]
pub(super) struct ImportGrid {
    pub(super) rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct ImportPreview {
    pub(super) rows: Vec<StaffImportRow>,
    pub(super) data_rows: usize,
    pub(super) skipped: usize,
}
