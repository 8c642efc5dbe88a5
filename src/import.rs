//! Staff spreadsheet import.
//!
//! Turns a header row plus data rows of loosely typed cells into
//! [`StaffImportRow`]s ready for the bulk create endpoint. Header spelling,
//! date encodings and numeric formats are normalized here; rows lacking a
//! staff id, role id or first name are left out of the batch.

use thiserror::Error;

pub use cell::Cell;
pub use dates::{parse_import_date, serial_to_date};
pub use headers::{parse_headers, CanonicalField};
pub use row::{normalize_row, normalize_sheet, StaffImportRow};
pub use sheet::{read_csv, read_grid, Grid};
pub use template::{build_template, template_csv};

mod cell;
mod dates;
mod headers;
mod row;
mod sheet;
mod template;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The file could not be read or holds no data rows. Nothing is submitted.
    #[error("{reason}")]
    Parse { reason: String },
}

impl From<csv::Error> for ImportError {
    fn from(error: csv::Error) -> Self {
        ImportError::Parse { reason: format!("unreadable spreadsheet: {error}") }
    }
}
