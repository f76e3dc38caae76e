//! Row-oriented table storage.
//!
//! A table is a header row followed by data rows, all plain strings. The
//! only write is an append. Reads return everything, header included, and
//! callers skip index 0.

mod csv_file;
mod memory;

pub use csv_file::CsvStore;
pub use memory::MemoryStore;

use crate::error::AttendanceResult;

pub type Row = Vec<String>;

pub trait RowStore: Send + Sync {
    /// Create `name` with `header` if it is absent or has no rows.
    ///
    /// Returns `true` when the table was created by this call.
    fn ensure_table(&self, name: &str, header: &[&str]) -> AttendanceResult<bool>;

    /// Every row of `name`, header first. A missing table reads as empty.
    fn read_all(&self, name: &str) -> AttendanceResult<Vec<Row>>;

    /// Add one row to the end of `name`.
    fn append(&self, name: &str, row: Row) -> AttendanceResult<()>;
}

/// Data rows of a full read, i.e. everything after the header.
pub fn data_rows(rows: &[Row]) -> &[Row] {
    rows.get(1..).unwrap_or(&[])
}

pub(crate) fn header_row(header: &[&str]) -> Row {
    header.iter().map(|h| h.to_string()).collect()
}
