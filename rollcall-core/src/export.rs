//! CSV export of attendance records.

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;

use crate::error::{AttendanceError, AttendanceResult};
use crate::model::{AttendanceRecord, display_timestamp};

pub const EXPORT_HEADER: &str = "Roll Number,Full Name,Email,Event Name,Status,Notes,Timestamp";

/// One exported line, already rendered to text.
///
/// Built from whatever the caller sent: export accepts records as the
/// dashboard holds them, which need not be well-formed stored rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRow {
    pub roll_number: String,
    pub full_name: String,
    pub email: String,
    pub event_name: String,
    pub status: String,
    pub notes: String,
    pub timestamp: String,
}

/// Scalars as text; null, missing and non-scalar fields are empty.
fn text(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

impl ExportRow {
    /// RFC3339 timestamps are shown in the display format; any other
    /// timestamp text is written as given.
    pub fn from_value(record: &Value) -> Self {
        let raw_timestamp = text(record, "timestamp");
        let timestamp = match DateTime::parse_from_rfc3339(&raw_timestamp) {
            Ok(at) => display_timestamp(at.with_timezone(&Utc)),
            Err(_) => raw_timestamp,
        };

        ExportRow {
            roll_number: text(record, "rollNumber"),
            full_name: text(record, "fullName"),
            email: text(record, "email"),
            event_name: text(record, "eventName"),
            status: text(record, "status"),
            notes: text(record, "notes"),
            timestamp,
        }
    }
}

impl From<&AttendanceRecord> for ExportRow {
    fn from(record: &AttendanceRecord) -> Self {
        ExportRow {
            roll_number: record.roll_number.clone(),
            full_name: record.full_name.clone(),
            email: record.email.clone(),
            event_name: record.event_name.clone(),
            status: record.status.clone(),
            notes: record.notes.clone(),
            timestamp: record.display_timestamp(),
        }
    }
}

/// Render rows as CSV.
///
/// The header line is written bare. Every record field is quoted, with
/// embedded quotes doubled; commas and newlines inside a field need nothing
/// more because the field is quoted.
pub fn records_to_csv(rows: &[ExportRow]) -> AttendanceResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record([
            &row.roll_number,
            &row.full_name,
            &row.email,
            &row.event_name,
            &row.status,
            &row.notes,
            &row.timestamp,
        ])?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| AttendanceError::Store(e.to_string()))?;
    let body = String::from_utf8(body).map_err(|e| AttendanceError::Store(e.to_string()))?;

    Ok(format!("{EXPORT_HEADER}\n{body}"))
}
