//! Dashboard filtering, done on the client over the fetched records.

use rollcall_core::model::AttendanceRecord;

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Case-insensitive substring over roll number, name and email
    pub search: String,
    /// Exact event name
    pub event: Option<String>,
    /// Exact status
    pub status: Option<String>,
}

impl RecordFilter {
    pub fn new(search: Option<String>, event: Option<String>, status: Option<String>) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        RecordFilter {
            search: search.unwrap_or_default(),
            event: non_empty(event),
            status: non_empty(status),
        }
    }

    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        let query = self.search.to_lowercase();
        let matches_search = [&record.roll_number, &record.full_name, &record.email]
            .iter()
            .any(|field| field.to_lowercase().contains(&query));

        let matches_event = self
            .event
            .as_ref()
            .is_none_or(|event| &record.event_name == event);
        let matches_status = self
            .status
            .as_ref()
            .is_none_or(|status| &record.status == status);

        matches_search && matches_event && matches_status
    }

    pub fn apply(&self, records: &[AttendanceRecord]) -> Vec<AttendanceRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.event.is_some() || self.status.is_some()
    }
}
