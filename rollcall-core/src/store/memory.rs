use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{Row, RowStore, header_row};
use crate::error::{AttendanceError, AttendanceResult};

/// Tables held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> AttendanceResult<MutexGuard<'_, HashMap<String, Vec<Row>>>> {
        self.tables
            .lock()
            .map_err(|_| AttendanceError::Store("memory store lock poisoned".into()))
    }
}

impl RowStore for MemoryStore {
    fn ensure_table(&self, name: &str, header: &[&str]) -> AttendanceResult<bool> {
        let mut tables = self.tables()?;
        let rows = tables.entry(name.to_string()).or_default();

        if !rows.is_empty() {
            return Ok(false);
        }

        rows.push(header_row(header));
        Ok(true)
    }

    fn read_all(&self, name: &str) -> AttendanceResult<Vec<Row>> {
        Ok(self.tables()?.get(name).cloned().unwrap_or_default())
    }

    fn append(&self, name: &str, row: Row) -> AttendanceResult<()> {
        self.tables()?.entry(name.to_string()).or_default().push(row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::data_rows;

    #[test]
    fn test_ensure_table_is_idempotent() {
        let store = MemoryStore::new();

        assert!(store.ensure_table("Events", &["Event ID", "Event Name"]).unwrap());
        assert!(!store.ensure_table("Events", &["Event ID", "Event Name"]).unwrap());

        let rows = store.read_all("Events").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], vec!["Event ID", "Event Name"]);
    }

    #[test]
    fn test_append_keeps_order_and_header() {
        let store = MemoryStore::new();
        store.ensure_table("Events", &["Event ID", "Event Name"]).unwrap();
        store.append("Events", vec!["1".into(), "A".into()]).unwrap();
        store.append("Events", vec!["2".into(), "B".into()]).unwrap();

        let rows = store.read_all("Events").unwrap();
        let data = data_rows(&rows);
        assert_eq!(data.len(), 2);
        assert_eq!(data[0][1], "A");
        assert_eq!(data[1][1], "B");
    }

    #[test]
    fn test_missing_table_reads_empty() {
        let store = MemoryStore::new();
        assert!(store.read_all("Nope").unwrap().is_empty());
        assert!(data_rows(&store.read_all("Nope").unwrap()).is_empty());
    }
}
