use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::{Row, RowStore, header_row};
use crate::error::AttendanceResult;

/// A directory holding one `<table>.csv` file per table.
///
/// Appends open the file in append mode and write a single record. A file
/// edited by hand that lost its final newline gets one back before the
/// record. Nothing coordinates concurrent writers beyond what the OS gives
/// an append.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn open(dir: impl Into<PathBuf>) -> AttendanceResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(CsvStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }

    fn write_row(file: File, row: &[String]) -> AttendanceResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(file);
        writer.write_record(row)?;
        writer.flush()?;
        Ok(())
    }
}

impl RowStore for CsvStore {
    fn ensure_table(&self, name: &str, header: &[&str]) -> AttendanceResult<bool> {
        let path = self.table_path(name);

        let has_rows = match fs::metadata(&path) {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        if has_rows {
            return Ok(false);
        }

        tracing::info!(table = name, path = %path.display(), "Creating table");
        let file = File::create(&path)?;
        Self::write_row(file, &header_row(header))?;
        Ok(true)
    }

    fn read_all(&self, name: &str) -> AttendanceResult<Vec<Row>> {
        let path = self.table_path(name);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(rows)
    }

    fn append(&self, name: &str, row: Row) -> AttendanceResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(self.table_path(name))?;

        if !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }

        Self::write_row(file, &row)
    }
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
