use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use crate::client::Client;
use crate::filter::RecordFilter;
use crate::render::success_banner;
use crate::session::ClientSession;
use crate::utils::tui::create_spinner;

/// Exports what the dashboard would show with the same filters.
pub async fn run(
    client: &Client,
    session: &ClientSession,
    filter: &RecordFilter,
    output: Option<PathBuf>,
) -> Result<()> {
    let token = session.require_token()?;

    let spinner = create_spinner("Exporting...".into());
    let result = async {
        let data = client.get_dashboard_data(token).await?;
        let records = filter.apply(&data.records);
        let csv = client.export_to_csv(token, &records).await?;
        anyhow::Ok((records.len(), data.total_count, csv))
    }
    .await;
    spinner.finish_and_clear();
    let (count, total, csv) = result?;

    let path = output.unwrap_or_else(default_file_name);
    std::fs::write(&path, csv).with_context(|| format!("Failed to write {}", path.display()))?;

    let summary = if filter.is_active() {
        format!("Exported {count} of {total} records to {}", path.display())
    } else {
        format!("Exported {count} records to {}", path.display())
    };
    println!("{}", success_banner(&summary));
    Ok(())
}

/// attendance_<YYYY-MM-DD>.csv
fn default_file_name() -> PathBuf {
    PathBuf::from(format!("attendance_{}.csv", Local::now().format("%Y-%m-%d")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_name_is_dated() {
        let name = default_file_name().to_string_lossy().to_string();
        assert!(name.starts_with("attendance_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "attendance_2024-01-01.csv".len());
    }
}
