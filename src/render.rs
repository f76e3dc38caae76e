//! TUI rendering for rollcall types.
//!
//! Extension traits that add colored terminal rendering to rollcall-core
//! types using owo_colors.

use owo_colors::OwoColorize;
use rollcall_core::model::{AttendanceRecord, AttendanceStatus, DashboardData, Event};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        format!("{} {}", self.name, format!("({})", self.id).dimmed())
    }
}

/// Color a status string; statuses outside the known three stay plain.
fn colorize_status(status: &str) -> String {
    match status.parse::<AttendanceStatus>() {
        Ok(AttendanceStatus::Present) => status.green().to_string(),
        Ok(AttendanceStatus::Absent) => status.red().to_string(),
        Ok(AttendanceStatus::Excused) => status.yellow().to_string(),
        Err(_) => status.to_string(),
    }
}

impl Render for DashboardData {
    fn render(&self) -> String {
        format!(
            "{} {}   {} {}   {} {}   {} {}",
            "Total".bold(),
            self.total_count,
            "Present".green(),
            self.present_count,
            "Absent".red(),
            self.absent_count,
            "Excused".yellow(),
            self.excused_count,
        )
    }
}

const COLUMNS: [&str; 7] = [
    "Roll Number",
    "Full Name",
    "Email",
    "Event",
    "Status",
    "Notes",
    "Timestamp",
];

fn cells(record: &AttendanceRecord) -> [String; 7] {
    [
        record.roll_number.clone(),
        record.full_name.clone(),
        record.email.clone(),
        record.event_name.clone(),
        record.status.clone(),
        record.notes.clone(),
        record.display_timestamp(),
    ]
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

/// Render records as an aligned table. The status column is colored after
/// padding so escape codes do not skew the widths.
pub fn render_table(records: &[AttendanceRecord]) -> Vec<String> {
    let rows: Vec<[String; 7]> = records.iter().map(cells).collect();

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = COLUMNS
        .iter()
        .zip(widths)
        .map(|(c, w)| pad(c, w))
        .collect::<Vec<_>>()
        .join("  ");

    let mut lines = vec![header.bold().to_string()];

    for row in &rows {
        let line = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let padded = pad(cell, w);
                if i == 4 {
                    padded.replacen(cell.as_str(), &colorize_status(cell), 1)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line);
    }

    lines
}

pub fn showing_line(shown: usize, total: usize) -> String {
    format!("Showing {shown} of {total} records")
}

pub fn success_banner(message: &str) -> String {
    format!("{} {}", "✓ Success!".green().bold(), message)
}

pub fn error_banner(message: &str) -> String {
    format!("{} {}", "✗ Error".red().bold(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(roll: &str, status: &str) -> AttendanceRecord {
        AttendanceRecord {
            roll_number: roll.into(),
            full_name: "Asha".into(),
            email: "asha@example.com".into(),
            event_id: String::new(),
            event_name: "DevFest".into(),
            status: status.into(),
            notes: String::new(),
            timestamp: None,
        }
    }

    #[test]
    fn test_table_has_header_and_one_line_per_record() {
        let lines = render_table(&[record("CS101", "Present"), record("CS102", "Unknown")]);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Roll Number"));
        assert!(lines[1].contains("CS101"));
        assert!(lines[2].contains("Unknown"));
    }

    #[test]
    fn test_showing_line() {
        assert_eq!(showing_line(2, 5), "Showing 2 of 5 records");
    }
}
