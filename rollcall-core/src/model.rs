//! Attendance domain types.
//!
//! These are the shapes that travel inside response envelopes. Rows in the
//! store are plain strings; the conversions between the two live here so
//! the column layout is written down in exactly one place.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Row;

pub const TABLE_ATTENDANCE: &str = "Attendance";
pub const TABLE_EVENTS: &str = "Events";
pub const TABLE_ADMIN: &str = "Admin";

pub const ATTENDANCE_HEADER: [&str; 8] = [
    "Roll Number",
    "Full Name",
    "Email",
    "Event ID",
    "Event Name",
    "Status",
    "Notes",
    "Timestamp",
];

pub const EVENTS_HEADER: [&str; 2] = ["Event ID", "Event Name"];

pub const ADMIN_HEADER: [&str; 3] = ["Username", "Password", "Role"];

/// Events written the first time the Events table is created.
pub const SEED_EVENTS: [&str; 4] = [
    "GDG DevFest 2024",
    "Android Study Jams",
    "Cloud Study Jams",
    "Web Development Bootcamp",
];

/// Credential written the first time the Admin table is created.
pub const SEED_ADMIN: [&str; 3] = ["admin", "password123", "admin"];

/// Presentation format for timestamps (en-IN style, 12 hour clock).
const DISPLAY_FORMAT: &str = "%d/%m/%Y, %I:%M:%S %P";

/// Cell at `index`, or an empty string for short rows.
fn cell(row: &Row, index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// An event attendees can register against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
}

impl Event {
    /// Returns `None` unless both id and name cells are filled.
    pub fn from_row(row: &Row) -> Option<Self> {
        let id = cell(row, 0);
        let name = cell(row, 1);

        if id.is_empty() || name.is_empty() {
            return None;
        }

        Some(Event {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    pub fn to_row(&self) -> Row {
        vec![self.id.clone(), self.name.clone()]
    }
}

/// The three statuses the form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Excused,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 3] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Excused,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Excused => "Excused",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    /// Exact, case-sensitive match; stored rows are compared the same way.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Present" => Ok(AttendanceStatus::Present),
            "Absent" => Ok(AttendanceStatus::Absent),
            "Excused" => Ok(AttendanceStatus::Excused),
            other => Err(format!("Unknown status: {other}")),
        }
    }
}

/// One attendance row as read back from the store.
///
/// `status` stays a string: rows can be edited by hand in the backing
/// sheet, and unknown statuses are still listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    /// Returns `None` for rows with an empty roll-number cell.
    pub fn from_row(row: &Row) -> Option<Self> {
        let roll_number = cell(row, 0);
        if roll_number.is_empty() {
            return None;
        }

        let timestamp = DateTime::parse_from_rfc3339(cell(row, 7))
            .ok()
            .map(|dt| dt.with_timezone(&Utc));

        Some(AttendanceRecord {
            roll_number: roll_number.to_string(),
            full_name: cell(row, 1).to_string(),
            email: cell(row, 2).to_string(),
            event_id: cell(row, 3).to_string(),
            event_name: cell(row, 4).to_string(),
            status: cell(row, 5).to_string(),
            notes: cell(row, 6).to_string(),
            timestamp,
        })
    }

    pub fn to_row(&self) -> Row {
        vec![
            self.roll_number.clone(),
            self.full_name.clone(),
            self.email.clone(),
            self.event_id.clone(),
            self.event_name.clone(),
            self.status.clone(),
            self.notes.clone(),
            self.timestamp.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ]
    }

    pub fn known_status(&self) -> Option<AttendanceStatus> {
        self.status.parse().ok()
    }

    /// Timestamp in local time for people to read; empty when unknown.
    pub fn display_timestamp(&self) -> String {
        self.timestamp
            .map(display_timestamp)
            .unwrap_or_default()
    }
}

pub fn display_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(DISPLAY_FORMAT).to_string()
}

/// Roll numbers are unique regardless of case.
pub fn same_roll_number(stored: &str, candidate: &str) -> bool {
    !stored.is_empty() && stored.to_uppercase() == candidate.to_uppercase()
}

/// A row of the Admin table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredential {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl AdminCredential {
    pub fn from_row(row: &Row) -> Self {
        AdminCredential {
            username: cell(row, 0).to_string(),
            password: cell(row, 1).to_string(),
            role: cell(row, 2).to_string(),
        }
    }

    /// Plaintext, exact comparison.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// What the session cache remembers about a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub username: String,
    pub issued_at_millis: i64,
}

/// Aggregated view returned by `getDashboardData`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_count: usize,
    pub present_count: usize,
    pub absent_count: usize,
    pub excused_count: usize,
    pub records: Vec<AttendanceRecord>,
    pub events: Vec<Event>,
}

impl DashboardData {
    /// Tally records by status. Unknown statuses only count toward the total.
    pub fn tally(records: Vec<AttendanceRecord>, events: Vec<Event>) -> Self {
        let mut data = DashboardData {
            total_count: records.len(),
            events,
            ..Default::default()
        };

        for record in &records {
            match record.known_status() {
                Some(AttendanceStatus::Present) => data.present_count += 1,
                Some(AttendanceStatus::Absent) => data.absent_count += 1,
                Some(AttendanceStatus::Excused) => data.excused_count += 1,
                None => {}
            }
        }

        data.records = records;
        data
    }
}
