//! Request handlers over an injected row store and session cache.

use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AttendanceError, AttendanceResult};
use crate::export::{ExportRow, records_to_csv};
use crate::model::{
    ADMIN_HEADER, ATTENDANCE_HEADER, AdminCredential, AttendanceRecord, DashboardData,
    EVENTS_HEADER, Event, SEED_ADMIN, SEED_EVENTS, SessionToken, TABLE_ADMIN, TABLE_ATTENDANCE,
    TABLE_EVENTS, same_roll_number,
};
use crate::protocol::{Credentials, NewEvent, Request, Response, Submission};
use crate::session::{SESSION_TTL, SessionCache};
use crate::store::{RowStore, data_rows};

pub const SUBMITTED: &str = "Attendance submitted successfully";
pub const LOGGED_IN: &str = "Login successful";

/// A field counts as present when it is set and non-empty.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// The attendance backend: one method per action plus [`handle`](Self::handle)
/// to dispatch a decoded request.
pub struct AttendanceService<S> {
    store: S,
    sessions: SessionCache,
    session_ttl: Duration,
}

impl<S: RowStore> AttendanceService<S> {
    pub fn new(store: S, sessions: SessionCache) -> Self {
        AttendanceService {
            store,
            sessions,
            session_ttl: SESSION_TTL,
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sessions(&self) -> &SessionCache {
        &self.sessions
    }

    /// Create missing tables; seed a table only on the call that creates it.
    fn initialize_tables(&self) -> AttendanceResult<()> {
        self.store.ensure_table(TABLE_ATTENDANCE, &ATTENDANCE_HEADER)?;

        if self.store.ensure_table(TABLE_EVENTS, &EVENTS_HEADER)? {
            let millis = Utc::now().timestamp_millis();
            for (i, name) in SEED_EVENTS.iter().enumerate() {
                let event = Event {
                    id: format!("{millis}_{}", i + 1),
                    name: name.to_string(),
                };
                self.store.append(TABLE_EVENTS, event.to_row())?;
            }
            tracing::info!(count = SEED_EVENTS.len(), "Seeded default events");
        }

        if self.store.ensure_table(TABLE_ADMIN, &ADMIN_HEADER)? {
            let row = SEED_ADMIN.iter().map(|cell| cell.to_string()).collect();
            self.store.append(TABLE_ADMIN, row)?;
            tracing::info!("Seeded default admin credential");
        }

        Ok(())
    }

    fn read_events(&self) -> AttendanceResult<Vec<Event>> {
        let rows = self.store.read_all(TABLE_EVENTS)?;
        Ok(data_rows(&rows).iter().filter_map(Event::from_row).collect())
    }

    fn read_records(&self) -> AttendanceResult<Vec<AttendanceRecord>> {
        let rows = self.store.read_all(TABLE_ATTENDANCE)?;
        Ok(data_rows(&rows)
            .iter()
            .filter_map(AttendanceRecord::from_row)
            .collect())
    }

    fn require_token(&self, token: Option<&str>) -> AttendanceResult<()> {
        match token {
            Some(token) if self.sessions.verify_token(token) => Ok(()),
            _ => Err(AttendanceError::unauthorized()),
        }
    }

    pub fn get_events(&self) -> AttendanceResult<Vec<Event>> {
        self.initialize_tables()?;
        self.read_events()
    }

    /// Append one attendance row.
    ///
    /// The duplicate check scans every stored row, across all events, and
    /// is a separate read from the append that follows it.
    pub fn submit_attendance(&self, submission: &Submission) -> AttendanceResult<&'static str> {
        self.initialize_tables()?;

        let (Some(roll_number), Some(full_name), Some(email), Some(event_id), Some(status)) = (
            present(&submission.roll_number),
            present(&submission.full_name),
            present(&submission.email),
            present(&submission.event_id),
            present(&submission.status),
        ) else {
            return Err(AttendanceError::missing_fields());
        };

        let event = self
            .read_events()?
            .into_iter()
            .find(|event| event.id == event_id)
            .ok_or_else(|| AttendanceError::NotFound("Event not found".into()))?;

        let rows = self.store.read_all(TABLE_ATTENDANCE)?;
        let duplicate = data_rows(&rows)
            .iter()
            .filter_map(|row| row.first())
            .any(|stored| same_roll_number(stored, roll_number));

        if duplicate {
            return Err(AttendanceError::Conflict(
                "Roll number already submitted for this event".into(),
            ));
        }

        let record = AttendanceRecord {
            roll_number: roll_number.to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            event_id: event.id,
            event_name: event.name,
            status: status.to_string(),
            notes: submission.notes.clone().unwrap_or_default(),
            timestamp: Some(Utc::now()),
        };

        self.store.append(TABLE_ATTENDANCE, record.to_row())?;
        tracing::info!(roll_number, event = %record.event_name, "Attendance recorded");

        Ok(SUBMITTED)
    }

    /// Returns a fresh session token on a matching credential.
    pub fn admin_login(&self, credentials: &Credentials) -> AttendanceResult<String> {
        self.initialize_tables()?;

        let (Some(username), Some(password)) =
            (present(&credentials.username), present(&credentials.password))
        else {
            return Err(AttendanceError::Validation(
                "Username and password required".into(),
            ));
        };

        let rows = self.store.read_all(TABLE_ADMIN)?;
        let matched = data_rows(&rows)
            .iter()
            .map(AdminCredential::from_row)
            .any(|admin| admin.matches(username, password));

        if !matched {
            tracing::warn!(username, "Rejected admin login");
            return Err(AttendanceError::Unauthorized(
                "Invalid username or password".into(),
            ));
        }

        let token = Uuid::new_v4().to_string();
        let session = SessionToken {
            username: username.to_string(),
            issued_at_millis: Utc::now().timestamp_millis(),
        };
        self.sessions.store_token(&token, session, self.session_ttl);
        tracing::info!(username, "Admin logged in");

        Ok(token)
    }

    pub fn get_dashboard_data(&self, token: Option<&str>) -> AttendanceResult<DashboardData> {
        self.require_token(token)?;
        self.initialize_tables()?;

        let records = self.read_records()?;
        let events = self.read_events()?;

        Ok(DashboardData::tally(records, events))
    }

    /// `records` must be a JSON array. Its elements are exported as they
    /// come, without checking them against the stored record shape.
    pub fn export_to_csv(&self, records: Option<&Value>) -> AttendanceResult<String> {
        let Some(records) = records.and_then(Value::as_array) else {
            return Err(AttendanceError::Validation("Invalid records".into()));
        };

        let rows: Vec<ExportRow> = records.iter().map(ExportRow::from_value).collect();
        records_to_csv(&rows)
    }

    pub fn add_event(&self, payload: &NewEvent) -> AttendanceResult<Event> {
        self.require_token(payload.token.as_deref())?;
        self.initialize_tables()?;

        let name = payload.event_name.as_deref().map(str::trim).unwrap_or("");
        if name.is_empty() {
            return Err(AttendanceError::Validation("Event name required".into()));
        }

        let rows = self.store.read_all(TABLE_EVENTS)?;
        let event = Event {
            id: format!(
                "{}_{}",
                Utc::now().timestamp_millis(),
                data_rows(&rows).len() + 1
            ),
            name: name.to_string(),
        };

        self.store.append(TABLE_EVENTS, event.to_row())?;
        tracing::info!(id = %event.id, name = %event.name, "Event added");

        Ok(event)
    }

    /// Run one request to completion. Failures become `success: false`
    /// envelopes; nothing escapes as a fault.
    pub fn handle(&self, request: Request) -> Response {
        let action = request.action();
        tracing::debug!(action, "Dispatching request");

        let result = match request {
            Request::GetEvents {} => self.get_events().and_then(|events| Response::with_data(&events)),
            Request::SubmitAttendance(submission) => self
                .submit_attendance(&submission)
                .map(Response::with_message),
            Request::AdminLogin(credentials) => self
                .admin_login(&credentials)
                .map(|token| Response::with_token(token, LOGGED_IN)),
            Request::GetDashboardData(payload) => self
                .get_dashboard_data(payload.token.as_deref())
                .and_then(|data| Response::with_data(&data)),
            Request::ExportToCsv(payload) => self
                .export_to_csv(payload.records.as_ref())
                .map(Response::with_csv),
            Request::AddEvent(payload) => self
                .add_event(&payload)
                .and_then(|event| Response::with_data(&event)),
        };

        result.unwrap_or_else(|err| {
            if err.is_server_fault() {
                tracing::error!(action, error = %err, "Request failed");
            } else {
                tracing::debug!(action, error = %err, "Request rejected");
            }
            Response::from(err)
        })
    }

    /// Decode an untyped body and handle it.
    pub fn handle_value(&self, value: Value) -> Response {
        match Request::from_value(value) {
            Ok(request) => self.handle(request),
            Err(err) => {
                tracing::warn!(error = %err, "Could not decode request");
                Response::from(err)
            }
        }
    }
}
