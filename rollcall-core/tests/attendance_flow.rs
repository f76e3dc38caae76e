use std::time::Duration;

use rollcall_core::model::{AttendanceRecord, DashboardData, Event, TABLE_ATTENDANCE, TABLE_EVENTS};
use rollcall_core::protocol::{Credentials, Submission};
use rollcall_core::session::SessionCache;
use rollcall_core::store::{CsvStore, MemoryStore, RowStore, data_rows};
use rollcall_core::{AttendanceService, Response};
use serde_json::json;

fn service() -> AttendanceService<MemoryStore> {
    AttendanceService::new(MemoryStore::new(), SessionCache::new())
}

fn submission(roll: &str, event_id: &str, status: &str) -> Submission {
    Submission {
        roll_number: Some(roll.into()),
        full_name: Some("Ravi Kumar".into()),
        email: Some("ravi@example.com".into()),
        event_id: Some(event_id.into()),
        status: Some(status.into()),
        notes: Some("front row".into()),
    }
}

fn login<S: RowStore>(svc: &AttendanceService<S>) -> String {
    svc.admin_login(&Credentials {
        username: Some("admin".into()),
        password: Some("password123".into()),
    })
    .expect("seeded admin should log in")
}

fn dashboard<S: RowStore>(svc: &AttendanceService<S>, token: &str) -> DashboardData {
    svc.get_dashboard_data(Some(token)).expect("dashboard")
}

#[test]
fn test_fresh_submission_appears_once_with_counts() {
    let svc = service();
    let events = svc.get_events().unwrap();
    let token = login(&svc);

    let before = dashboard(&svc, &token);
    assert_eq!(before.total_count, 0);

    svc.submit_attendance(&submission("CS101", &events[0].id, "Present"))
        .unwrap();

    let after = dashboard(&svc, &token);
    assert_eq!(after.total_count, 1);
    assert_eq!(after.present_count, 1);
    assert_eq!(after.absent_count, 0);
    assert_eq!(
        after
            .records
            .iter()
            .filter(|r| r.roll_number == "CS101")
            .count(),
        1
    );
}

#[test]
fn test_duplicate_roll_number_rejected_across_events_and_case() {
    let svc = service();
    let events = svc.get_events().unwrap();

    svc.submit_attendance(&submission("cs101", &events[0].id, "Present"))
        .unwrap();

    let err = svc
        .submit_attendance(&submission("CS101", &events[1].id, "Absent"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Roll number already submitted for this event");

    let token = login(&svc);
    assert_eq!(dashboard(&svc, &token).total_count, 1);
}

#[test]
fn test_login_token_unlocks_dashboard() {
    let svc = service();
    let token = login(&svc);

    assert!(svc.get_dashboard_data(Some(&token)).is_ok());

    let err = svc.get_dashboard_data(Some("not-a-token")).unwrap_err();
    assert_eq!(err.to_string(), "Unauthorized: Invalid or expired token");
}

#[tokio::test(start_paused = true)]
async fn test_token_expires_after_ttl() {
    let svc = service().with_session_ttl(Duration::from_secs(60));
    let token = login(&svc);

    tokio::time::advance(Duration::from_secs(30)).await;
    assert!(svc.get_dashboard_data(Some(&token)).is_ok());

    tokio::time::advance(Duration::from_secs(31)).await;
    let err = svc.get_dashboard_data(Some(&token)).unwrap_err();
    assert_eq!(err.to_string(), "Unauthorized: Invalid or expired token");
}

#[test]
fn test_export_doubles_quotes_and_reparses() {
    let svc = service();
    let notes = r#"brought "guest" along"#;
    let records = json!([{
        "rollNumber": "CS101",
        "fullName": "Ravi Kumar",
        "email": "ravi@example.com",
        "eventName": "Cloud Study Jams",
        "status": "Present",
        "notes": notes,
        "timestamp": null
    }]);

    let csv = svc.export_to_csv(Some(&records)).unwrap();
    assert!(csv.contains(r#""brought ""guest"" along""#));

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let row = reader.records().next().unwrap().unwrap();
    assert_eq!(&row[5], notes);
}

#[test]
fn test_export_accepts_dashboard_shaped_timestamps() {
    let svc = service();
    let record = |roll: &str, timestamp: &str| {
        json!({
            "rollNumber": roll,
            "fullName": "Ravi Kumar",
            "email": "ravi@example.com",
            "eventId": "e1",
            "eventName": "Cloud Study Jams",
            "status": "Present",
            "notes": "",
            "timestamp": timestamp
        })
    };

    let response = svc.handle_value(json!({
        "action": "exportToCSV",
        "records": [record("CS101", ""), record("CS102", "02/11/2024, 09:30:00 am")]
    }));
    assert!(response.success, "{:?}", response.error);

    let csv = response.csv.unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let rows: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][6], "");
    assert_eq!(&rows[1][6], "02/11/2024, 09:30:00 am");
}

#[test]
fn test_bootstrap_seeds_events_exactly_once() {
    let svc = service();

    let first = svc.get_events().unwrap();
    let second = svc.get_events().unwrap();

    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
    assert_eq!(first[0].name, "GDG DevFest 2024");
    assert_eq!(data_rows(&svc.store().read_all(TABLE_EVENTS).unwrap()).len(), 4);
}

#[test]
fn test_unknown_status_counts_toward_total_only() {
    let svc = service();
    svc.get_events().unwrap();

    for (i, status) in ["Present", "Absent", "Excused", "Unknown"].iter().enumerate() {
        let record = AttendanceRecord {
            roll_number: format!("R{i}"),
            full_name: "Someone".into(),
            email: "someone@example.com".into(),
            event_id: "e".into(),
            event_name: "Event".into(),
            status: status.to_string(),
            notes: String::new(),
            timestamp: None,
        };
        svc.store().append(TABLE_ATTENDANCE, record.to_row()).unwrap();
    }

    let token = login(&svc);
    let data = dashboard(&svc, &token);
    assert_eq!(data.total_count, 4);
    assert_eq!(data.present_count, 1);
    assert_eq!(data.absent_count, 1);
    assert_eq!(data.excused_count, 1);
    assert_eq!(data.records.len(), 4);
}

#[test]
fn test_rows_without_roll_number_are_ignored() {
    let svc = service();
    svc.get_events().unwrap();
    svc.store()
        .append(TABLE_ATTENDANCE, vec![String::new(), "Ghost".into()])
        .unwrap();

    let token = login(&svc);
    assert_eq!(dashboard(&svc, &token).total_count, 0);
}

#[test]
fn test_csv_store_persists_across_service_instances() {
    let dir = tempfile::tempdir().unwrap();

    let event: Event = {
        let svc = AttendanceService::new(CsvStore::open(dir.path()).unwrap(), SessionCache::new());
        let event = svc.get_events().unwrap().remove(0);
        svc.submit_attendance(&submission("EE204", &event.id, "Excused"))
            .unwrap();
        event
    };

    let svc = AttendanceService::new(CsvStore::open(dir.path()).unwrap(), SessionCache::new());
    assert_eq!(svc.get_events().unwrap().len(), 4);

    let token = login(&svc);
    let data = dashboard(&svc, &token);
    assert_eq!(data.excused_count, 1);
    assert_eq!(data.records[0].event_name, event.name);
}

#[test]
fn test_envelope_for_each_action() {
    let svc = service();

    let events = svc.handle_value(json!({"action": "getEvents"}));
    assert!(events.success);
    let events: Vec<Event> = events.data_as().unwrap();

    let submitted = svc.handle_value(json!({
        "action": "submitAttendance",
        "rollNumber": "ME301",
        "fullName": "Neha",
        "email": "neha@example.com",
        "eventId": events[2].id,
        "status": "Absent"
    }));
    assert_eq!(
        submitted,
        Response::with_message("Attendance submitted successfully")
    );

    let missing = svc.handle_value(json!({"action": "submitAttendance", "rollNumber": "X"}));
    assert_eq!(missing, Response::failure("Missing required fields"));

    let exported = svc.handle_value(json!({"action": "exportToCSV", "records": []}));
    assert!(exported.success);
    assert!(exported.csv.unwrap().starts_with("Roll Number,Full Name"));

    let bad = svc.handle_value(json!({"action": "exportToCSV", "records": "nope"}));
    assert_eq!(bad, Response::failure("Invalid records"));
}
