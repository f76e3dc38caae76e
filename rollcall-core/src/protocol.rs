//! Request and response types for the single rollcall endpoint.
//!
//! A request is a JSON object whose `action` field selects the handler and
//! whose remaining fields are that handler's payload. Every response is
//! the same envelope, with `success` always set and the other fields only
//! when they carry something.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AttendanceError, AttendanceResult};

/// Message clients substitute when the server cannot be reached.
pub const CONNECT_FAILED: &str = "Failed to connect to the server";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    #[serde(rename = "getEvents")]
    GetEvents {},

    #[serde(rename = "submitAttendance")]
    SubmitAttendance(Submission),

    #[serde(rename = "adminLogin")]
    AdminLogin(Credentials),

    #[serde(rename = "getDashboardData")]
    GetDashboardData(TokenPayload),

    #[serde(rename = "exportToCSV")]
    ExportToCsv(ExportPayload),

    #[serde(rename = "addEvent")]
    AddEvent(NewEvent),
}

impl Request {
    pub const ACTIONS: [&'static str; 6] = [
        "getEvents",
        "submitAttendance",
        "adminLogin",
        "getDashboardData",
        "exportToCSV",
        "addEvent",
    ];

    pub fn action(&self) -> &'static str {
        match self {
            Request::GetEvents {} => "getEvents",
            Request::SubmitAttendance(_) => "submitAttendance",
            Request::AdminLogin(_) => "adminLogin",
            Request::GetDashboardData(_) => "getDashboardData",
            Request::ExportToCsv(_) => "exportToCSV",
            Request::AddEvent(_) => "addEvent",
        }
    }

    /// Decode an untyped request body.
    ///
    /// An `action` outside [`Request::ACTIONS`] is [`AttendanceError::UnknownAction`];
    /// a known action with an undecodable payload is a serialization error.
    pub fn from_value(value: Value) -> AttendanceResult<Self> {
        let known = value
            .get("action")
            .and_then(Value::as_str)
            .is_some_and(|action| Self::ACTIONS.contains(&action));

        if !known {
            return Err(AttendanceError::UnknownAction);
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Decode the query-string transport: `action` plus a JSON-encoded `data` object.
    pub fn from_query(action: Option<&str>, data: Option<&str>) -> AttendanceResult<Self> {
        let mut payload: Map<String, Value> = match data {
            Some(data) if !data.trim().is_empty() => serde_json::from_str(data)?,
            _ => Map::new(),
        };

        if let Some(action) = action {
            payload.insert("action".into(), Value::String(action.to_string()));
        }

        Self::from_value(Value::Object(payload))
    }

    /// The payload without its `action` tag, as sent in the `data` query parameter.
    pub fn payload(&self) -> AttendanceResult<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.remove("action");
        }
        Ok(value)
    }
}

/// Payload of `submitAttendance`. Every field may be absent on the wire;
/// the handler decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Payload of `exportToCSV`. `records` stays untyped until the handler has
/// checked that it is an array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

/// The envelope every action answers with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
}

impl Response {
    fn ok() -> Self {
        Response {
            success: true,
            ..Default::default()
        }
    }

    pub fn with_data<T: Serialize>(data: &T) -> AttendanceResult<Self> {
        Ok(Response {
            data: Some(serde_json::to_value(data)?),
            ..Self::ok()
        })
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Response {
            message: Some(message.into()),
            ..Self::ok()
        }
    }

    pub fn with_token(token: impl Into<String>, message: impl Into<String>) -> Self {
        Response {
            token: Some(token.into()),
            message: Some(message.into()),
            ..Self::ok()
        }
    }

    pub fn with_csv(csv: impl Into<String>) -> Self {
        Response {
            csv: Some(csv.into()),
            ..Self::ok()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Response {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn connect_failed() -> Self {
        Self::failure(CONNECT_FAILED)
    }

    /// Decode `data` into `T`, or `None` when absent or mismatched.
    pub fn data_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.data
            .clone()
            .and_then(|data| serde_json::from_value(data).ok())
    }

    /// The error text, falling back to `default` when the server gave none.
    pub fn error_or(&self, default: &str) -> String {
        self.error.clone().unwrap_or_else(|| default.to_string())
    }
}

impl From<AttendanceError> for Response {
    fn from(err: AttendanceError) -> Self {
        Response::failure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_tagged_body() {
        let req = Request::from_value(json!({
            "action": "adminLogin",
            "username": "admin",
            "password": "password123"
        }))
        .unwrap();

        assert_eq!(
            req,
            Request::AdminLogin(Credentials {
                username: Some("admin".into()),
                password: Some("password123".into()),
            })
        );
    }

    #[test]
    fn test_get_events_ignores_extra_fields() {
        let req = Request::from_value(json!({"action": "getEvents", "junk": 1})).unwrap();
        assert_eq!(req, Request::GetEvents {});
    }

    #[test]
    fn test_unknown_or_missing_action() {
        let err = Request::from_value(json!({"action": "dropTables"})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown action");

        let err = Request::from_value(json!({"username": "x"})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown action");
    }

    #[test]
    fn test_known_action_with_bad_payload_is_server_error() {
        let err = Request::from_value(json!({"action": "adminLogin", "username": 5})).unwrap_err();
        assert!(err.to_string().starts_with("Server error: "));
    }

    #[test]
    fn test_query_transport_matches_body_transport() {
        let from_query = Request::from_query(
            Some("submitAttendance"),
            Some(r#"{"rollNumber":"CS101","eventId":"e1"}"#),
        )
        .unwrap();

        let from_body = Request::from_value(json!({
            "action": "submitAttendance",
            "rollNumber": "CS101",
            "eventId": "e1"
        }))
        .unwrap();

        assert_eq!(from_query, from_body);
    }

    #[test]
    fn test_query_without_data_is_empty_payload() {
        let req = Request::from_query(Some("getDashboardData"), None).unwrap();
        assert_eq!(req, Request::GetDashboardData(TokenPayload { token: None }));
    }

    #[test]
    fn test_payload_strips_action_and_empty_fields() {
        let req = Request::GetDashboardData(TokenPayload {
            token: Some("t".into()),
        });
        assert_eq!(req.payload().unwrap(), json!({"token": "t"}));
        assert_eq!(req.action(), "getDashboardData");
    }

    #[test]
    fn test_envelope_omits_absent_fields() {
        let body = serde_json::to_value(Response::failure("Event not found")).unwrap();
        assert_eq!(body, json!({"success": false, "error": "Event not found"}));

        let body = serde_json::to_value(Response::with_token("abc", "Login successful")).unwrap();
        assert_eq!(
            body,
            json!({"success": true, "token": "abc", "message": "Login successful"})
        );
    }
}
