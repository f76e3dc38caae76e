//! HTTP client for the rollcall endpoint (directly or through rollcall-proxy)

use anyhow::{Context, Result};
use std::time::Duration;

use rollcall_core::model::{AttendanceRecord, DashboardData, Event};
use rollcall_core::protocol::{Credentials, ExportPayload, NewEvent, Submission, TokenPayload};
use rollcall_core::{Request, Response};

pub const ENV_BACKEND_URL: &str = "ROLLCALL_BACKEND_URL";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How a request travels to the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// GET with `action` and JSON-encoded `data` query parameters
    Query,
    /// POST with the request as a JSON body
    Body,
}

/// HTTP client for the rollcall endpoint
pub struct Client {
    http: reqwest::Client,
    endpoint: Option<String>,
    transport: Transport,
}

impl Client {
    /// A missing endpoint is only warned about; every call then fails the
    /// same way an unreachable server does.
    pub fn new(endpoint: Option<String>, transport: Transport) -> Self {
        let endpoint = endpoint.filter(|url| !url.trim().is_empty());
        if endpoint.is_none() {
            tracing::warn!(
                "{ENV_BACKEND_URL} is not set and no --url was given. API calls will fail."
            );
        }

        Self {
            http: reqwest::Client::new(),
            endpoint,
            transport,
        }
    }

    /// Send a request. Network and decode failures are logged and replaced
    /// by the generic "failed to connect" envelope.
    pub async fn call(&self, request: &Request) -> Response {
        match self.try_call(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(action = request.action(), error = ?e, "API call error");
                Response::connect_failed()
            }
        }
    }

    async fn try_call(&self, request: &Request) -> Result<Response> {
        let endpoint = self
            .endpoint
            .as_deref()
            .context("No backend URL configured")?;

        let builder = match self.transport {
            Transport::Query => {
                let data = serde_json::to_string(&request.payload()?)?;
                self.http
                    .get(endpoint)
                    .query(&[("action", request.action()), ("data", data.as_str())])
            }
            Transport::Body => self.http.post(endpoint).json(request),
        };

        let resp = builder
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .send()
            .await
            .context("Failed to reach server")?;

        if !resp.status().is_success() {
            anyhow::bail!("HTTP error! status: {}", resp.status());
        }

        resp.json().await.context("Failed to decode response")
    }

    pub async fn get_events(&self) -> Result<Vec<Event>> {
        let resp = self.call(&Request::GetEvents {}).await;
        let resp = expect_success(resp, "Failed to load events")?;
        Ok(resp.data_as().unwrap_or_default())
    }

    /// Returns the server's confirmation message.
    pub async fn submit_attendance(&self, submission: Submission) -> Result<String> {
        let resp = self.call(&Request::SubmitAttendance(submission)).await;
        let resp = expect_success(resp, "Failed to submit attendance")?;
        Ok(resp.message.unwrap_or_default())
    }

    /// Returns the session token.
    pub async fn admin_login(&self, username: &str, password: &str) -> Result<String> {
        let resp = self
            .call(&Request::AdminLogin(Credentials {
                username: Some(username.to_string()),
                password: Some(password.to_string()),
            }))
            .await;

        let resp = expect_success(resp, "Invalid credentials")?;
        resp.token.context("Invalid credentials")
    }

    pub async fn get_dashboard_data(&self, token: &str) -> Result<DashboardData> {
        let resp = self
            .call(&Request::GetDashboardData(TokenPayload {
                token: Some(token.to_string()),
            }))
            .await;

        let resp = expect_success(resp, "Failed to fetch data")?;
        resp.data_as().context("Failed to fetch data")
    }

    pub async fn export_to_csv(&self, token: &str, records: &[AttendanceRecord]) -> Result<String> {
        let resp = self
            .call(&Request::ExportToCsv(ExportPayload {
                records: Some(serde_json::to_value(records)?),
                token: Some(token.to_string()),
            }))
            .await;

        let resp = expect_success(resp, "Failed to export data")?;
        resp.csv.context("Failed to export data")
    }

    pub async fn add_event(&self, token: &str, name: &str) -> Result<Event> {
        let resp = self
            .call(&Request::AddEvent(NewEvent {
                token: Some(token.to_string()),
                event_name: Some(name.to_string()),
            }))
            .await;

        let resp = expect_success(resp, "Failed to add event")?;
        resp.data_as().context("Invalid event returned from server")
    }
}

/// Turn a `success: false` envelope into an error carrying its message.
fn expect_success(resp: Response, default: &str) -> Result<Response> {
    if resp.success {
        Ok(resp)
    } else {
        anyhow::bail!("{}", resp.error_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_endpoint_gives_connect_failed() {
        let client = Client::new(None, Transport::Query);
        let resp = client.call(&Request::GetEvents {}).await;
        assert_eq!(resp, Response::connect_failed());
    }

    #[tokio::test]
    async fn test_unreachable_server_gives_connect_failed() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::new(Some(format!("http://{addr}/exec")), Transport::Body);
        let err = client.get_events().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to connect to the server");
    }

    #[test]
    fn test_expect_success_prefers_server_message() {
        let err = expect_success(Response::failure("Event not found"), "fallback").unwrap_err();
        assert_eq!(err.to_string(), "Event not found");

        let err = expect_success(Response::default(), "fallback").unwrap_err();
        assert_eq!(err.to_string(), "fallback");
    }
}
