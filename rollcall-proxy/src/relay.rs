//! Relay endpoint: forward the request upstream, hand the body back.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{RawQuery, State},
    http::{Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::any,
};

use crate::error::ProxyError;

#[derive(Clone)]
pub struct RelayState {
    http: reqwest::Client,
    upstream: Option<Arc<str>>,
}

impl RelayState {
    pub fn new(upstream: Option<String>) -> Self {
        RelayState {
            http: reqwest::Client::new(),
            upstream: upstream.map(Arc::from),
        }
    }
}

pub fn router() -> Router<RelayState> {
    Router::new().route("/api", any(relay))
}

/// ANY /api - Forward to the backend
///
/// The upstream status is dropped: whatever the backend answers comes back
/// as a 200 with its body untouched.
async fn relay(
    State(state): State<RelayState>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let upstream = state.upstream.as_deref().ok_or(ProxyError::NoUpstream)?;

    let url = match query {
        Some(query) if !query.is_empty() => format!("{upstream}?{query}"),
        _ => upstream.to_string(),
    };

    tracing::debug!(%method, %url, "Relaying request");

    let mut request = state
        .http
        .request(method.clone(), &url)
        .header(CONTENT_TYPE, "application/json");

    if method != Method::GET {
        request = request.body(body);
    }

    let upstream_response = request.send().await?;
    let upstream_status = upstream_response.status();
    let text = upstream_response.text().await?;

    if !upstream_status.is_success() {
        tracing::warn!(status = %upstream_status, "Upstream answered with an error status");
    }

    Ok((StatusCode::OK, [(CONTENT_TYPE, "application/json")], text).into_response())
}
