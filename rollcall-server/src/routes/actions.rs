//! The single action endpoint, reachable by GET (query string) or POST (JSON body).

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    routing::{MethodRouter, get},
};
use serde::Deserialize;
use serde_json::Value;

use rollcall_core::{AttendanceError, Request, Response};

use crate::routes::{Envelope, envelope, rejected};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let endpoint: MethodRouter<AppState> = get(query_action).post(body_action);

    Router::new()
        .route("/", endpoint.clone())
        .route("/exec", endpoint)
}

/// Query-string transport: `?action=<name>&data=<json object>`
#[derive(Deserialize)]
pub struct ActionQuery {
    pub action: Option<String>,
    pub data: Option<String>,
}

/// GET / - Run the action named in the query string
async fn query_action(
    State(state): State<AppState>,
    query: Result<Query<ActionQuery>, QueryRejection>,
) -> Envelope {
    let Query(query) = match query {
        Ok(query) => query,
        Err(e) => return rejected(AttendanceError::Store(e.body_text())),
    };

    match Request::from_query(query.action.as_deref(), query.data.as_deref()) {
        Ok(request) => dispatch(state, request).await,
        Err(err) => rejected(err),
    }
}

/// POST / - Run the action named in the JSON body
async fn body_action(State(state): State<AppState>, body: Bytes) -> Envelope {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => return rejected(AttendanceError::Serialization(e)),
    };

    match Request::from_value(value) {
        Ok(request) => dispatch(state, request).await,
        Err(err) => rejected(err),
    }
}

/// Handlers touch the table files synchronously, so they run on the
/// blocking pool.
async fn dispatch(state: AppState, request: Request) -> Envelope {
    let action = request.action();
    tracing::info!(action, "Handling request");

    let service = state.service();
    let response = tokio::task::spawn_blocking(move || service.handle(request))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(action, error = %e, "Handler task failed");
            Response::failure(format!("Server error: {e}"))
        });

    envelope(response)
}
