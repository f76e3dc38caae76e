use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("No backend URL configured")]
    NoUpstream,

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Proxy error");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Proxy failed" })),
        )
            .into_response()
    }
}
