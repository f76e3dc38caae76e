pub mod actions;

use axum::Json;
use rollcall_core::{AttendanceError, Response};

/// Every outcome, failures included, is a 200 with a JSON envelope.
pub type Envelope = Json<Response>;

pub fn envelope(response: Response) -> Envelope {
    Json(response)
}

/// Envelope for a request that never reached a handler.
pub fn rejected(err: AttendanceError) -> Envelope {
    tracing::warn!(error = %err, "Rejected request");
    Json(Response::from(err))
}
