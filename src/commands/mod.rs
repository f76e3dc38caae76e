pub mod add_event;
pub mod dashboard;
pub mod events;
pub mod export;
pub mod login;
pub mod submit;

/// Seconds between dashboard refreshes in watch mode
pub const POLL_INTERVAL_SECS: u64 = 10;
