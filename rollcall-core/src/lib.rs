//! Core of the rollcall attendance system.
//!
//! This crate holds everything the server, the relay and the terminal
//! client share:
//! - `model` and `protocol` for the data and wire types
//! - `store` for the row-oriented tables and `session` for login tokens
//! - `service` with one handler per action

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod protocol;
pub mod service;
pub mod session;
pub mod store;

pub use error::{AttendanceError, AttendanceResult};
pub use protocol::{Request, Response};
pub use service::AttendanceService;
