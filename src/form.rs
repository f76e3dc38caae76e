//! The attendance form: field checks and normalization before submitting.

use rollcall_core::model::AttendanceStatus;
use rollcall_core::protocol::Submission;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("Roll Number is required")]
    MissingRollNumber,

    #[error("Full Name is required")]
    MissingFullName,

    #[error("Email is required")]
    MissingEmail,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please select an event")]
    MissingEvent,
}

/// Raw form input, as typed.
#[derive(Debug, Clone)]
pub struct AttendanceForm {
    pub roll_number: String,
    pub full_name: String,
    pub email: String,
    pub event_id: Option<String>,
    pub status: AttendanceStatus,
    pub notes: String,
}

impl Default for AttendanceForm {
    fn default() -> Self {
        AttendanceForm {
            roll_number: String::new(),
            full_name: String::new(),
            email: String::new(),
            event_id: None,
            status: AttendanceStatus::Present,
            notes: String::new(),
        }
    }
}

impl AttendanceForm {
    /// Checks run in field order; the first failure wins.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.roll_number.trim().is_empty() {
            return Err(FormError::MissingRollNumber);
        }
        if self.full_name.trim().is_empty() {
            return Err(FormError::MissingFullName);
        }
        if self.email.trim().is_empty() {
            return Err(FormError::MissingEmail);
        }
        if !self.email.contains('@') {
            return Err(FormError::InvalidEmail);
        }
        if self.event_id.as_deref().is_none_or(str::is_empty) {
            return Err(FormError::MissingEvent);
        }
        Ok(())
    }

    /// Validate, then trim every field, uppercase the roll number and
    /// lowercase the email.
    pub fn into_submission(self) -> Result<Submission, FormError> {
        self.validate()?;

        Ok(Submission {
            roll_number: Some(self.roll_number.trim().to_uppercase()),
            full_name: Some(self.full_name.trim().to_string()),
            email: Some(self.email.trim().to_lowercase()),
            event_id: self.event_id,
            status: Some(self.status.to_string()),
            notes: Some(self.notes.trim().to_string()),
        })
    }
}
