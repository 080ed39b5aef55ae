//! Error types.
//!
//! Store operations never return these; slot failures are logged inside the
//! store. They surface from the slot implementations themselves and from the
//! portal actions in `api`.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("slot `{slot}` I/O failed: {source}")]
    Io {
        slot: String,
        #[source]
        source: io::Error,
    },

    #[error("slot `{slot}` quota exceeded: {size} bytes over limit of {quota} bytes")]
    QuotaExceeded {
        slot: String,
        size: usize,
        quota: usize,
    },

    #[error("slot `{slot}` rejected the write")]
    WriteRejected { slot: String },

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SlotError {
    pub(crate) fn io(slot: &str, source: io::Error) -> Self {
        SlotError::Io {
            slot: slot.to_string(),
            source,
        }
    }
}

/// Failures of the consumer-side actions (punching, payroll, staff)
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PortalError {
    #[error("already checked in today")]
    AlreadyCheckedIn,

    #[error("no active check-in found for today")]
    NotCheckedIn,

    #[error("no user with id `{0}`")]
    UnknownUser(String),

    #[error("no task with id `{0}`")]
    UnknownTask(String),

    #[error("a user with email `{0}` already exists")]
    DuplicateEmail(String),

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must be a non-negative amount, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },
}
