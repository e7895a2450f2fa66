//! Error types shared across the crate.
//!
//! Library layers return the typed errors below; the binary and the event
//! loop wrap them with `anyhow` context.

use thiserror::Error;

use crate::app::form::FormField;
use crate::model::UserId;

/// Failure of a remote gateway call.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Connection, TLS or body decoding failure.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer; `message` is the response body.
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },
}

/// Rejected change to the directory store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate user id {0}")]
    DuplicateId(UserId),

    #[error("no user with id {0}")]
    UnknownId(UserId),
}

/// Rejected form submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{} is required", .0.label())]
    MissingField(FormField),

    #[error("a submission is already in flight")]
    Busy,
}

pub type Result<T> = std::result::Result<T, NetworkError>;
