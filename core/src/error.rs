//! Domain error type for dashboard operations.

use std::fmt;

use thiserror::Error;

/// Typed error enum for dashboard operations, allowing callers to match on
/// specific failure modes instead of inspecting opaque `anyhow::Error` messages.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Transport failure: connect, timeout, or body read.
    #[error("{0}")]
    Network(String),

    /// The server answered but refused the request, either with a non-2xx
    /// status or with `success != 1` in the envelope.
    #[error("{message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },

    /// Response body did not match the expected envelope.
    #[error("Unexpected response from server: {0}")]
    InvalidResponse(String),

    /// One or more form fields failed validation. Blocks submission.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Operation not allowed in the current page state.
    #[error("{0}")]
    InvalidState(String),

    /// Unexpected error from internal subsystems.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DashboardError::Network("Request timed out. Check your connection and try again.".into())
        } else if err.is_connect() {
            DashboardError::Network(format!("Could not reach the server: {err}"))
        } else {
            DashboardError::Network(err.to_string())
        }
    }
}

impl DashboardError {
    /// The server refused the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DashboardError::Rejected { status: Some(401), .. })
    }
}

/// Alias for `std::result::Result<T, DashboardError>`.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// A single field that failed validation, shown inline next to the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field failures for one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Message for a specific field, if it failed.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(value)` when nothing was pushed, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}
