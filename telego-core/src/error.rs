//! Server-reported API errors.
//!
//! - [`ApiError`]: the structured error carried by a failed envelope
//! - [`ResponseParameters`]: optional hints (retry delay, chat migration)

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Hints attached to an error response that tell the client how the
/// request could still succeed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseParameters {
    /// The group has been migrated to a supergroup with this identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
    /// Seconds left to wait before the request can be repeated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ResponseParameters {
    /// Whether no hint is present.
    pub fn is_empty(&self) -> bool {
        self.migrate_to_chat_id.is_none() && self.retry_after.is_none()
    }
}

/// Error reported by the remote API through a failed envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiError {
    code: i64,
    description: String,
    parameters: Option<ResponseParameters>,
}

impl ApiError {
    /// Create an error with a code and description.
    pub fn new<S: Into<String>>(code: i64, description: S) -> Self {
        Self {
            code,
            description: description.into(),
            parameters: None,
        }
    }

    /// Attach response hints. Empty hints are dropped.
    pub fn with_parameters(mut self, parameters: ResponseParameters) -> Self {
        self.parameters = (!parameters.is_empty()).then_some(parameters);
        self
    }

    /// Numeric error code (HTTP-like; `0` when the server sent none).
    pub fn code(&self) -> i64 {
        self.code
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Response hints, if any.
    pub fn parameters(&self) -> Option<&ResponseParameters> {
        self.parameters.as_ref()
    }

    /// Delay the server asked for before repeating the request.
    pub fn retry_after(&self) -> Option<Duration> {
        self.parameters
            .as_ref()
            .and_then(|p| p.retry_after)
            .map(Duration::from_secs)
    }

    /// Supergroup the chat was migrated to.
    pub fn migrate_to_chat_id(&self) -> Option<i64> {
        self.parameters.as_ref().and_then(|p| p.migrate_to_chat_id)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if !self.description.is_empty() {
            write!(f, " {:?}", self.description)?;
        }
        if let Some(chat_id) = self.migrate_to_chat_id() {
            write!(f, ", migrate to chat id: {chat_id}")?;
        }
        if let Some(retry) = self.parameters.as_ref().and_then(|p| p.retry_after) {
            write!(f, ", retry after: {retry}s")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
