//! Client-side error types.
//!
//! - [`BotError`]: everything a single API call can fail with
//! - [`ShapeError`]: a parameter value cannot be flattened into form fields
//! - [`BuildError`]: a [`Bot`](crate::Bot) could not be constructed

use telego_core::{ApiError, TokenError};

/// Boxed error returned by construction options.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A parameter value has the wrong structural shape for flattening.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// `None` or unit where a structure is required.
    #[error("parameters are empty, expected a structure")]
    Nil,

    /// The value is not a structure.
    #[error("parameters must be a structure, got {kind}")]
    NotStruct { kind: &'static str },
}

/// Per-call error variants.
///
/// Nothing is retried or suppressed internally; each variant is surfaced to
/// the caller of [`Bot::perform`](crate::Bot::perform) as produced.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Parameters could not be flattened for a multipart request.
    #[error("invalid parameters: {0}")]
    Shape(#[from] ShapeError),

    /// JSON or multipart encoding failed (including unreadable attachments).
    #[error("encode error: {0}")]
    Encode(String),

    /// The caller failed to deliver the request or read the response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a failed envelope.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// The result does not match the requested type.
    #[error("decode error: {0}")]
    Decode(String),
}

impl BotError {
    /// The server error, if this is an [`BotError::Api`].
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            BotError::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the server reported the failure (as opposed to the client).
    pub fn is_api(&self) -> bool {
        matches!(self, BotError::Api(_))
    }
}

/// Error type for bot construction failures.
///
/// Distinct from [`BotError`]: construction errors never happen per call.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The token does not have the `<id>:<secret>` shape.
    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    /// The API base address is unusable.
    #[error("invalid API url {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: &'static str },

    /// A construction option failed; remaining options were not applied.
    #[error("option failed: {0}")]
    Option(#[source] BoxError),

    /// The default caller could not be created.
    #[error("failed to create default caller: {0}")]
    Caller(String),
}
