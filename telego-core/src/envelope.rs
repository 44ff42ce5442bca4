//! Response envelope.
//!
//! Every API call answers with the same top-level wrapper:
//!
//! ```text
//! {"ok": true,  "result": <method-specific JSON>}
//! {"ok": false, "error_code": 400, "description": "...", "parameters": {...}}
//! ```
//!
//! A nested `"error": {"code": ..., "description": ...}` object is accepted as
//! an alternative spelling of the failure fields.

use bytes::Bytes;
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::{ApiError, ResponseParameters};

/// Envelope parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The bytes are not a JSON envelope.
    #[error("malformed response envelope: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decoded top-level response.
///
/// Exactly one of [`result`](Envelope::result) and [`error`](Envelope::error)
/// is meaningful, selected by [`is_ok`](Envelope::is_ok).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    ok: bool,
    result: Option<Bytes>,
    error: Option<ApiError>,
}

impl Envelope {
    /// A successful envelope carrying raw result JSON.
    pub fn success(result: impl Into<Bytes>) -> Self {
        Self {
            ok: true,
            result: Some(result.into()),
            error: None,
        }
    }

    /// A successful envelope without a result.
    pub fn empty_success() -> Self {
        Self {
            ok: true,
            result: None,
            error: None,
        }
    }

    /// A failed envelope.
    pub fn failure(error: ApiError) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error),
        }
    }

    /// Parse an envelope from response body bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let wire: WireEnvelope<'_> = serde_json::from_slice(bytes)?;
        Ok(wire.into_envelope())
    }

    /// The success flag.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Raw result JSON (meaningful only when [`is_ok`](Self::is_ok)).
    pub fn result(&self) -> Option<&Bytes> {
        self.result.as_ref()
    }

    /// Structured error (meaningful only when not [`is_ok`](Self::is_ok)).
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Resolve the envelope by its success flag.
    ///
    /// A failed envelope without error fields still yields an [`ApiError`]
    /// (with code `0`).
    pub fn into_result(self) -> Result<Option<Bytes>, ApiError> {
        if self.ok {
            Ok(self.result)
        } else {
            Err(self.error.unwrap_or_default())
        }
    }
}

/// JSON structure of an envelope on the wire.
#[derive(Deserialize)]
struct WireEnvelope<'a> {
    ok: bool,
    #[serde(borrow, default)]
    result: Option<&'a RawValue>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
    #[serde(default)]
    error: Option<WireError>,
}

/// Nested error object.
#[derive(Deserialize)]
struct WireError {
    #[serde(default, alias = "error_code")]
    code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
    #[serde(default)]
    retry_after: Option<u64>,
    #[serde(default)]
    migrate_to_chat_id: Option<i64>,
}

impl WireEnvelope<'_> {
    fn into_envelope(self) -> Envelope {
        if self.ok {
            return Envelope {
                ok: true,
                result: self
                    .result
                    .map(|raw| Bytes::copy_from_slice(raw.get().as_bytes())),
                error: None,
            };
        }

        let nested = self.error;
        let code = self
            .error_code
            .or_else(|| nested.as_ref().and_then(|e| e.code))
            .unwrap_or_default();
        let description = self
            .description
            .or_else(|| nested.as_ref().and_then(|e| e.description.clone()))
            .unwrap_or_default();

        let mut parameters = self
            .parameters
            .or_else(|| nested.as_ref().and_then(|e| e.parameters.clone()))
            .unwrap_or_default();
        if let Some(nested) = &nested {
            parameters.retry_after = parameters.retry_after.or(nested.retry_after);
            parameters.migrate_to_chat_id =
                parameters.migrate_to_chat_id.or(nested.migrate_to_chat_id);
        }

        Envelope::failure(ApiError::new(code, description).with_parameters(parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let env = Envelope::from_slice(br#"{"ok":true,"result":{"id":1,"is_bot":true}}"#).unwrap();
        assert!(env.is_ok());
        assert_eq!(
            env.result().map(|b| &b[..]),
            Some(&br#"{"id":1,"is_bot":true}"#[..])
        );
        assert!(env.error().is_none());
    }

    #[test]
    fn test_parse_success_scalar_result() {
        let env = Envelope::from_slice(br#"{"ok":true,"result":true}"#).unwrap();
        assert_eq!(env.into_result().unwrap().as_deref(), Some(&b"true"[..]));
    }

    #[test]
    fn test_parse_flat_error() {
        let env = Envelope::from_slice(
            br#"{"ok":false,"error_code":429,"description":"Too Many Requests: retry after 3","parameters":{"retry_after":3}}"#,
        )
        .unwrap();
        assert!(!env.is_ok());

        let err = env.into_result().unwrap_err();
        assert_eq!(err.code(), 429);
        assert_eq!(err.description(), "Too Many Requests: retry after 3");
        assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(3)));
    }

    #[test]
    fn test_parse_nested_error() {
        let env = Envelope::from_slice(
            br#"{"ok":false,"error":{"code":400,"description":"group upgraded","migrate_to_chat_id":-1001}}"#,
        )
        .unwrap();

        let err = env.error().unwrap();
        assert_eq!(err.code(), 400);
        assert_eq!(err.description(), "group upgraded");
        assert_eq!(err.migrate_to_chat_id(), Some(-1001));
    }

    #[test]
    fn test_parse_empty_error() {
        let env = Envelope::from_slice(br#"{"ok":false,"error":{}}"#).unwrap();
        let err = env.into_result().unwrap_err();
        assert_eq!(err, ApiError::default());
    }

    #[test]
    fn test_failure_without_error_resolves_to_default() {
        let env = Envelope {
            ok: false,
            result: None,
            error: None,
        };
        assert_eq!(env.into_result(), Err(ApiError::default()));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(Envelope::from_slice(b"<html>bad gateway</html>").is_err());
        assert!(Envelope::from_slice(br#"{"result":1}"#).is_err());
    }
}
