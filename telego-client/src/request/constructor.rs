//! JSON or multipart, per call.

use serde::Serialize;
use telego_core::Payload;

use super::multipart::MultipartBuilder;
use super::reflect::{attachments, flatten};
use crate::error::BotError;
use crate::params::{Files, MethodParams};

/// Turns method parameters into an encoded payload.
///
/// Implementations provide the two encodings; [`build`](Self::build) picks
/// one per value. A value with attachments is always sent as multipart, a
/// value without as JSON. Implementations must be deterministic: the same
/// input encodes to the same bytes.
pub trait RequestConstructor: Send + Sync {
    /// Encode the full parameter structure as a JSON body.
    fn json_request<P: Serialize + ?Sized>(&self, params: &P) -> Result<Payload, BotError>;

    /// Encode flattened fields and files as a multipart form.
    fn multipart_request(
        &self,
        fields: &[(String, String)],
        files: &Files,
    ) -> Result<Payload, BotError>;

    /// Encode `params`, choosing the encoding by the presence of attachments.
    fn build<P: MethodParams + ?Sized>(&self, params: &P) -> Result<Payload, BotError> {
        match attachments(params) {
            Some(files) => {
                let fields = flatten(params)?;
                self.multipart_request(&fields, &files)
            }
            None => self.json_request(params),
        }
    }
}

/// Default encoder: `serde_json` for JSON bodies, [`MultipartBuilder`] for
/// forms.
#[derive(Clone, Debug, Default)]
pub struct DefaultConstructor {
    multipart: MultipartBuilder,
}

impl DefaultConstructor {
    /// Create a constructor with the default multipart boundary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a constructor using a custom multipart builder.
    pub fn with_multipart(multipart: MultipartBuilder) -> Self {
        Self { multipart }
    }
}

impl RequestConstructor for DefaultConstructor {
    fn json_request<P: Serialize + ?Sized>(&self, params: &P) -> Result<Payload, BotError> {
        serde_json::to_vec(params)
            .map(Payload::json)
            .map_err(|e| BotError::Encode(format!("JSON encoding failed: {}", e)))
    }

    fn multipart_request(
        &self,
        fields: &[(String, String)],
        files: &Files,
    ) -> Result<Payload, BotError> {
        self.multipart.encode(fields, files)
    }
}
