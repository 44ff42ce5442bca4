//! Encoded request payloads.

use bytes::Bytes;
use http::HeaderValue;

/// MIME type of a JSON request body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// MIME type of a multipart form request body (without the boundary).
pub const CONTENT_TYPE_MULTIPART: &str = "multipart/form-data";

/// Content type of an encoded request body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `application/json`.
    Json,
    /// `multipart/form-data` with the boundary separating the parts.
    Multipart { boundary: String },
}

impl ContentType {
    /// Whether this is the JSON content type.
    pub fn is_json(&self) -> bool {
        matches!(self, ContentType::Json)
    }

    /// Whether this is a multipart form content type.
    pub fn is_multipart(&self) -> bool {
        matches!(self, ContentType::Multipart { .. })
    }

    /// Short encoding name (for tracing/debugging).
    pub fn encoding_name(&self) -> &'static str {
        match self {
            ContentType::Json => "json",
            ContentType::Multipart { .. } => "multipart",
        }
    }

    /// Full `Content-Type` header value.
    pub fn header_string(&self) -> String {
        match self {
            ContentType::Json => CONTENT_TYPE_JSON.to_string(),
            ContentType::Multipart { boundary } => {
                format!("{CONTENT_TYPE_MULTIPART}; boundary={boundary}")
            }
        }
    }

    /// `Content-Type` header value.
    ///
    /// Boundaries produced by this crate are always valid header characters;
    /// an invalid user-supplied boundary yields `None`.
    pub fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.header_string()).ok()
    }
}

/// A fully encoded request body together with its content type.
///
/// Produced once by a request constructor and handed to a caller, which must
/// not modify it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    content_type: ContentType,
    body: Bytes,
}

impl Payload {
    /// Create a payload from a content type and body.
    pub fn new(content_type: ContentType, body: impl Into<Bytes>) -> Self {
        Self {
            content_type,
            body: body.into(),
        }
    }

    /// Create a JSON payload.
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::new(ContentType::Json, body)
    }

    /// Create a multipart payload with the given boundary.
    pub fn multipart<S: Into<String>>(boundary: S, body: impl Into<Bytes>) -> Self {
        Self::new(
            ContentType::Multipart {
                boundary: boundary.into(),
            },
            body,
        )
    }

    /// The content type.
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// The encoded body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body length in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Whether the body is empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Split into content type and body.
    pub fn into_parts(self) -> (ContentType, Bytes) {
        (self.content_type, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_header() {
        assert_eq!(ContentType::Json.header_string(), "application/json");

        let multipart = ContentType::Multipart {
            boundary: "abc123".into(),
        };
        assert_eq!(
            multipart.header_string(),
            "multipart/form-data; boundary=abc123"
        );
        assert!(multipart.header_value().is_some());
    }

    #[test]
    fn test_content_type_invalid_boundary() {
        let multipart = ContentType::Multipart {
            boundary: "bad\nboundary".into(),
        };
        assert!(multipart.header_value().is_none());
    }

    #[test]
    fn test_payload_parts() {
        let payload = Payload::json(Bytes::from_static(b"{\"n\":1}"));
        assert!(payload.content_type().is_json());
        assert_eq!(payload.len(), 7);

        let (content_type, body) = payload.into_parts();
        assert_eq!(content_type, ContentType::Json);
        assert_eq!(&body[..], b"{\"n\":1}");
    }
}
