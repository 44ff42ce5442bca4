//! `multipart/form-data` encoding.
//!
//! This module provides [`MultipartBuilder`], which encodes string fields and
//! file attachments into a single form body.
//!
//! # Body Layout
//!
//! ```text
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="<field>"\r\n
//! \r\n
//! <value>\r\n
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="<field>"; filename="<name>"\r\n
//! Content-Type: application/octet-stream\r\n
//! \r\n
//! <bytes>\r\n
//! --<boundary>--\r\n
//! ```
//!
//! String fields come first in the given order, then files in name order. The
//! boundary is derived from the content rather than randomized, so the same
//! input always yields the same bytes.

use std::collections::HashSet;

use bytes::{BufMut, Bytes, BytesMut};
use telego_core::Payload;

use crate::error::BotError;
use crate::params::Files;

/// Default boundary prefix.
pub const DEFAULT_BOUNDARY: &str = "telego-form-boundary-6b1d3f0e9a2c";

const CRLF: &[u8] = b"\r\n";

/// Builds multipart form payloads.
#[derive(Clone, Debug)]
pub struct MultipartBuilder {
    boundary: String,
}

impl Default for MultipartBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartBuilder {
    /// Create a builder with [`DEFAULT_BOUNDARY`].
    pub fn new() -> Self {
        Self {
            boundary: DEFAULT_BOUNDARY.to_string(),
        }
    }

    /// Use a custom boundary prefix.
    ///
    /// The prefix must be 1 to 60 characters of `[A-Za-z0-9'()+_,-./:=?]`.
    pub fn with_boundary<S: Into<String>>(boundary: S) -> Result<Self, BotError> {
        let boundary = boundary.into();
        if !is_valid_boundary(&boundary) {
            return Err(BotError::Encode(format!(
                "invalid multipart boundary {:?}",
                boundary
            )));
        }
        Ok(Self { boundary })
    }

    /// Boundary prefix used for new payloads.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Encode fields and files into a multipart payload.
    ///
    /// Each file is read exactly once. An unreadable file fails the whole
    /// payload.
    pub fn encode(&self, fields: &[(String, String)], files: &Files) -> Result<Payload, BotError> {
        let mut parts = Vec::with_capacity(files.len());
        for (name, file) in files {
            let data = file.read().map_err(|e| {
                BotError::Encode(format!(
                    "failed to read attachment {:?} ({}): {}",
                    name,
                    file.filename(),
                    e
                ))
            })?;
            parts.push((name.as_str(), file.filename(), data));
        }

        let boundary = self.pick_boundary(fields, &parts);

        let mut body = BytesMut::new();
        for (name, value) in fields {
            write_part_header(&mut body, &boundary, name, None);
            body.put_slice(value.as_bytes());
            body.put_slice(CRLF);
        }
        for (name, filename, data) in &parts {
            write_part_header(&mut body, &boundary, name, Some(*filename));
            body.put_slice(data);
            body.put_slice(CRLF);
        }
        body.put_slice(b"--");
        body.put_slice(boundary.as_bytes());
        body.put_slice(b"--");
        body.put_slice(CRLF);

        Ok(Payload::multipart(boundary, body.freeze()))
    }

    /// First of `prefix`, `prefix1`, `prefix2`, ... absent from every part.
    ///
    /// Every part is scanned once for the prefix. Each digit run following a
    /// match rules out the suffixes it spells, and the smallest free one wins.
    fn pick_boundary(&self, fields: &[(String, String)], parts: &[(&str, &str, Bytes)]) -> String {
        let prefix = self.boundary.as_bytes();
        let mut taken = HashSet::new();
        let mut found = false;

        for (name, value) in fields {
            found |= scan_suffixes(name.as_bytes(), prefix, &mut taken);
            found |= scan_suffixes(value.as_bytes(), prefix, &mut taken);
        }
        for (name, filename, data) in parts {
            found |= scan_suffixes(name.as_bytes(), prefix, &mut taken);
            found |= scan_suffixes(filename.as_bytes(), prefix, &mut taken);
            found |= scan_suffixes(data, prefix, &mut taken);
        }

        if !found {
            return self.boundary.clone();
        }
        let suffix = (1u64..).find(|n| !taken.contains(n)).unwrap_or_default();
        format!("{}{}", self.boundary, suffix)
    }
}

/// Longest digit run read after a prefix match.
const MAX_SUFFIX_DIGITS: usize = 18;

/// Record in `taken` every suffix that `prefix` followed by digits spells in
/// `haystack`. Returns whether `prefix` occurs at all.
fn scan_suffixes(haystack: &[u8], prefix: &[u8], taken: &mut HashSet<u64>) -> bool {
    if prefix.is_empty() || haystack.len() < prefix.len() {
        return false;
    }

    let mut found = false;
    for start in 0..=haystack.len() - prefix.len() {
        if &haystack[start..start + prefix.len()] != prefix {
            continue;
        }
        found = true;

        let digits = &haystack[start + prefix.len()..];
        // suffixes are written without leading zeros
        if digits.first() == Some(&b'0') {
            continue;
        }
        let mut suffix = 0u64;
        for &digit in digits
            .iter()
            .take(MAX_SUFFIX_DIGITS)
            .take_while(|b| b.is_ascii_digit())
        {
            suffix = suffix * 10 + u64::from(digit - b'0');
            taken.insert(suffix);
        }
    }
    found
}

fn write_part_header(body: &mut BytesMut, boundary: &str, name: &str, filename: Option<&str>) {
    body.put_slice(b"--");
    body.put_slice(boundary.as_bytes());
    body.put_slice(CRLF);
    body.put_slice(b"Content-Disposition: form-data; name=\"");
    body.put_slice(escape_quoted(name).as_bytes());
    body.put_slice(b"\"");
    if let Some(filename) = filename {
        body.put_slice(b"; filename=\"");
        body.put_slice(escape_quoted(filename).as_bytes());
        body.put_slice(b"\"");
        body.put_slice(CRLF);
        body.put_slice(b"Content-Type: application/octet-stream");
    }
    body.put_slice(CRLF);
    body.put_slice(CRLF);
}

/// Percent-escape characters that would end a quoted header parameter.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// RFC 2046 boundary characters, leaving room for a collision suffix.
fn is_valid_boundary(boundary: &str) -> bool {
    const SPECIALS: &[u8] = b"'()+_,-./:=?";
    (1..=60).contains(&boundary.len())
        && boundary
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || SPECIALS.contains(&b))
}
