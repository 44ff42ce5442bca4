//! Method parameters and file attachments.
//!
//! Any `Serialize` type can be sent as method parameters once it implements
//! [`MethodParams`]. Wire names and omission follow its serde attributes:
//! `#[serde(rename = "...")]` picks the field name and
//! `#[serde(skip_serializing_if = "...")]` omits a field holding its empty
//! value. Only the field's own value is checked; nested emptiness is not.
//!
//! Types carrying uploads override [`MethodParams::file_parameters`]. A value
//! with at least one attachment is always sent as a multipart form, any other
//! value as a JSON body.
//!
//! ```ignore
//! #[derive(Serialize)]
//! struct SendDocument {
//!     chat_id: i64,
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     caption: Option<String>,
//!     #[serde(skip)]
//!     document: InputFile,
//! }
//!
//! impl MethodParams for SendDocument {
//!     fn file_parameters(&self) -> Files {
//!         Files::from([("document".to_string(), self.document.clone())])
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;

/// Attachments keyed by form field name.
pub type Files = BTreeMap<String, InputFile>;

/// Parameters of an API method.
pub trait MethodParams: Serialize {
    /// Files to upload with this value.
    ///
    /// Must not consume or alter the value: it is serialized afterwards.
    fn file_parameters(&self) -> Files {
        Files::new()
    }
}

impl MethodParams for () {}

impl MethodParams for serde_json::Value {}

impl<T: MethodParams + ?Sized> MethodParams for &T {
    fn file_parameters(&self) -> Files {
        (**self).file_parameters()
    }
}

impl<T: MethodParams + ?Sized> MethodParams for Box<T> {
    fn file_parameters(&self) -> Files {
        (**self).file_parameters()
    }
}

impl<T: MethodParams + ?Sized> MethodParams for Arc<T> {
    fn file_parameters(&self) -> Files {
        (**self).file_parameters()
    }
}

/// Content of an upload.
#[derive(Clone, Debug, PartialEq, Eq)]
enum FileSource {
    Memory(Bytes),
    Path(PathBuf),
}

/// A named file to upload.
///
/// Path-backed files are read once, while the request is encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputFile {
    filename: String,
    source: FileSource,
}

impl InputFile {
    /// Upload in-memory content under `filename`.
    pub fn from_bytes<S: Into<String>>(filename: S, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            source: FileSource::Memory(data.into()),
        }
    }

    /// Upload the file at `path`, named after its last path component.
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            filename,
            source: FileSource::Path(path),
        }
    }

    /// Override the file name sent to the server.
    pub fn with_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = filename.into();
        self
    }

    /// File name sent to the server.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Backing path, for path-backed files.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Path(path) => Some(path),
            FileSource::Memory(_) => None,
        }
    }

    /// Load the content.
    pub(crate) fn read(&self) -> std::io::Result<Bytes> {
        match &self.source {
            FileSource::Memory(data) => Ok(data.clone()),
            FileSource::Path(path) => std::fs::read(path).map(Bytes::from),
        }
    }
}
