//! Request construction.
//!
//! This module contains request-side encoding:
//! - [`flatten`] / [`attachments`]: parameter reflection for multipart forms
//! - [`MultipartBuilder`]: `multipart/form-data` bodies
//! - [`RequestConstructor`]: JSON vs multipart selection per call

mod constructor;
mod multipart;
mod reflect;

pub use constructor::{DefaultConstructor, RequestConstructor};
pub use multipart::{DEFAULT_BOUNDARY, MultipartBuilder};
pub use reflect::{ReflectError, StringFields, attachments, flatten};
