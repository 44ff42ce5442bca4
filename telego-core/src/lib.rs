//! Core wire types for the telego bot API client.
//!
//! This crate provides the types shared by the request core
//! (`telego-client`) and any transport implementation.
//!
//! ## Modules
//!
//! - [`token`]: Bot credential and its shape validation
//! - [`payload`]: Encoded request bodies and their content types
//! - [`envelope`]: The `{ok, result | error}` response wrapper
//! - [`error`]: Server-reported API errors

mod envelope;
mod error;
mod payload;
mod token;

pub use envelope::*;
pub use error::*;
pub use payload::*;
pub use token::*;
