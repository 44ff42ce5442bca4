//! Request dispatch.
//!
//! This module provides the [`Caller`] seam through which every encoded
//! request is sent, and [`HyperCaller`], the default HTTP implementation using
//! hyper_util's legacy client. It supports:
//!
//! - HTTP/1.1 and HTTP/2 with automatic protocol negotiation
//! - TLS with rustls (feature-gated)
//! - An optional per-request deadline
//!
//! # Feature Flags
//!
//! TLS support requires enabling the appropriate features:
//!
//! - `tls` (default) - Enables `tls-ring` + `tls-native-roots` for convenience
//! - `tls-ring` / `tls-aws-lc` - Crypto providers
//! - `tls-native-roots` / `tls-webpki-roots` - Root certificates
//!
//! # Example
//!
//! ```ignore
//! use telego_client::transport::HyperCaller;
//! use std::time::Duration;
//!
//! let caller = HyperCaller::builder()
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//!
//! let bot = Bot::builder(token).caller(caller).build()?;
//! ```

mod caller;
mod connector;
mod hyper;

pub use caller::{BoxFuture, Caller};
pub use connector::{build_https_connector, default_tls_config, has_tls_support};
pub use hyper::{HyperCaller, HyperCallerBuilder};

// Re-export rustls types that users might need for TLS configuration
pub use rustls::ClientConfig as TlsClientConfig;
