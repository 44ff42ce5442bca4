//! Bot API client core for Rust.
//!
//! This crate turns typed method parameters into HTTP requests, sends them
//! through a pluggable [`Caller`] and decodes the `{ok, result | error}`
//! response envelope into a typed result.
//!
//! ## Features
//!
//! - JSON bodies for plain parameters
//! - `multipart/form-data` bodies for parameters carrying file uploads
//! - Deterministic encoding: the same value always yields the same bytes
//! - Token shape validation at construction time
//! - Functional construction options
//! - Pluggable transport ([`Caller`]) and encoder ([`RequestConstructor`])
//!
//! ## Example
//!
//! ```ignore
//! use telego_client::{Bot, SendMessageParams};
//!
//! let bot = Bot::new("1234567890:aaaabbbbaaaabbbbaaaabbbbaaaabbbbccc")?;
//!
//! let me = bot.get_me().await?;
//! println!("running as @{:?}", me.username);
//!
//! bot.send_message(&SendMessageParams::new(42i64, "hello")).await?;
//! ```
//!
//! ## Custom Methods
//!
//! Any `Serialize` type implementing [`MethodParams`] can be sent:
//!
//! ```ignore
//! use serde::Serialize;
//! use telego_client::MethodParams;
//!
//! #[derive(Serialize)]
//! struct SetChatTitle {
//!     chat_id: i64,
//!     title: String,
//! }
//!
//! impl MethodParams for SetChatTitle {}
//!
//! let changed: bool = bot
//!     .perform("setChatTitle", &SetChatTitle { chat_id: 42, title: "News".into() })
//!     .await?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description | Dependencies |
//! |---------|-------------|--------------|
//! | `tls` (default) | `tls-ring` + `tls-native-roots` | |
//! | `tls-ring` / `tls-aws-lc` | rustls crypto provider | `rustls` |
//! | `tls-native-roots` / `tls-webpki-roots` | Root certificates | `rustls-native-certs` / `webpki-roots` |
//! | `tracing` (default) | Spans and events for API calls | `tracing` |
//!
//! When `tracing` is enabled, each call creates a `bot.call` span with:
//! - `bot.method`: API method name (e.g. "sendMessage")
//! - `bot.id`: numeric part of the token
//! - `bot.encoding`: request encoding ("json" or "multipart")
//! - `otel.kind`: "client"
//!
//! The token secret is never recorded.

mod builder;
mod client;
mod error;
mod methods;
pub mod options;
mod params;
pub mod request;
pub mod transport;

// Re-export main types
pub use builder::{BotBuilder, BotConfig, BotOption, DEFAULT_API_URL};
pub use client::Bot;
pub use error::{BotError, BoxError, BuildError, ShapeError};
pub use methods::{
    Chat, ChatId, Document, Message, SendDocumentParams, SendMessageParams, User,
};
pub use params::{Files, InputFile, MethodParams};
pub use request::{DefaultConstructor, MultipartBuilder, RequestConstructor};
pub use transport::{Caller, HyperCaller, HyperCallerBuilder};

// Re-export core types
pub use telego_core::{
    ApiError, ContentType, Envelope, EnvelopeError, Payload, ResponseParameters, Token,
    TokenError,
};
