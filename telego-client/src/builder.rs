//! Bot builder.
//!
//! Provides a fluent API for configuring and building a [`Bot`].

use std::sync::Arc;
use std::time::Duration;

use telego_core::Token;

use crate::client::Bot;
use crate::error::{BoxError, BuildError};
use crate::request::{DefaultConstructor, RequestConstructor};
use crate::transport::{Caller, HyperCaller};

/// Default API base address.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// A construction option.
///
/// Options run in the order they were added, after the token has been
/// validated. The first failing option aborts construction.
pub type BotOption = Box<dyn FnOnce(&mut BotConfig) -> Result<(), BoxError> + Send>;

/// Mutable settings that construction options operate on.
pub struct BotConfig {
    api_url: String,
    caller: Option<Arc<dyn Caller>>,
    timeout: Option<Duration>,
}

impl BotConfig {
    fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            caller: None,
            timeout: None,
        }
    }

    /// Current API base address.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Replace the API base address.
    pub fn set_api_url<S: Into<String>>(&mut self, url: S) {
        self.api_url = url.into();
    }

    /// Whether a custom caller has been installed.
    pub fn has_caller(&self) -> bool {
        self.caller.is_some()
    }

    /// Install a custom caller, replacing the default HTTP caller.
    pub fn set_caller(&mut self, caller: Arc<dyn Caller>) {
        self.caller = Some(caller);
    }

    /// Round trip deadline for the default HTTP caller.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Set the round trip deadline for the default HTTP caller.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("api_url", &self.api_url)
            .field("caller", &self.caller.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for creating a [`Bot`].
///
/// # Example
///
/// ```ignore
/// use telego_client::{BotBuilder, options};
///
/// let bot = BotBuilder::new("1234567890:aaaabbbbaaaabbbbaaaabbbbaaaabbbbccc")
///     .with_option(options::with_api_url("http://localhost:8081"))
///     .build()?;
/// ```
pub struct BotBuilder<R = DefaultConstructor> {
    token: String,
    config: BotConfig,
    constructor: R,
    options: Vec<BotOption>,
}

impl<R> std::fmt::Debug for BotBuilder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotBuilder")
            .field("config", &self.config)
            .field("options", &self.options.len())
            .finish_non_exhaustive()
    }
}

impl BotBuilder {
    /// Create a builder for the given token.
    ///
    /// The token is validated by [`build`](Self::build), not here.
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self {
            token: token.into(),
            config: BotConfig::new(),
            constructor: DefaultConstructor::new(),
            options: Vec::new(),
        }
    }
}

impl<R: RequestConstructor> BotBuilder<R> {
    /// Set the API base address.
    ///
    /// Default: `https://api.telegram.org`. A trailing `/` is stripped.
    pub fn api_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.set_api_url(url);
        self
    }

    /// Use a custom caller instead of the default HTTP caller.
    pub fn caller<C: Caller + 'static>(mut self, caller: C) -> Self {
        self.config.set_caller(Arc::new(caller));
        self
    }

    /// Set the round trip deadline of the default HTTP caller.
    ///
    /// Cannot be combined with a custom caller; configure the deadline on
    /// that caller instead.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.set_timeout(timeout);
        self
    }

    /// Use a custom request constructor.
    pub fn request_constructor<C: RequestConstructor>(self, constructor: C) -> BotBuilder<C> {
        BotBuilder {
            token: self.token,
            config: self.config,
            constructor,
            options: self.options,
        }
    }

    /// Add a construction option.
    ///
    /// Options are applied in the order they are added.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let bot = Bot::builder(token)
    ///     .with_option(|config: &mut BotConfig| {
    ///         config.set_api_url("http://localhost:8081");
    ///         Ok(())
    ///     })
    ///     .build()?;
    /// ```
    pub fn with_option<F>(mut self, option: F) -> Self
    where
        F: FnOnce(&mut BotConfig) -> Result<(), BoxError> + Send + 'static,
    {
        self.options.push(Box::new(option));
        self
    }

    /// Build the bot.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidToken`] if the token has the wrong shape
    /// - [`BuildError::Option`] if an option fails; later options are skipped
    /// - [`BuildError::InvalidApiUrl`] if the final base address is unusable
    /// - [`BuildError::Caller`] if the default caller cannot be created
    pub fn build(self) -> Result<Bot<R>, BuildError> {
        let token = Token::new(self.token)?;

        let mut config = self.config;
        for option in self.options {
            option(&mut config).map_err(BuildError::Option)?;
        }

        let api_url = normalize_api_url(&config.api_url)?;

        let caller: Arc<dyn Caller> = match (config.caller, config.timeout) {
            (Some(caller), None) => caller,
            (Some(_), Some(_)) => {
                return Err(BuildError::Caller(
                    "a timeout only applies to the default caller".into(),
                ));
            }
            (None, timeout) => {
                let mut builder = HyperCaller::builder();
                if let Some(timeout) = timeout {
                    builder = builder.timeout(timeout);
                }
                Arc::new(
                    builder
                        .build()
                        .map_err(|e| BuildError::Caller(e.to_string()))?,
                )
            }
        };

        Ok(Bot::from_parts(token, api_url, caller, self.constructor))
    }
}

/// Check an API base address and strip trailing slashes.
pub(crate) fn normalize_api_url(url: &str) -> Result<String, BuildError> {
    let invalid = |reason| BuildError::InvalidApiUrl {
        url: url.to_string(),
        reason,
    };

    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(invalid("address is empty"));
    }
    match trimmed.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() && !rest.is_empty() => {
            Ok(trimmed.to_string())
        }
        _ => Err(invalid("address must include a scheme and host")),
    }
}
