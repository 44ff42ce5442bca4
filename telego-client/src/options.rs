//! Predefined construction options.
//!
//! Each function returns a [`BotOption`] for
//! [`BotBuilder::with_option`](crate::BotBuilder::with_option).
//!
//! ```ignore
//! use telego_client::{Bot, options};
//!
//! let bot = Bot::builder(token)
//!     .with_option(options::with_api_url("http://localhost:8081"))
//!     .with_option(options::with_timeout(Duration::from_secs(30)))
//!     .build()?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::builder::{BotConfig, BotOption, normalize_api_url};
use crate::error::BuildError;
use crate::transport::Caller;

/// Use `url` as the API base address.
///
/// Fails if the address is empty or has no scheme.
pub fn with_api_url<S: Into<String>>(url: S) -> BotOption {
    let url = url.into();
    Box::new(move |config: &mut BotConfig| {
        let url = normalize_api_url(&url)?;
        config.set_api_url(url);
        Ok(())
    })
}

/// Send requests through `caller`.
pub fn with_caller<C: Caller + 'static>(caller: C) -> BotOption {
    let caller: Arc<dyn Caller> = Arc::new(caller);
    Box::new(move |config: &mut BotConfig| {
        config.set_caller(caller);
        Ok(())
    })
}

/// Round trip deadline for the default HTTP caller.
///
/// Fails if a custom caller was installed by an earlier option.
pub fn with_timeout(timeout: Duration) -> BotOption {
    Box::new(move |config: &mut BotConfig| {
        if config.has_caller() {
            return Err(BuildError::Caller(
                "a timeout only applies to the default caller".into(),
            )
            .into());
        }
        config.set_timeout(timeout);
        Ok(())
    })
}
