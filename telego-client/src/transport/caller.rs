//! The transport seam.

use std::sync::Arc;

pub use futures::future::BoxFuture;
use telego_core::{Envelope, Payload};

use crate::error::BotError;

/// Sends an encoded request and returns the decoded envelope.
///
/// Implementations must not modify `payload`. Any delivery failure is an
/// error (typically [`BotError::Transport`]); a delivered request yields the
/// envelope the server answered with, failed or not. Calls may run
/// concurrently from many tasks.
pub trait Caller: Send + Sync {
    /// Send `payload` to `url`.
    fn call<'a>(&'a self, url: &'a str, payload: &'a Payload)
    -> BoxFuture<'a, Result<Envelope, BotError>>;
}

impl<C: Caller + ?Sized> Caller for Arc<C> {
    fn call<'a>(
        &'a self,
        url: &'a str,
        payload: &'a Payload,
    ) -> BoxFuture<'a, Result<Envelope, BotError>> {
        (**self).call(url, payload)
    }
}

impl<C: Caller + ?Sized> Caller for Box<C> {
    fn call<'a>(
        &'a self,
        url: &'a str,
        payload: &'a Payload,
    ) -> BoxFuture<'a, Result<Envelope, BotError>> {
        (**self).call(url, payload)
    }
}
