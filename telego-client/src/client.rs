//! Bot API client implementation.
//!
//! This module provides the main [`Bot`] type for making API calls.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use telego_core::{Envelope, Token};
#[cfg(feature = "tracing")]
use tracing::{Instrument, info_span};

use crate::builder::BotBuilder;
use crate::error::{BotError, BuildError};
use crate::params::MethodParams;
use crate::request::{DefaultConstructor, RequestConstructor};
use crate::transport::Caller;

/// Bot API client.
///
/// Holds the validated token, the API base address, the [`Caller`] and the
/// [`RequestConstructor`]. None of these change after construction, so a
/// `Bot` can be shared across tasks and used for concurrent calls.
///
/// # Example
///
/// ```ignore
/// use telego_client::Bot;
///
/// let bot = Bot::new("1234567890:aaaabbbbaaaabbbbaaaabbbbaaaabbbbccc")?;
/// let me: serde_json::Value = bot.perform("getMe", &()).await?;
/// ```
pub struct Bot<R = DefaultConstructor> {
    token: Token,
    api_url: String,
    caller: Arc<dyn Caller>,
    constructor: R,
}

impl<R> std::fmt::Debug for Bot<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("token", &self.token)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl Bot {
    /// Create a bot with default settings.
    ///
    /// # Errors
    ///
    /// Fails if the token has the wrong shape or the default caller cannot be
    /// created.
    pub fn new<S: Into<String>>(token: S) -> Result<Self, BuildError> {
        BotBuilder::new(token).build()
    }

    /// Create a builder for a bot with the given token.
    pub fn builder<S: Into<String>>(token: S) -> BotBuilder {
        BotBuilder::new(token)
    }
}

impl<R: RequestConstructor> Bot<R> {
    pub(crate) fn from_parts(
        token: Token,
        api_url: String,
        caller: Arc<dyn Caller>,
        constructor: R,
    ) -> Self {
        Self {
            token,
            api_url,
            caller,
            constructor,
        }
    }

    /// The bot's token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// API base address, without a trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Address of `method`: `<api_url>/bot<token>/<method>`.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/{}/{}", self.api_url, self.token.path_segment(), method)
    }

    /// Encode `params` and send them to `method`, returning the raw envelope.
    ///
    /// If encoding fails, the caller is not invoked. A caller error is
    /// returned unchanged. The envelope is returned whether it reports
    /// success or not.
    pub async fn construct_and_call<P>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<Envelope, BotError>
    where
        P: MethodParams + ?Sized,
    {
        let payload = self.constructor.build(params)?;

        #[cfg(feature = "tracing")]
        {
            let encoding = payload.content_type().encoding_name();
            tracing::Span::current().record("bot.encoding", encoding);
            tracing::debug!(
                content_type = %payload.content_type().header_string(),
                bytes = payload.len(),
                "request constructed"
            );
        }

        let url = self.method_url(method);
        self.caller.call(&url, &payload).await
    }

    /// Call `method` with `params` and decode its result as `T`.
    ///
    /// # Errors
    ///
    /// - [`BotError::Shape`] / [`BotError::Encode`] if `params` cannot be encoded
    /// - [`BotError::Transport`] if the caller fails
    /// - [`BotError::Api`] if the server reports a failure
    /// - [`BotError::Decode`] if the result does not match `T`
    ///
    /// # Example
    ///
    /// ```ignore
    /// let count: i64 = bot
    ///     .perform("getChatMemberCount", &json!({"chat_id": 42}))
    ///     .await?;
    /// ```
    pub async fn perform<P, T>(&self, method: &str, params: &P) -> Result<T, BotError>
    where
        P: MethodParams + ?Sized,
        T: DeserializeOwned,
    {
        let future = async {
            let result = self.call_checked(method, params).await?;
            // a successful envelope without a result decodes like `null`
            let bytes: &[u8] = result.as_deref().unwrap_or(b"null");
            serde_json::from_slice(bytes).map_err(|e| {
                BotError::Decode(format!("failed to decode result of {}: {}", method, e))
            })
        };

        #[cfg(feature = "tracing")]
        let future = future.instrument(self.call_span(method));

        future.await
    }

    /// Call `method` with `params`, ignoring any result.
    ///
    /// For methods whose result carries nothing useful. Errors are the same
    /// as [`perform`](Self::perform), minus [`BotError::Decode`].
    pub async fn perform_discard<P>(&self, method: &str, params: &P) -> Result<(), BotError>
    where
        P: MethodParams + ?Sized,
    {
        let future = async {
            self.call_checked(method, params).await?;
            Ok(())
        };

        #[cfg(feature = "tracing")]
        let future = future.instrument(self.call_span(method));

        future.await
    }

    /// Send the call and turn a failed envelope into [`BotError::Api`].
    async fn call_checked<P>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<Option<bytes::Bytes>, BotError>
    where
        P: MethodParams + ?Sized,
    {
        let envelope = self.construct_and_call(method, params).await?;
        envelope.into_result().map_err(|err| {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                api.code = err.code(),
                api.description = %err.description(),
                "api call failed"
            );
            BotError::Api(err)
        })
    }

    #[cfg(feature = "tracing")]
    fn call_span(&self, method: &str) -> tracing::Span {
        info_span!(
            "bot.call",
            bot.method = %method,
            bot.id = %self.token.bot_id(),
            bot.encoding = tracing::field::Empty,
            otel.kind = "client",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::BoxFuture;
    use std::sync::Mutex;
    use telego_core::{ApiError, Payload};

    const TOKEN: &str = "1234567890:aaaabbbbaaaabbbbaaaabbbbaaaabbbbccc";

    /// Answers every call with a fixed envelope and records the addresses.
    struct FixedCaller {
        envelope: Envelope,
        urls: Mutex<Vec<String>>,
    }

    impl FixedCaller {
        fn new(envelope: Envelope) -> Arc<Self> {
            Arc::new(Self {
                envelope,
                urls: Mutex::new(Vec::new()),
            })
        }
    }

    impl Caller for FixedCaller {
        fn call<'a>(
            &'a self,
            url: &'a str,
            _payload: &'a Payload,
        ) -> BoxFuture<'a, Result<Envelope, BotError>> {
            self.urls.lock().unwrap().push(url.to_string());
            let envelope = self.envelope.clone();
            Box::pin(async move { Ok(envelope) })
        }
    }

    fn bot_with(caller: Arc<FixedCaller>) -> Bot {
        Bot::builder(TOKEN).caller(caller).build().unwrap()
    }

    #[test]
    fn test_method_url() {
        let bot = bot_with(FixedCaller::new(Envelope::empty_success()));
        assert_eq!(
            bot.method_url("getMe"),
            format!("https://api.telegram.org/bot{}/getMe", TOKEN)
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let bot = bot_with(FixedCaller::new(Envelope::empty_success()));
        let debug = format!("{:?}", bot);
        assert!(!debug.contains("aaaabbbb"));
        assert!(debug.contains("1234567890"));
    }

    #[tokio::test]
    async fn test_perform_decodes_result() {
        let caller = FixedCaller::new(Envelope::success("1"));
        let bot = bot_with(caller.clone());

        let result: i64 = bot.perform("testMethod", &()).await.unwrap();
        assert_eq!(result, 1);
        assert_eq!(
            caller.urls.lock().unwrap().as_slice(),
            [format!("https://api.telegram.org/bot{}/testMethod", TOKEN)]
        );
    }

    #[tokio::test]
    async fn test_perform_missing_result_decodes_as_null() {
        let bot = bot_with(FixedCaller::new(Envelope::empty_success()));

        let result: Option<i64> = bot.perform("testMethod", &()).await.unwrap();
        assert_eq!(result, None);

        let err = bot.perform::<_, i64>("testMethod", &()).await.unwrap_err();
        assert!(matches!(err, BotError::Decode(_)));
    }

    #[tokio::test]
    async fn test_perform_decode_error() {
        let bot = bot_with(FixedCaller::new(Envelope::success(r#""text""#)));

        let err = bot.perform::<_, i64>("testMethod", &()).await.unwrap_err();
        assert!(matches!(err, BotError::Decode(msg) if msg.contains("testMethod")));
    }

    #[tokio::test]
    async fn test_perform_api_error() {
        let bot = bot_with(FixedCaller::new(Envelope::failure(ApiError::new(
            400,
            "Bad Request: chat not found",
        ))));

        let err = bot.perform::<_, bool>("testMethod", &()).await.unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(api.code(), 400);
        assert_eq!(api.description(), "Bad Request: chat not found");

        let err = bot.perform_discard("testMethod", &()).await.unwrap_err();
        assert!(err.is_api());
    }

    #[tokio::test]
    async fn test_perform_discard_ignores_result() {
        let bot = bot_with(FixedCaller::new(Envelope::success(r#"{"any":"thing"}"#)));
        bot.perform_discard("testMethod", &()).await.unwrap();
    }
}
