//! Bot credential.
//!
//! A token has the shape `<numeric-id>:<secret>` where the secret is exactly
//! [`SECRET_LEN`] characters drawn from `[A-Za-z0-9_-]`. The shape is checked
//! once, when the [`Token`] is created; no network call is made to verify it.

use std::fmt;
use std::str::FromStr;

/// Length of the secret part of a token.
pub const SECRET_LEN: usize = 35;

/// Token shape errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token is an empty string.
    #[error("token is empty")]
    Empty,

    /// No `:` between the bot id and the secret.
    #[error("token has no ':' separator")]
    MissingSeparator,

    /// The bot id is empty or not made of decimal digits.
    #[error("token bot id must be a non-empty decimal number")]
    InvalidId,

    /// The secret has the wrong length or contains a forbidden character.
    #[error("token secret must be {SECRET_LEN} characters of [A-Za-z0-9_-], got {len}")]
    InvalidSecret { len: usize },
}

/// Validated bot credential.
///
/// The `Debug` implementation never prints the secret.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Validate `token` and wrap it.
    ///
    /// # Example
    ///
    /// ```
    /// use telego_core::Token;
    ///
    /// assert!(Token::new("1234567890:aaaabbbbaaaabbbbaaaabbbbaaaabbbbccc").is_ok());
    /// assert!(Token::new("invalid-token").is_err());
    /// ```
    pub fn new<S: Into<String>>(token: S) -> Result<Self, TokenError> {
        let token = token.into();
        validate(&token)?;
        Ok(Self(token))
    }

    /// The raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric bot id (the part before `:`).
    pub fn bot_id(&self) -> &str {
        // validated: the separator is always present
        self.0.split_once(':').map_or("", |(id, _)| id)
    }

    /// Path segment identifying the bot in a request address: `bot<token>`.
    pub fn path_segment(&self) -> String {
        format!("bot{}", self.0)
    }

    /// Token form safe to log: `<id>:<redacted>`.
    pub fn redacted(&self) -> String {
        format!("{}:<redacted>", self.bot_id())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.redacted()).finish()
    }
}

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Token::new(s)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Check `token` against `^\d+:[A-Za-z0-9_-]{35}$`.
pub fn validate(token: &str) -> Result<(), TokenError> {
    if token.is_empty() {
        return Err(TokenError::Empty);
    }

    let (id, secret) = token.split_once(':').ok_or(TokenError::MissingSeparator)?;

    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TokenError::InvalidId);
    }

    // byte-wise ASCII scan: any multi-byte UTF-8 sequence fails it
    let secret_ok = secret
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if secret.len() != SECRET_LEN || !secret_ok {
        return Err(TokenError::InvalidSecret { len: secret.len() });
    }

    Ok(())
}
