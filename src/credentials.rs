//! Consumer and token credential value objects.
//!
//! Both types are immutable key/secret pairs compared by value. A [`Token`]
//! has no internal notion of being a request token or an access token; the
//! distinction lives entirely in the context in which the data store issued
//! or resolved it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::util::encode;

/// A registered client application's identity.
///
/// Immutable after construction; equality is by value.
///
/// # Security
///
/// The `Debug` implementation masks the secret to keep it out of logs.
/// The `Display` implementation does include it, matching the canonical
/// textual form `Consumer[key=K,secret=S]`, and should never be logged.
///
/// # Example
///
/// ```rust
/// use oauth1a::Consumer;
///
/// let consumer = Consumer::new("key", "secret");
/// assert_eq!(consumer.key(), "key");
/// assert_eq!(consumer.to_string(), "Consumer[key=key,secret=secret]");
/// assert_eq!(format!("{consumer:?}"), "Consumer { key: \"key\", secret: \"*****\" }");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
    key: String,
    secret: String,
}

impl Consumer {
    /// Creates a consumer identity from its key and shared secret.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// The public consumer key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The shared secret used to derive signing keys.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Display for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Consumer[key={},secret={}]", self.key, self.secret)
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("key", &self.key)
            .field("secret", &"*****")
            .finish()
    }
}

/// A delegated credential granted by an end user.
///
/// The same shape serves both request tokens and access tokens; the data
/// store decides which kind a given key resolves to.
///
/// # Example
///
/// ```rust
/// use oauth1a::Token;
///
/// let token = Token::new("tok en", "s3cret");
/// assert_eq!(token.to_query_string(), "oauth_token=tok%20en&oauth_token_secret=s3cret");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    key: String,
    secret: String,
}

impl Token {
    /// Creates a token credential from its key and shared secret.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// The public token key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The token secret used to derive signing keys.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Renders the token in the form a server returns when issuing it:
    /// `oauth_token=K&oauth_token_secret=S`, with both values
    /// percent-encoded.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        format!(
            "oauth_token={}&oauth_token_secret={}",
            encode(&self.key),
            encode(&self.secret),
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token[key={},secret={}]", self.key, self.secret)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("key", &self.key)
            .field("secret", &"*****")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_display_form() {
        let consumer = Consumer::new("key", "secret");
        assert_eq!(consumer.to_string(), "Consumer[key=key,secret=secret]");
    }

    #[test]
    fn test_token_display_form() {
        let token = Token::new("key", "secret");
        assert_eq!(token.to_string(), "Token[key=key,secret=secret]");
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Consumer::new("k", "s"), Consumer::new("k", "s"));
        assert_ne!(Consumer::new("k", "s"), Consumer::new("k", "other"));
        assert_eq!(Token::new("k", "s"), Token::new("k", "s"));
        assert_ne!(Token::new("k", "s"), Token::new("other", "s"));
    }

    #[test]
    fn test_debug_masks_secret() {
        let consumer = Consumer::new("k", "hunter2");
        let token = Token::new("k", "hunter2");
        assert!(!format!("{consumer:?}").contains("hunter2"));
        assert!(!format!("{token:?}").contains("hunter2"));
    }

    #[test]
    fn test_token_query_string_encodes_values() {
        let token = Token::new("a key", "s&s");
        assert_eq!(
            token.to_query_string(),
            "oauth_token=a%20key&oauth_token_secret=s%26s",
        );
    }

    #[test]
    fn test_credentials_round_trip_through_serde() {
        let token = Token::new("k", "s");
        let json = serde_json::to_string(&token).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(token, back);
    }
}
