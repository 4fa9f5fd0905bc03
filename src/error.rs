//! Error types for the OAuth 1.0a core.
//!
//! This module contains the single error enum used throughout the crate.
//! Every verification failure carries one taxonomy kind plus enough context
//! to produce an actionable message. Callers are expected to branch on the
//! variant, never on message text.
//!
//! # Example
//!
//! ```rust
//! use oauth1a::OAuthError;
//!
//! let error = OAuthError::MissingParameter {
//!     name: "oauth_nonce".to_string(),
//! };
//! assert!(error.to_string().contains("oauth_nonce"));
//! ```

use thiserror::Error;

/// Errors that can occur while building or verifying an OAuth 1.0a request.
///
/// All failures are terminal and surfaced synchronously; the core never
/// retries. Reference servers map every variant to an HTTP 401-equivalent
/// response, but that mapping belongs to the transport adapter.
///
/// # Thread Safety
///
/// `OAuthError` is `Send + Sync`, making it safe to use across async
/// boundaries in a transport adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OAuthError {
    /// A mandatory `oauth_*` parameter is absent from the request.
    #[error("Missing required parameter '{name}'.")]
    MissingParameter {
        /// Name of the absent parameter.
        name: String,
    },

    /// The request carries an `oauth_version` other than `1.0`.
    ///
    /// An absent version parameter is accepted and treated as `1.0`;
    /// only an explicit different value is rejected.
    #[error("OAuth version '{version}' is not supported. Only version 1.0 is accepted.")]
    UnsupportedVersion {
        /// The version string presented by the client.
        version: String,
    },

    /// The request names a signature method the server has not registered.
    #[error("Signature method '{name}' is not registered with this server.")]
    UnknownSignatureMethod {
        /// The `oauth_signature_method` value presented by the client.
        name: String,
    },

    /// The consumer key could not be resolved by the data store.
    #[error("Consumer key '{key}' is not recognized.")]
    InvalidConsumer {
        /// The unresolvable consumer key.
        key: String,
    },

    /// The token key could not be resolved by the data store.
    #[error("Token '{key}' could not be resolved.")]
    InvalidToken {
        /// The unresolvable token key.
        key: String,
    },

    /// A token of the wrong kind was presented for this operation.
    ///
    /// Raised when a protected-resource request is signed with a request
    /// token, when an access-token exchange names an access token, or when
    /// a new-request-token request is signed with any token at all.
    #[error("A token of the wrong kind was presented for this operation.")]
    TokenTypeMismatch,

    /// The `oauth_timestamp` is malformed or outside the accepted window.
    #[error("Timestamp '{timestamp}' is expired or malformed.")]
    TimestampOutOfRange {
        /// The timestamp string presented by the client.
        timestamp: String,
    },

    /// The nonce has already been seen for this consumer/token pair.
    #[error("Nonce '{nonce}' has already been used.")]
    UsedNonce {
        /// The replayed nonce value.
        nonce: String,
    },

    /// The claimed `oauth_signature` does not match the recomputed value.
    #[error("Signature does not match the computed value.")]
    InvalidSignature,

    /// The request URL could not be parsed or normalized.
    #[error("Invalid request URL '{url}'.")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_names_the_parameter() {
        let error = OAuthError::MissingParameter {
            name: "oauth_signature".to_string(),
        };
        assert!(error.to_string().contains("oauth_signature"));
    }

    #[test]
    fn test_unsupported_version_carries_the_version() {
        let error = OAuthError::UnsupportedVersion {
            version: "1.0a".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("1.0a"));
        assert!(message.contains("not supported"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = OAuthError::InvalidSignature;
        let _: &dyn std::error::Error = &error;
    }
}
