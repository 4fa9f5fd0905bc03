//! Server-side request verification.
//!
//! A [`Server`] replays the client's canonicalization to recompute and
//! check signatures, consulting a [`DataStore`] for identities, tokens,
//! and replay state. Verification runs a fixed sequence of checks, each a
//! hard stop on failure; the ordering is a correctness requirement (a
//! signature is never trusted before the nonce has been checked, a nonce
//! is never consulted before the consumer has been resolved).
//!
//! # Example
//!
//! ```rust,ignore
//! use oauth1a::{HmacSha1, Plaintext, Server};
//!
//! let mut server = Server::new(my_data_store);
//! server.add_signature_method(HmacSha1);
//! server.add_signature_method(Plaintext);
//!
//! let (consumer, token) = server.verify_request(&request)?;
//! ```

use std::collections::BTreeMap;

use crate::credentials::{Consumer, Token};
use crate::error::OAuthError;
use crate::request::{Request, OAUTH_VERSION};
use crate::signature::SignatureMethod;

/// Accepted deviation between a request's `oauth_timestamp` and the
/// server clock, in seconds.
///
/// Five minutes in either direction, the common bound for signed-request
/// replay windows. OAuth Core 1.0 leaves the window to the server; any
/// deviation on the order of hours must be rejected, and this bound is
/// deliberately far tighter.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// The two kinds of token a data store can issue or resolve.
///
/// The kind is a property of the lookup, not of the [`Token`] itself: the
/// same value type serves both, and the store decides which table a key
/// resolves against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// A temporary token exchanged for an access token.
    Request,
    /// A long-lived token authorizing protected-resource access.
    Access,
}

impl TokenKind {
    /// The opposite kind.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Request => Self::Access,
            Self::Access => Self::Request,
        }
    }

    /// The lowercase protocol name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Access => "access",
        }
    }
}

/// Storage collaborator consulted during verification.
///
/// The core owns no persistent state; consumers, tokens, and seen nonces
/// all live behind this trait. Implementations must perform the nonce
/// check-and-mark in [`lookup_nonce`](Self::lookup_nonce) atomically:
/// two concurrent requests presenting the same nonce must not both
/// observe it as fresh.
///
/// Nonce-uniqueness scope (per consumer, per token, or global) is the
/// implementation's choice; the full `(consumer, token, nonce,
/// timestamp)` tuple is provided so any scope can be enforced.
pub trait DataStore {
    /// Resolves a consumer key to a registered consumer.
    fn lookup_consumer(&self, key: &str) -> Option<Consumer>;

    /// Resolves a token key of the given kind, issued to `consumer`.
    ///
    /// A key that only exists under the other kind must return `None`
    /// here; the server probes both kinds to distinguish a wrong-kind
    /// token from an unknown one.
    fn lookup_token(&self, consumer: &Consumer, kind: TokenKind, key: &str) -> Option<Token>;

    /// Returns `true` if the nonce tuple has been seen before, marking it
    /// as seen otherwise.
    fn lookup_nonce(
        &self,
        consumer: &Consumer,
        token: Option<&Token>,
        nonce: &str,
        timestamp: i64,
    ) -> bool;

    /// Issues a fresh request token for a verified consumer.
    fn new_request_token(&self, consumer: &Consumer, callback: Option<&str>) -> Option<Token>;

    /// Exchanges a verified request token for an access token.
    fn new_access_token(
        &self,
        token: &Token,
        consumer: &Consumer,
        verifier: Option<&str>,
    ) -> Option<Token>;
}

/// How a verification call treats the `oauth_token` parameter.
enum TokenMode {
    /// The token must resolve to the given kind.
    Resolve(TokenKind),
    /// The token must be absent (new-request-token issuance).
    Absent,
}

/// Orchestrates the verification state machine.
///
/// Stateless across calls; the only configuration is the data store and
/// the set of registered signature methods.
pub struct Server<S> {
    store: S,
    signature_methods: BTreeMap<String, Box<dyn SignatureMethod>>,
}

impl<S: DataStore> Server<S> {
    /// Creates a server with no registered signature methods.
    ///
    /// Every request is rejected with
    /// [`OAuthError::UnknownSignatureMethod`] until at least one method is
    /// registered.
    pub fn new(store: S) -> Self {
        Self {
            store,
            signature_methods: BTreeMap::new(),
        }
    }

    /// Registers a signature method, replacing any existing registration
    /// with the same name. Dispatch is case-insensitive.
    pub fn add_signature_method(&mut self, method: impl SignatureMethod + 'static) {
        self.signature_methods
            .insert(method.name().to_ascii_lowercase(), Box::new(method));
    }

    /// Verifies a protected-resource request.
    ///
    /// The request must be signed with a valid access token. On success
    /// returns the resolved consumer and token.
    ///
    /// # Errors
    ///
    /// Any failed check rejects the request with the corresponding
    /// [`OAuthError`] kind; see the module docs for the check sequence.
    pub fn verify_request(&self, request: &Request) -> Result<(Consumer, Token), OAuthError> {
        let (consumer, token) =
            self.run_checks(request, TokenMode::Resolve(TokenKind::Access))?;
        let token = token.ok_or(OAuthError::TokenTypeMismatch)?;
        Ok((consumer, token))
    }

    /// Verifies a new-request-token request and issues the token.
    ///
    /// The request must be signed with the consumer secret alone; the
    /// presence of any `oauth_token`, valid or not, is rejected. The
    /// optional `oauth_callback` parameter is forwarded to the store.
    ///
    /// # Errors
    ///
    /// Any failed check rejects the request with the corresponding
    /// [`OAuthError`] kind.
    pub fn fetch_request_token(&self, request: &Request) -> Result<Token, OAuthError> {
        let (consumer, _) = self.run_checks(request, TokenMode::Absent)?;
        let callback = request.get_parameter("oauth_callback");
        self.store
            .new_request_token(&consumer, callback)
            .ok_or_else(|| OAuthError::InvalidConsumer {
                key: consumer.key().to_string(),
            })
    }

    /// Verifies an access-token exchange and issues the access token.
    ///
    /// The request must be signed with an existing request token. The
    /// optional `oauth_verifier` parameter is forwarded to the store.
    ///
    /// # Errors
    ///
    /// Any failed check rejects the request with the corresponding
    /// [`OAuthError`] kind.
    pub fn fetch_access_token(&self, request: &Request) -> Result<Token, OAuthError> {
        let (consumer, token) =
            self.run_checks(request, TokenMode::Resolve(TokenKind::Request))?;
        let token = token.ok_or(OAuthError::TokenTypeMismatch)?;
        let verifier = request.get_parameter("oauth_verifier");
        self.store
            .new_access_token(&token, &consumer, verifier)
            .ok_or_else(|| OAuthError::InvalidToken {
                key: token.key().to_string(),
            })
    }

    /// Runs the full check sequence for one request.
    fn run_checks(
        &self,
        request: &Request,
        mode: TokenMode,
    ) -> Result<(Consumer, Option<Token>), OAuthError> {
        check_version(request)?;
        let method = self.resolve_signature_method(request)?;
        let consumer = self.resolve_consumer(request)?;
        let token = match mode {
            TokenMode::Resolve(kind) => Some(self.resolve_token(request, &consumer, kind)?),
            TokenMode::Absent => {
                if request.get_parameter("oauth_token").is_some() {
                    tracing::warn!(
                        consumer_key = consumer.key(),
                        "rejected token-issuance request signed with an existing token"
                    );
                    return Err(OAuthError::TokenTypeMismatch);
                }
                None
            }
        };
        check_required_parameters(request, token.is_some())?;
        check_timestamp(request)?;
        self.check_nonce(request, &consumer, token.as_ref())?;
        check_signature(request, method, &consumer, token.as_ref())?;
        Ok((consumer, token))
    }

    /// Step 2: the signature method must be present and registered.
    fn resolve_signature_method(
        &self,
        request: &Request,
    ) -> Result<&dyn SignatureMethod, OAuthError> {
        let name = request.get_parameter("oauth_signature_method").ok_or_else(|| {
            OAuthError::MissingParameter {
                name: "oauth_signature_method".to_string(),
            }
        })?;
        self.signature_methods
            .get(&name.to_ascii_lowercase())
            .map(|method| &**method)
            .ok_or_else(|| {
                tracing::debug!(method = name, "rejected request with unregistered signature method");
                OAuthError::UnknownSignatureMethod {
                    name: name.to_string(),
                }
            })
    }

    /// Step 3: the consumer key must be present and known to the store.
    fn resolve_consumer(&self, request: &Request) -> Result<Consumer, OAuthError> {
        let key = request.get_parameter("oauth_consumer_key").ok_or_else(|| {
            OAuthError::MissingParameter {
                name: "oauth_consumer_key".to_string(),
            }
        })?;
        self.store.lookup_consumer(key).ok_or_else(|| {
            tracing::warn!(consumer_key = key, "rejected request from unknown consumer");
            OAuthError::InvalidConsumer {
                key: key.to_string(),
            }
        })
    }

    /// Step 4: the token must be present and resolve to the expected
    /// kind. A key resolving only under the opposite kind is a mismatch
    /// rather than an unknown token.
    fn resolve_token(
        &self,
        request: &Request,
        consumer: &Consumer,
        kind: TokenKind,
    ) -> Result<Token, OAuthError> {
        let key =
            request
                .get_parameter("oauth_token")
                .ok_or_else(|| OAuthError::MissingParameter {
                    name: "oauth_token".to_string(),
                })?;
        if let Some(token) = self.store.lookup_token(consumer, kind, key) {
            return Ok(token);
        }
        if self
            .store
            .lookup_token(consumer, kind.other(), key)
            .is_some()
        {
            tracing::warn!(
                token_key = key,
                expected_kind = kind.as_str(),
                "rejected request signed with a token of the wrong kind"
            );
            return Err(OAuthError::TokenTypeMismatch);
        }
        tracing::warn!(
            token_key = key,
            kind = kind.as_str(),
            "rejected request with unknown token"
        );
        Err(OAuthError::InvalidToken {
            key: key.to_string(),
        })
    }

    /// Step 6b: the nonce tuple must not have been seen before.
    fn check_nonce(
        &self,
        request: &Request,
        consumer: &Consumer,
        token: Option<&Token>,
    ) -> Result<(), OAuthError> {
        let nonce =
            request
                .get_parameter("oauth_nonce")
                .ok_or_else(|| OAuthError::MissingParameter {
                    name: "oauth_nonce".to_string(),
                })?;
        // The timestamp parsed in the previous step.
        let timestamp: i64 = request
            .get_parameter("oauth_timestamp")
            .and_then(|t| t.parse().ok())
            .unwrap_or_default();
        if self.store.lookup_nonce(consumer, token, nonce, timestamp) {
            tracing::warn!(
                consumer_key = consumer.key(),
                nonce,
                "rejected replayed nonce"
            );
            return Err(OAuthError::UsedNonce {
                nonce: nonce.to_string(),
            });
        }
        Ok(())
    }
}

/// Step 1: an absent `oauth_version` is treated as `1.0`; any other
/// explicit value is rejected.
fn check_version(request: &Request) -> Result<(), OAuthError> {
    let version = request.get_parameter("oauth_version").unwrap_or(OAUTH_VERSION);
    if version == OAUTH_VERSION {
        Ok(())
    } else {
        tracing::debug!(version, "rejected request with unsupported version");
        Err(OAuthError::UnsupportedVersion {
            version: version.to_string(),
        })
    }
}

/// Step 5: every mandatory `oauth_*` parameter must be present before any
/// signature computation happens.
fn check_required_parameters(request: &Request, token_in_play: bool) -> Result<(), OAuthError> {
    // List per OAuth Core 1.0 chapter 7 ("Accessing Protected Resources");
    // the earlier resolution steps already guarantee the first three.
    let mut required = vec![
        "oauth_consumer_key",
        "oauth_signature_method",
        "oauth_signature",
        "oauth_timestamp",
        "oauth_nonce",
    ];
    if token_in_play {
        required.push("oauth_token");
    }
    for name in required {
        if request.get_parameter(name).is_none() {
            return Err(OAuthError::MissingParameter {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Step 6a: the timestamp must parse and sit within
/// [`TIMESTAMP_TOLERANCE_SECS`] of the server clock.
fn check_timestamp(request: &Request) -> Result<(), OAuthError> {
    let raw =
        request
            .get_parameter("oauth_timestamp")
            .ok_or_else(|| OAuthError::MissingParameter {
                name: "oauth_timestamp".to_string(),
            })?;
    let out_of_range = || OAuthError::TimestampOutOfRange {
        timestamp: raw.to_string(),
    };
    let timestamp: i64 = raw.parse().map_err(|_| out_of_range())?;
    let skew = chrono::Utc::now()
        .timestamp()
        .saturating_sub(timestamp)
        .saturating_abs();
    if skew > TIMESTAMP_TOLERANCE_SECS {
        tracing::debug!(timestamp, skew, "rejected request with stale timestamp");
        return Err(out_of_range());
    }
    Ok(())
}

/// Step 7: the claimed signature must match the recomputed value.
fn check_signature(
    request: &Request,
    method: &dyn SignatureMethod,
    consumer: &Consumer,
    token: Option<&Token>,
) -> Result<(), OAuthError> {
    let claimed =
        request
            .get_parameter("oauth_signature")
            .ok_or_else(|| OAuthError::MissingParameter {
                name: "oauth_signature".to_string(),
            })?;
    if method.check_signature(request, consumer, token, claimed) {
        Ok(())
    } else {
        tracing::warn!(
            consumer_key = consumer.key(),
            method = method.name(),
            "rejected request with invalid signature"
        );
        Err(OAuthError::InvalidSignature)
    }
}
