//! # OAuth 1.0a request signing and verification
//!
//! This crate implements the OAuth 1.0a delegated-authorization protocol
//! core: building cryptographically signed HTTP requests on the client
//! side and verifying them on the server side, so a server can
//! authenticate a client application ([`Consumer`]) and an
//! end-user-granted credential ([`Token`]) without the client ever
//! transmitting the user's password.
//!
//! ## Overview
//!
//! The crate provides:
//! - Deterministic request normalization and signature base strings via
//!   [`Request`]
//! - The pluggable signature-method family ([`SignatureMethod`], with
//!   [`HmacSha1`] and [`Plaintext`] built in)
//! - The server-side verification state machine via [`Server`], backed by
//!   a caller-supplied [`DataStore`]
//! - The RFC 3986 encoding and query-normalization primitives in [`util`]
//!
//! Actual network transport, persistence of consumers/tokens/nonces, and
//! header extraction from a process environment are out of scope: the
//! [`DataStore`] trait and pre-parsed parameter maps are the seams where
//! an application plugs those in.
//!
//! ## Signing a request
//!
//! ```rust
//! use oauth1a::{Consumer, HmacSha1, Request, Token};
//!
//! let consumer = Consumer::new("app-key", "app-secret");
//! let token = Token::new("access-key", "access-secret");
//!
//! let mut request = Request::from_consumer_and_token(
//!     &consumer,
//!     Some(&token),
//!     "GET",
//!     "https://api.example.com/photos?size=original",
//!     None,
//! ).unwrap();
//!
//! request.sign_request(&HmacSha1, &consumer, Some(&token));
//!
//! // Ready to send in any of the three wire forms:
//! let _header = request.to_header(Some("https://api.example.com/"));
//! let _url = request.to_url();
//! let _body = request.to_postdata();
//! ```
//!
//! ## Verifying a request
//!
//! ```rust,ignore
//! use oauth1a::{HmacSha1, Plaintext, Server};
//!
//! let mut server = Server::new(my_data_store);
//! server.add_signature_method(HmacSha1);
//! server.add_signature_method(Plaintext);
//!
//! // Protected-resource access:
//! let (consumer, token) = server.verify_request(&request)?;
//!
//! // Token issuance:
//! let request_token = server.fetch_request_token(&request)?;
//! let access_token = server.fetch_access_token(&exchange_request)?;
//! ```
//!
//! ## Interoperability
//!
//! Correctness here is bit-exact: the percent-encoding alphabet, the
//! canonical parameter sort order, and the base-string layout are inputs
//! to signature computation, so any deviation breaks interoperability
//! with independent OAuth 1.0a implementations. The normalization rules
//! live in [`util`] and are pinned by the test vectors from the OAuth
//! community test-case suite.

pub mod credentials;
pub mod error;
pub mod request;
pub mod server;
pub mod signature;
pub mod util;

pub use credentials::{Consumer, Token};
pub use error::OAuthError;
pub use request::{Request, OAUTH_VERSION};
pub use server::{DataStore, Server, TokenKind, TIMESTAMP_TOLERANCE_SECS};
pub use signature::{HmacSha1, Plaintext, SignatureMethod};
