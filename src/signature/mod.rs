//! Pluggable signature methods.
//!
//! OAuth 1.0a negotiates the signing algorithm through the
//! `oauth_signature_method` parameter. Each algorithm is a stateless
//! strategy implementing [`SignatureMethod`]; a [`Server`](crate::Server)
//! dispatches on the method name, matched case-insensitively. The set is
//! open: registering an RSA-SHA1 implementation requires no core changes.
//!
//! # Security
//!
//! All signature comparisons use constant-time comparison to prevent
//! timing attacks.
//!
//! # Example
//!
//! ```rust
//! use oauth1a::{Consumer, HmacSha1, Request, SignatureMethod};
//!
//! let consumer = Consumer::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44");
//! let mut request = Request::from_consumer_and_token(
//!     &consumer,
//!     None,
//!     "GET",
//!     "http://photos.example.net/photos",
//!     None,
//! ).unwrap();
//!
//! request.sign_request(&HmacSha1, &consumer, None);
//! assert!(request.get_parameter("oauth_signature").is_some());
//! ```

mod hmac_sha1;
mod plaintext;

pub use hmac_sha1::HmacSha1;
pub use plaintext::Plaintext;

use subtle::ConstantTimeEq;

use crate::credentials::{Consumer, Token};
use crate::request::Request;
use crate::util::encode;

/// A signing strategy for one OAuth signature algorithm.
///
/// Implementations are stateless; both sides of an exchange run the same
/// code, the client via [`build_signature`](Self::build_signature) and the
/// server via [`check_signature`](Self::check_signature).
pub trait SignatureMethod {
    /// The canonical method name carried in `oauth_signature_method`,
    /// e.g. `"HMAC-SHA1"`.
    fn name(&self) -> &'static str;

    /// Computes the signature for `request` under the given credentials.
    fn build_signature(
        &self,
        request: &Request,
        consumer: &Consumer,
        token: Option<&Token>,
    ) -> String;

    /// Checks a claimed signature against the recomputed value.
    ///
    /// The default implementation recomputes via
    /// [`build_signature`](Self::build_signature) and compares in constant
    /// time, which is exact string equality including case and padding.
    /// Asymmetric methods override this.
    fn check_signature(
        &self,
        request: &Request,
        consumer: &Consumer,
        token: Option<&Token>,
        signature: &str,
    ) -> bool {
        let expected = self.build_signature(request, consumer, token);
        constant_time_compare(&expected, signature)
    }
}

/// Derives the shared-secret signing key:
/// `encode(consumer_secret) & "&" & encode(token_secret or "")`.
pub(crate) fn signing_key(consumer: &Consumer, token: Option<&Token>) -> String {
    format!(
        "{}&{}",
        encode(consumer.secret()),
        encode(token.map_or("", Token::secret)),
    )
}

/// Performs constant-time comparison of two strings.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
