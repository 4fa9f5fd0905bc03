//! The PLAINTEXT signature method.

use crate::credentials::{Consumer, Token};
use crate::request::Request;
use crate::signature::{signing_key, SignatureMethod};

/// PLAINTEXT signing per OAuth Core 1.0 §9.4.
///
/// The signature is the signing key itself, with no hashing: only suitable
/// over a confidential channel. Useful in tests and over TLS.
///
/// # Example
///
/// ```rust
/// use oauth1a::{Plaintext, SignatureMethod};
///
/// assert_eq!(Plaintext.name(), "PLAINTEXT");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Plaintext;

impl SignatureMethod for Plaintext {
    fn name(&self) -> &'static str {
        "PLAINTEXT"
    }

    fn build_signature(
        &self,
        _request: &Request,
        consumer: &Consumer,
        token: Option<&Token>,
    ) -> String {
        signing_key(consumer, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ParameterMap;

    #[test]
    fn test_signature_is_the_signing_key() {
        let consumer = Consumer::new("key", "con secret");
        let token = Token::new("tok", "tok secret");
        let request =
            Request::new("GET", "http://example.com/", ParameterMap::new()).unwrap();

        let signature = Plaintext.build_signature(&request, &consumer, Some(&token));
        assert_eq!(signature, "con%20secret&tok%20secret");

        let signature = Plaintext.build_signature(&request, &consumer, None);
        assert_eq!(signature, "con%20secret&");
    }

    #[test]
    fn test_check_signature_is_exact_equality() {
        let consumer = Consumer::new("key", "secret");
        let request =
            Request::new("GET", "http://example.com/", ParameterMap::new()).unwrap();

        assert!(Plaintext.check_signature(&request, &consumer, None, "secret&"));
        assert!(!Plaintext.check_signature(&request, &consumer, None, "secret"));
        assert!(!Plaintext.check_signature(&request, &consumer, None, "SECRET&"));
    }
}
