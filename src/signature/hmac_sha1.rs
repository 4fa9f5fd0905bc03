//! The HMAC-SHA1 signature method.

use base64::prelude::*;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::credentials::{Consumer, Token};
use crate::request::Request;
use crate::signature::{signing_key, SignatureMethod};

type HmacSha1Mac = Hmac<Sha1>;

/// HMAC-SHA1 signing per OAuth Core 1.0 §9.2.
///
/// The signing key is `encode(consumer_secret) & "&" & encode(token_secret
/// or "")`; the signature is the base64 encoding of the HMAC-SHA1 digest of
/// the request's base string under that key.
///
/// # Example
///
/// ```rust
/// use oauth1a::{HmacSha1, SignatureMethod};
///
/// assert_eq!(HmacSha1.name(), "HMAC-SHA1");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct HmacSha1;

impl SignatureMethod for HmacSha1 {
    fn name(&self) -> &'static str {
        "HMAC-SHA1"
    }

    #[allow(clippy::expect_used)] // HMAC accepts keys of any length
    fn build_signature(
        &self,
        request: &Request,
        consumer: &Consumer,
        token: Option<&Token>,
    ) -> String {
        let key = signing_key(consumer, token);
        let mut mac = HmacSha1Mac::new_from_slice(key.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(request.base_string().as_bytes());
        BASE64_STANDARD.encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::parse_query;

    // The canonical example from OAuth Core 1.0 appendix A.5.
    fn photos_request() -> (Request, Consumer, Token) {
        let consumer = Consumer::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44");
        let token = Token::new("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00");
        let params = parse_query(
            "file=vacation.jpg&size=original\
             &oauth_consumer_key=dpf43f3p2l4k3l03\
             &oauth_token=nnch734d00sl2jdk\
             &oauth_signature_method=HMAC-SHA1\
             &oauth_timestamp=1191242096\
             &oauth_nonce=kllo9940pd9333jh\
             &oauth_version=1.0",
        );
        let request =
            Request::new("GET", "http://photos.example.net/photos", params).unwrap();
        (request, consumer, token)
    }

    #[test]
    fn test_known_signature_vector() {
        let (request, consumer, token) = photos_request();
        let signature = HmacSha1.build_signature(&request, &consumer, Some(&token));
        assert_eq!(signature, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
    }

    #[test]
    fn test_check_signature_requires_exact_match() {
        let (request, consumer, token) = photos_request();
        assert!(HmacSha1.check_signature(
            &request,
            &consumer,
            Some(&token),
            "tR3+Ty81lMeYAr/Fid0kMTYa/WM=",
        ));
        // Stripped padding is not an acceptable variant.
        assert!(!HmacSha1.check_signature(
            &request,
            &consumer,
            Some(&token),
            "tR3+Ty81lMeYAr/Fid0kMTYa/WM",
        ));
        assert!(!HmacSha1.check_signature(&request, &consumer, Some(&token), ""));
    }

    #[test]
    fn test_signature_changes_with_token_secret() {
        let (request, consumer, token) = photos_request();
        let with_token = HmacSha1.build_signature(&request, &consumer, Some(&token));
        let without_token = HmacSha1.build_signature(&request, &consumer, None);
        assert_ne!(with_token, without_token);
    }
}
