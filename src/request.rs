//! A single OAuth 1.0a protocol exchange.
//!
//! A [`Request`] holds the HTTP method, the normalized target URL, and the
//! merged parameter map (application parameters plus `oauth_*` protocol
//! parameters). Clients build one with
//! [`Request::from_consumer_and_token`], sign it with
//! [`Request::sign_request`], and render it as an Authorization header,
//! query string, or POST body. Servers rebuild one from the received
//! parameters and replay the same normalization to verify the signature.
//!
//! # Example
//!
//! ```rust
//! use oauth1a::{Consumer, Plaintext, Request, Token};
//!
//! let consumer = Consumer::new("key", "secret");
//! let token = Token::new("accesskey", "accesssecret");
//!
//! let mut request = Request::from_consumer_and_token(
//!     &consumer,
//!     Some(&token),
//!     "POST",
//!     "http://example.com/resource?kind=photo",
//!     None,
//! ).unwrap();
//!
//! request.sign_request(&Plaintext, &consumer, Some(&token));
//! assert_eq!(request.get_parameter("oauth_signature"), Some("secret&accesssecret"));
//! ```

use rand::distributions::Alphanumeric;
use rand::Rng;
use url::Url;

use crate::credentials::{Consumer, Token};
use crate::error::OAuthError;
use crate::signature::SignatureMethod;
use crate::util::{build_query, encode, encoded_pairs, parse_query, ParamValue, ParameterMap};

/// The protocol version every request carries.
pub const OAUTH_VERSION: &str = "1.0";

/// One OAuth protocol exchange.
///
/// Created once per exchange. Parameters are mutated only through the
/// explicit get/set/unset methods prior to signing; once `oauth_signature`
/// has been inserted the request is logically immutable.
#[derive(Clone, Debug)]
pub struct Request {
    method: String,
    url: String,
    parameters: ParameterMap,
}

impl Request {
    /// Creates a request from an HTTP method, a target URL, and a set of
    /// parameters.
    ///
    /// The URL is normalized to `scheme://host/path`: scheme and host are
    /// lower-cased, default ports (80 for http, 443 for https) are
    /// stripped, and the query and fragment are removed. Query parameters
    /// are folded into the parameter map, with entries in `parameters`
    /// overriding same-named query entries.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidUrl`] if the URL cannot be parsed or
    /// has no host.
    pub fn new(
        method: &str,
        url: &str,
        parameters: ParameterMap,
    ) -> Result<Self, OAuthError> {
        let (normalized, mut merged) = normalize_url(url)?;
        for (key, value) in parameters {
            merged.insert(key, value);
        }
        Ok(Self {
            method: method.to_ascii_uppercase(),
            url: normalized,
            parameters: merged,
        })
    }

    /// Creates a client request carrying the standard protocol parameters.
    ///
    /// Folds any URL query parameters and `extra_params` into the map,
    /// then fills in `oauth_version` (`"1.0"`), a fresh unguessable
    /// `oauth_nonce`, `oauth_timestamp` (current Unix time), the consumer
    /// key, and the token key when a token is in play. Entries in
    /// `extra_params` override the generated defaults, which is how tests
    /// pin a fixed nonce or timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidUrl`] if the URL cannot be parsed.
    pub fn from_consumer_and_token(
        consumer: &Consumer,
        token: Option<&Token>,
        method: &str,
        url: &str,
        extra_params: Option<ParameterMap>,
    ) -> Result<Self, OAuthError> {
        let mut parameters = ParameterMap::new();
        parameters.insert("oauth_version".to_string(), OAUTH_VERSION.into());
        parameters.insert("oauth_nonce".to_string(), generate_nonce().into());
        parameters.insert(
            "oauth_timestamp".to_string(),
            generate_timestamp().into(),
        );
        parameters.insert("oauth_consumer_key".to_string(), consumer.key().into());
        if let Some(token) = token {
            parameters.insert("oauth_token".to_string(), token.key().into());
        }
        if let Some(extra) = extra_params {
            for (key, value) in extra {
                parameters.insert(key, value);
            }
        }
        Self::new(method, url, parameters)
    }

    /// The HTTP method, upper-cased.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The normalized target URL (no query, no fragment).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The full parameter map.
    #[must_use]
    pub const fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    /// Returns the first value of a parameter, if present.
    #[must_use]
    pub fn get_parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(|v| v.first())
    }

    /// Returns every value of a parameter, if present.
    #[must_use]
    pub fn get_parameter_values(&self, name: &str) -> Option<&[String]> {
        self.parameters.get(name).map(ParamValue::values)
    }

    /// Sets a parameter.
    ///
    /// With `allow_duplicates` an existing value is kept and the new value
    /// appended, promoting the entry to a list. Without it the existing
    /// value is replaced in place, staying a single value; protocol
    /// parameters such as `oauth_timestamp` and `oauth_signature` are
    /// always set this way.
    pub fn set_parameter(
        &mut self,
        name: &str,
        value: impl Into<String>,
        allow_duplicates: bool,
    ) {
        let value = value.into();
        match self.parameters.get_mut(name) {
            Some(existing) if allow_duplicates => existing.push(value),
            Some(existing) => *existing = ParamValue::Single(value),
            None => {
                self.parameters
                    .insert(name.to_string(), ParamValue::Single(value));
            }
        }
    }

    /// Removes a parameter entirely.
    pub fn unset_parameter(&mut self, name: &str) {
        self.parameters.remove(name);
    }

    /// Builds the signature base string:
    /// `METHOD & encode(url) & encode(normalized_parameters)`.
    ///
    /// `oauth_signature` is excluded from its own computation. This exact
    /// byte sequence is what every signature method signs and checks.
    #[must_use]
    pub fn base_string(&self) -> String {
        let mut signable = self.parameters.clone();
        signable.remove("oauth_signature");
        format!(
            "{}&{}&{}",
            self.method,
            encode(&self.url),
            encode(&build_query(&signable)),
        )
    }

    /// Signs the request.
    ///
    /// Sets `oauth_signature_method` to the method's name, computes the
    /// signature over [`base_string`](Self::base_string), and overwrites
    /// `oauth_signature` with the result as a single value.
    pub fn sign_request(
        &mut self,
        method: &dyn SignatureMethod,
        consumer: &Consumer,
        token: Option<&Token>,
    ) {
        self.set_parameter("oauth_signature_method", method.name(), false);
        let signature = method.build_signature(self, consumer, token);
        self.set_parameter("oauth_signature", signature, false);
    }

    /// Renders the parameters as a POST body: exactly
    /// [`build_query`](crate::util::build_query) over the full map.
    #[must_use]
    pub fn to_postdata(&self) -> String {
        build_query(&self.parameters)
    }

    /// Renders the full request URL, query string included.
    #[must_use]
    pub fn to_url(&self) -> String {
        let postdata = self.to_postdata();
        if postdata.is_empty() {
            self.url.clone()
        } else {
            format!("{}?{postdata}", self.url)
        }
    }

    /// Renders the parameters as an `Authorization` header value.
    ///
    /// Produces `OAuth realm="R", k1="v1", k2="v2", ...` over the same
    /// sorted encoded pairs as the other views; the optional realm comes
    /// first and is excluded from signing by construction (it is never a
    /// parameter).
    #[must_use]
    pub fn to_header(&self, realm: Option<&str>) -> String {
        let mut entries: Vec<String> = Vec::new();
        if let Some(realm) = realm {
            entries.push(format!(r#"realm="{}""#, encode(realm)));
        }
        for (key, value) in encoded_pairs(&self.parameters) {
            entries.push(format!(r#"{key}="{value}""#));
        }
        if entries.is_empty() {
            "OAuth".to_string()
        } else {
            format!("OAuth {}", entries.join(", "))
        }
    }
}

/// Generates a fresh unguessable nonce: 32 alphanumeric characters.
fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// The current Unix time as a decimal string.
fn generate_timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

/// Normalizes a request URL and extracts its query parameters.
fn normalize_url(raw: &str) -> Result<(String, ParameterMap), OAuthError> {
    let parsed = Url::parse(raw).map_err(|_| OAuthError::InvalidUrl {
        url: raw.to_string(),
    })?;
    let host = parsed.host_str().ok_or_else(|| OAuthError::InvalidUrl {
        url: raw.to_string(),
    })?;
    // The url crate lower-cases scheme and host and drops default ports
    // during parsing, so only explicit non-default ports survive here.
    let normalized = match parsed.port() {
        Some(port) => format!("{}://{host}:{port}{}", parsed.scheme(), parsed.path()),
        None => format!("{}://{host}{}", parsed.scheme(), parsed.path()),
    };
    let query_params = parsed.query().map_or_else(ParameterMap::new, parse_query);
    Ok((normalized, query_params))
}
