//! Percent-encoding, query normalization, and Authorization-header parsing.
//!
//! Everything in this module is deterministic and side-effect-free. That
//! matters more than usual here: [`build_query`] output is an input to
//! signature computation, so any byte-level deviation from the OAuth 1.0a
//! normalization rules breaks interoperability with independent
//! implementations.
//!
//! # Example
//!
//! ```rust
//! use oauth1a::util::{encode, parse_query, build_query};
//!
//! assert_eq!(encode("hi there"), "hi%20there");
//!
//! let params = parse_query("b=2&a=1");
//! assert_eq!(build_query(&params), "a=1&b=2");
//! ```

use std::collections::BTreeMap;

/// A parameter value: OAuth permits repeated keys, so a key maps to either
/// a single value or an ordered list of values.
///
/// The distinction is observable: [`build_query`] expands a `Multi` value
/// into one `key=value` pair per entry, and
/// [`Request::set_parameter`](crate::Request::set_parameter) promotes a
/// `Single` to a `Multi` when a duplicate is allowed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    /// A single value for the key.
    Single(String),
    /// Multiple values for the key, in insertion order.
    Multi(Vec<String>),
}

impl ParamValue {
    /// Returns all values as a slice, regardless of cardinality.
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multi(vs) => vs,
        }
    }

    /// Returns the first value.
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            Self::Single(v) => v,
            Self::Multi(vs) => vs.first().map_or("", String::as_str),
        }
    }

    /// Appends a value, promoting a `Single` to a `Multi`.
    pub fn push(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                *self = Self::Multi(vec![std::mem::take(existing), value]);
            }
            Self::Multi(vs) => vs.push(value),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

/// The parameter map used throughout the crate.
///
/// A `BTreeMap` keeps iteration deterministic, which keeps every derived
/// byte sequence (base strings, query views) reproducible.
pub type ParameterMap = BTreeMap<String, ParamValue>;

/// Percent-encodes a string per RFC 3986.
///
/// The unreserved set `[A-Za-z0-9\-._~]` passes through unchanged; every
/// other byte becomes an uppercase-hex percent escape. This is stricter
/// than HTML form encoding: spaces become `%20`, never `+`.
///
/// # Example
///
/// ```rust
/// use oauth1a::util::encode;
///
/// assert_eq!(encode("abcABC123"), "abcABC123");
/// assert_eq!(encode("-._~"), "-._~");
/// assert_eq!(encode("+"), "%2B");
/// assert_eq!(encode(" "), "%20");
/// ```
#[must_use]
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Percent-decodes a string; the inverse of [`encode`] on valid input.
///
/// Malformed escape sequences pass through unchanged. Decoded bytes that
/// are not valid UTF-8 are replaced with `U+FFFD`.
///
/// # Example
///
/// ```rust
/// use oauth1a::util::decode;
///
/// assert_eq!(decode("%2B"), "+");
/// assert_eq!(decode("%20"), " ");
/// assert_eq!(decode("abcABC123"), "abcABC123");
/// ```
#[must_use]
pub fn decode(value: &str) -> String {
    let bytes = urlencoding::decode_binary(value.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Decodes one component of a query string or header value.
///
/// Unlike [`decode`], `+` is treated as an escaped space, matching how
/// form-encoded request bodies and Authorization headers arrive on the
/// wire.
pub(crate) fn form_decode(value: &str) -> String {
    decode(&value.replace('+', " "))
}

/// Parses a query string into a [`ParameterMap`].
///
/// Splits on `&`, splits each pair on the first `=`, and form-decodes both
/// sides. A key with no `=` maps to the empty string. Repeated keys
/// collapse into an ordered list preserving first-seen order.
///
/// # Example
///
/// ```rust
/// use oauth1a::util::{parse_query, ParamValue};
///
/// let params = parse_query("a=x!y&a=x+y");
/// assert_eq!(
///     params["a"],
///     ParamValue::Multi(vec!["x!y".to_string(), "x y".to_string()]),
/// );
/// ```
#[must_use]
pub fn parse_query(query: &str) -> ParameterMap {
    let mut params = ParameterMap::new();
    if query.is_empty() {
        return params;
    }
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = form_decode(raw_key);
        let value = form_decode(raw_value);
        params
            .entry(key)
            .and_modify(|existing| existing.push(value.clone()))
            .or_insert(ParamValue::Single(value));
    }
    params
}

/// Builds the canonical query string from a [`ParameterMap`].
///
/// Each key and value is percent-encoded (list values expand to one pair
/// per entry), the resulting `key=value` pairs are sorted lexicographically
/// by (encoded key, encoded value), and the pairs are joined with `&`.
///
/// This exact byte sequence is what gets signed.
///
/// # Example
///
/// ```rust
/// use oauth1a::util::{build_query, parse_query};
///
/// let params = parse_query("z=t&z=p&f=50&f=25&f=a&c=hi%20there&a=1");
/// assert_eq!(build_query(&params), "a=1&c=hi%20there&f=25&f=50&f=a&z=p&z=t");
/// ```
#[must_use]
pub fn build_query(params: &ParameterMap) -> String {
    let rendered: Vec<String> = encoded_pairs(params)
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    rendered.join("&")
}

/// The sorted, percent-encoded `(key, value)` pairs behind [`build_query`].
///
/// Shared with the serialization views on
/// [`Request`](crate::Request), which must render the same pair sequence
/// in header syntax.
pub(crate) fn encoded_pairs(params: &ParameterMap) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in params {
        let encoded_key = encode(key);
        for v in value.values() {
            pairs.push((encoded_key.clone(), encode(v)));
        }
    }
    pairs.sort();
    pairs
}

/// Parses an `Authorization: OAuth ...` header into a key/value map.
///
/// Accepts entries of the form `key="value"` or `key=value`, separated by
/// commas; commas inside quoted values do not split entries. Values are
/// form-decoded. The `realm` key is always dropped (it is never part of
/// the signed parameter set); when `oauth_only` is set, every key not
/// prefixed `oauth_` is dropped as well.
///
/// # Example
///
/// ```rust
/// use oauth1a::util::split_auth_header;
///
/// let params = split_auth_header(
///     r#"OAuth realm="",oauth_foo=bar,oauth_baz="bla,rgh""#,
///     true,
/// );
/// assert_eq!(params["oauth_foo"], "bar");
/// assert_eq!(params["oauth_baz"], "bla,rgh");
/// assert!(!params.contains_key("realm"));
/// ```
#[must_use]
pub fn split_auth_header(header: &str, oauth_only: bool) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();

    // Drop the auth-scheme word ("OAuth") if present.
    let body = match header.split_once(char::is_whitespace) {
        Some((scheme, rest)) if !scheme.contains('=') => rest,
        _ => header,
    };

    for entry in split_outside_quotes(body) {
        let Some((raw_key, raw_value)) = entry.split_once('=') else {
            continue;
        };
        let key = raw_key.trim().to_string();
        if key.is_empty() || key == "realm" {
            continue;
        }
        if oauth_only && !key.starts_with("oauth_") {
            continue;
        }
        let trimmed = raw_value.trim();
        let unquoted = trimmed
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(trimmed);
        params.insert(key, form_decode(unquoted));
    }
    params
}

/// Splits a header body on commas that sit outside double-quoted sections.
fn split_outside_quotes(body: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, c) in body.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                entries.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&body[start..]);
    entries
        .into_iter()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .collect()
}
