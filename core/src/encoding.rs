//! Canonical parameter encoding for query strings and form bodies.
//!
//! # Design
//! Parameters live in a `BTreeMap`, so iteration is already in byte-wise key
//! order; the OAuth1 base string and the wire encoding therefore agree
//! without a separate sort step. Values are percent-encoded against the
//! RFC 3986 unreserved set: space becomes `%20`, never `+`.

use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

use crate::error::{Error, Result};

/// Parameter map shared by query strings and bodies.
pub type Parameters = BTreeMap<String, Value>;

/// Everything except `A-Z a-z 0-9 - . _ ~` is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode `input` with uppercase hex over its UTF-8 bytes.
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, UNRESERVED).to_string()
}

/// Encode `parameters` as `k=v&k=v`. An empty map yields an empty string.
pub fn encode(parameters: &Parameters) -> Result<String> {
    let pairs = encoded_pairs(parameters)?;
    Ok(pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&"))
}

/// Percent-encoded `(key, value)` pairs in key order.
pub(crate) fn encoded_pairs(parameters: &Parameters) -> Result<Vec<(String, String)>> {
    parameters
        .iter()
        .map(|(key, value)| {
            let value = stringify(key, value)?;
            Ok((percent_encode(key), percent_encode(&value)))
        })
        .collect()
}

/// Render a parameter value the way the API expects to see it.
///
/// Arrays of scalars become one comma-joined value.
pub fn stringify(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::Array(items) => {
            let parts = items
                .iter()
                .map(|item| scalar(key, item))
                .collect::<Result<Vec<_>>>()?;
            Ok(parts.join(","))
        }
        other => scalar(key, other),
    }
}

fn scalar(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(Error::encoding(key, "null values are not supported")),
        Value::Array(_) => Err(Error::encoding(key, "nested arrays are not supported")),
        Value::Object(_) => Err(Error::encoding(key, "objects are not supported")),
    }
}

/// Inverse of [`encode`]: split on `&` and `=`, then percent-decode.
///
/// `+` is kept literally, since the encoder never produces it for spaces.
pub fn decode(encoded: &str) -> Result<BTreeMap<String, String>> {
    let mut decoded = BTreeMap::new();
    for pair in encoded.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        decoded.insert(decode_component(key)?, decode_component(value)?);
    }
    Ok(decoded)
}

fn decode_component(component: &str) -> Result<String> {
    percent_decode_str(component)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| Error::Decoding(format!("invalid UTF-8 in `{component}`: {e}")))
}
