//! Request authentication: OAuth 1.0a signing, bearer and basic tokens.
//!
//! # Design
//! `Credential` is a closed set of strategies chosen once when the session
//! is built. A single `authorization_header` call matches on it, so the
//! builder never needs to know which scheme is in play.
//!
//! OAuth1 output depends on a nonce and a timestamp. Both are carried in an
//! `OAuthStamp`; `authorization_header` draws a fresh one, while
//! `authorization_header_with` takes it from the caller so signatures can be
//! reproduced in tests.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use uuid::Uuid;

use crate::encoding::{encoded_pairs, percent_encode, Parameters};
use crate::error::Result;
use crate::http::HttpMethod;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Credentials used to authenticate every request of a session.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Credential {
    /// Unauthenticated requests; no `Authorization` header.
    #[default]
    None,
    /// OAuth 1.0a user or application context.
    OAuth1 {
        consumer_key: String,
        consumer_secret: String,
        token: Option<String>,
        token_secret: Option<String>,
    },
    /// OAuth 2.0 bearer token (app-only or user context).
    Bearer { token: String },
    /// HTTP basic auth with the API key and secret.
    Basic { key: String, secret: String },
}

impl Credential {
    pub fn oauth1(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Credential::OAuth1 {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: Some(token.into()),
            token_secret: Some(token_secret.into()),
        }
    }

    /// OAuth1 signed with the consumer pair only.
    pub fn oauth1_app(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Credential::OAuth1 {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: None,
            token_secret: None,
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Credential::Bearer {
            token: token.into(),
        }
    }

    pub fn basic(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Credential::Basic {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// `Authorization` header value for a request, or `None` when the
    /// credential is `None`.
    ///
    /// `url` must not carry a query string. `body` holds only the signable
    /// body parameters; a key may appear in both maps and is signed twice.
    pub fn authorization_header(
        &self,
        method: HttpMethod,
        url: &str,
        query: &Parameters,
        body: &Parameters,
    ) -> Result<Option<String>> {
        self.authorization_header_with(method, url, query, body, &OAuthStamp::fresh())
    }

    /// Same as [`Credential::authorization_header`] with a fixed nonce and
    /// timestamp.
    pub fn authorization_header_with(
        &self,
        method: HttpMethod,
        url: &str,
        query: &Parameters,
        body: &Parameters,
        stamp: &OAuthStamp,
    ) -> Result<Option<String>> {
        match self {
            Credential::None => Ok(None),
            Credential::Bearer { token } => Ok(Some(format!("Bearer {token}"))),
            Credential::Basic { key, secret } => {
                let encoded = general_purpose::STANDARD.encode(format!("{key}:{secret}"));
                Ok(Some(format!("Basic {encoded}")))
            }
            Credential::OAuth1 {
                consumer_key,
                consumer_secret,
                token,
                token_secret,
            } => {
                let mut oauth = vec![
                    ("oauth_consumer_key", consumer_key.clone()),
                    ("oauth_nonce", stamp.nonce.clone()),
                    ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
                    ("oauth_timestamp", stamp.timestamp.to_string()),
                    ("oauth_version", OAUTH_VERSION.to_string()),
                ];
                if let Some(token) = token {
                    oauth.push(("oauth_token", token.clone()));
                }

                let base = signature_base_string(method, url, &oauth, query, body)?;
                let key = format!(
                    "{}&{}",
                    percent_encode(consumer_secret),
                    percent_encode(token_secret.as_deref().unwrap_or(""))
                );
                oauth.push(("oauth_signature", hmac_sha1_base64(&key, &base)));
                oauth.sort_by(|a, b| a.0.cmp(b.0));

                let fields = oauth
                    .iter()
                    .map(|(name, value)| format!("{name}=\"{}\"", percent_encode(value)))
                    .collect::<Vec<_>>()
                    .join(", ");
                Ok(Some(format!("OAuth {fields}")))
            }
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::None => f.write_str("None"),
            Credential::OAuth1 {
                consumer_key,
                token,
                ..
            } => f
                .debug_struct("OAuth1")
                .field("consumer_key", consumer_key)
                .field("token", token)
                .finish_non_exhaustive(),
            Credential::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
            Credential::Basic { key, .. } => f
                .debug_struct("Basic")
                .field("key", key)
                .finish_non_exhaustive(),
        }
    }
}

/// Nonce and timestamp for a single OAuth1 signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthStamp {
    pub nonce: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
}

impl OAuthStamp {
    pub fn new(nonce: impl Into<String>, timestamp: u64) -> Self {
        Self {
            nonce: nonce.into(),
            timestamp,
        }
    }

    /// 32 hex characters from a v4 UUID and the current clock.
    pub fn fresh() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            nonce: Uuid::new_v4().simple().to_string(),
            timestamp,
        }
    }
}

/// `METHOD&enc(url)&enc(k=v&k=v...)` over the OAuth protocol parameters,
/// the query and the signable body, sorted by encoded key then encoded
/// value. Pairs sharing a key are all kept.
pub fn signature_base_string(
    method: HttpMethod,
    url: &str,
    oauth: &[(&str, String)],
    query: &Parameters,
    body: &Parameters,
) -> Result<String> {
    let mut pairs = encoded_pairs(query)?;
    pairs.extend(encoded_pairs(body)?);
    pairs.extend(
        oauth
            .iter()
            .map(|(name, value)| (percent_encode(name), percent_encode(value))),
    );
    pairs.sort();

    let parameter_string = pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.as_str(),
        percent_encode(url),
        percent_encode(&parameter_string)
    ))
}

fn hmac_sha1_base64(key: &str, message: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .expect("HMAC-SHA1 accepts keys of any length; this is an infallible operation");
    mac.update(message.as_bytes());
    general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}
