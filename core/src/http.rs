//! HTTP request/response values exchanged with the transport.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! builder produces an `HttpRequest` without touching the network; a
//! `Transport` (or any host code) executes it and hands back an
//! `HttpResponse`. Keeping the boundary as data makes the builder fully
//! deterministic and easy to test.
//!
//! Request bodies are always textual (form-encoded or JSON), so they stay
//! `String`. Response bodies are `Bytes` so that every view on a completed
//! task can share them without copying.

use std::fmt;

use bytes::Bytes;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Uppercase method name as it appears on the wire and in OAuth1 base
    /// strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether untyped `parameters()` belong in the query string for this
    /// method. POST and PUT carry them in the body instead.
    pub fn prefers_query(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A transport-ready HTTP request.
///
/// Built by `RequestBuilder::build`. `url` is absolute and already carries
/// the encoded query string, if any. `body` is `None` whenever the endpoint
/// has no body parameters, regardless of method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Rate-limit window advertised by the server, if all three
    /// `x-rate-limit-*` headers are present and numeric.
    pub fn rate_limit(&self) -> Option<RateLimit> {
        let read = |name: &str| self.header(name)?.trim().parse::<u64>().ok();
        Some(RateLimit {
            limit: read("x-rate-limit-limit")?,
            remaining: read("x-rate-limit-remaining")?,
            reset: read("x-rate-limit-reset")?,
        })
    }
}

/// Rate-limit headers returned with most API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    /// Unix time in seconds at which the window resets.
    pub reset: u64,
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(headers: &[(&str, &str)]) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: Bytes::new(),
        }
    }

    #[test]
    fn method_names_are_uppercase() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn query_preference_follows_method() {
        assert!(HttpMethod::Get.prefers_query());
        assert!(HttpMethod::Delete.prefers_query());
        assert!(!HttpMethod::Post.prefers_query());
        assert!(!HttpMethod::Put.prefers_query());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let resp = response(&[("Content-Type", "application/json")]);
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.header("authorization"), None);
    }

    #[test]
    fn rate_limit_parses_all_three_headers() {
        let resp = response(&[
            ("x-rate-limit-limit", "900"),
            ("x-rate-limit-remaining", "899"),
            ("x-rate-limit-reset", "1700000900"),
        ]);
        assert_eq!(
            resp.rate_limit(),
            Some(RateLimit {
                limit: 900,
                remaining: 899,
                reset: 1_700_000_900,
            })
        );
    }

    #[test]
    fn rate_limit_missing_header_is_none() {
        let resp = response(&[("x-rate-limit-limit", "900")]);
        assert!(resp.rate_limit().is_none());
    }

    #[test]
    fn success_range() {
        let mut resp = response(&[]);
        assert!(resp.is_success());
        resp.status = 204;
        assert!(resp.is_success());
        resp.status = 404;
        assert!(!resp.is_success());
    }
}
