//! Turns endpoint descriptors into transport-ready requests.
//!
//! # Design
//! `RequestBuilder` holds only the environment and the credential and
//! carries no mutable state between calls. Each build resolves the URL,
//! encodes the query and body maps independently and attaches the
//! `Authorization` header. Nothing here touches the network, so every
//! failure surfaces before a request is dispatched.

use tracing::debug;
use url::Url;

use crate::auth::{Credential, OAuthStamp};
use crate::config::Environment;
use crate::encoding::{encode, Parameters};
use crate::error::{Error, Result};
use crate::http::HttpRequest;
use crate::request::{ApiRequest, BodyContentType};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Stateless request builder for one environment and credential.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    environment: Environment,
    credential: Credential,
}

impl RequestBuilder {
    pub fn new(environment: Environment, credential: Credential) -> Self {
        Self {
            environment,
            credential,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Build `request`, signing with a fresh nonce and the current time.
    pub fn build<R: ApiRequest + ?Sized>(&self, request: &R) -> Result<HttpRequest> {
        self.build_with(request, &OAuthStamp::fresh())
    }

    /// Build `request` with a caller-supplied OAuth1 nonce and timestamp.
    pub fn build_with<R: ApiRequest + ?Sized>(
        &self,
        request: &R,
        stamp: &OAuthStamp,
    ) -> Result<HttpRequest> {
        let method = request.method();
        let base_url = self.environment.base_url(request.base_url());
        let url = resolve_url(base_url, &request.path())?;

        let query = request.query_parameters();
        let body_parameters = request.body_parameters();
        let content_type = request.body_content_type();

        let mut headers = Vec::new();
        let body = if body_parameters.is_empty() {
            None
        } else {
            match content_type {
                BodyContentType::FormUrlEncoded => {
                    headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
                    Some(encode(&body_parameters)?)
                }
                BodyContentType::Json => {
                    headers.push(("content-type".to_string(), JSON_CONTENT_TYPE.to_string()));
                    let json = serde_json::to_string(&body_parameters)
                        .map_err(|e| Error::encoding("<body>", e.to_string()))?;
                    Some(json)
                }
            }
        };

        let signed_body = signed_body_parameters(request);
        if let Some(authorization) =
            self.credential
                .authorization_header_with(method, &url, &query, &signed_body, stamp)?
        {
            headers.push(("authorization".to_string(), authorization));
        }

        let query_string = encode(&query)?;
        let url = if query_string.is_empty() {
            url
        } else {
            format!("{url}?{query_string}")
        };

        debug!(%method, %url, has_body = body.is_some(), "built request");

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

/// Join `path` onto `base` and check the result is an absolute URL with no
/// query or fragment of its own.
fn resolve_url(base: &str, path: &str) -> Result<String> {
    let joined = format!("{}{}", base.trim_end_matches('/'), path);
    if !path.starts_with('/') {
        return Err(Error::invalid_url(joined, "path must start with `/`"));
    }

    let parsed = Url::parse(&joined).map_err(|e| Error::invalid_url(&joined, e.to_string()))?;
    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(Error::invalid_url(joined, "base URL must be absolute"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(Error::invalid_url(
            joined,
            "path must not carry a query or fragment",
        ));
    }
    Ok(parsed.into())
}

/// Body parameters that take part in the OAuth1 signature. JSON bodies are
/// left out.
pub fn signed_body_parameters<R: ApiRequest + ?Sized>(request: &R) -> Parameters {
    match request.body_content_type() {
        BodyContentType::FormUrlEncoded => request.body_parameters(),
        BodyContentType::Json => Parameters::new(),
    }
}
