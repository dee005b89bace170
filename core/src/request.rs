//! Endpoint descriptors.
//!
//! # Design
//! Any type exposing a method, a path and two parameter maps can be sent;
//! that shape is the `ApiRequest` trait. `Endpoint` is the one concrete
//! descriptor the crate ships: endpoints are data, built through named
//! constructors in `crate::endpoints`, rather than a type per endpoint.
//!
//! Types that only know a flat `parameters()` map get the usual placement
//! for free: query string for GET/DELETE, body for POST/PUT.

use serde_json::Value;

use crate::encoding::Parameters;
use crate::http::HttpMethod;

/// Which configured host an endpoint lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseUrl {
    #[default]
    Api,
    Upload,
}

/// How body parameters are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyContentType {
    /// `application/x-www-form-urlencoded`, included in OAuth1 signatures.
    #[default]
    FormUrlEncoded,
    /// `application/json`, excluded from OAuth1 signatures.
    Json,
}

/// The capability required of anything passed to `ApiSession::send`.
pub trait ApiRequest {
    fn method(&self) -> HttpMethod;

    /// Path relative to the base URL, starting with `/`.
    fn path(&self) -> String;

    fn base_url(&self) -> BaseUrl {
        BaseUrl::Api
    }

    fn body_content_type(&self) -> BodyContentType {
        BodyContentType::FormUrlEncoded
    }

    /// Parameters placed according to the method.
    fn parameters(&self) -> Parameters {
        Parameters::new()
    }

    fn query_parameters(&self) -> Parameters {
        if self.method().prefers_query() {
            self.parameters()
        } else {
            Parameters::new()
        }
    }

    fn body_parameters(&self) -> Parameters {
        if self.method().prefers_query() {
            Parameters::new()
        } else {
            self.parameters()
        }
    }
}

/// A declarative endpoint description.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    method: HttpMethod,
    path: String,
    base_url: BaseUrl,
    content_type: BodyContentType,
    query: Parameters,
    body: Parameters,
}

impl Endpoint {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            base_url: BaseUrl::Api,
            content_type: BodyContentType::FormUrlEncoded,
            query: Parameters::new(),
            body: Parameters::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Send to the upload host instead of the API host.
    pub fn on_upload_host(mut self) -> Self {
        self.base_url = BaseUrl::Upload;
        self
    }

    pub fn json_body(mut self) -> Self {
        self.content_type = BodyContentType::Json;
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a body parameter.
    pub fn body(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Add a parameter where the method would put it.
    pub fn param(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if self.method.prefers_query() {
            self.query(key, value)
        } else {
            self.body(key, value)
        }
    }

    /// Add a parameter only when a value is present.
    pub fn optional_param<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }
}

impl ApiRequest for Endpoint {
    fn method(&self) -> HttpMethod {
        self.method
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn base_url(&self) -> BaseUrl {
        self.base_url
    }

    fn body_content_type(&self) -> BodyContentType {
        self.content_type
    }

    fn query_parameters(&self) -> Parameters {
        self.query.clone()
    }

    fn body_parameters(&self) -> Parameters {
        self.body.clone()
    }
}
