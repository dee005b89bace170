//! Request-building and transport core for the Twitter REST API.
//!
//! # Overview
//! An endpoint descriptor (method, path, query and body parameters) is
//! turned into a canonical, percent-encoded and signed `HttpRequest`, handed
//! to a `Transport`, and the outcome is exposed through a `SessionTask` with
//! raw, JSON and typed views.
//!
//! # Design
//! - `encoding` and `auth` are pure functions of their inputs (plus clock and
//!   random source for OAuth1 nonces).
//! - `RequestBuilder` never touches the network; build errors surface before
//!   dispatch.
//! - `ApiSession::send` is generic over anything implementing `ApiRequest`;
//!   endpoints are data (`Endpoint`) with named constructors in `endpoints`.
//! - The transport is a trait object so hosts and tests can swap in their own
//!   HTTP stack; `ReqwestTransport` is the default.

pub mod auth;
pub mod builder;
pub mod config;
pub mod encoding;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod session;
pub mod task;
pub mod transport;

pub use auth::{Credential, OAuthStamp};
pub use builder::RequestBuilder;
pub use config::{Environment, SessionConfig};
pub use encoding::Parameters;
pub use error::{Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RateLimit};
pub use request::{ApiRequest, BaseUrl, BodyContentType, Endpoint};
pub use session::ApiSession;
pub use task::SessionTask;
pub use transport::{ReqwestTransport, Transport, TransportFailure};
