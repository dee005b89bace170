//! The public entry point: build, sign and dispatch.
//!
//! # Design
//! `ApiSession` owns a `RequestBuilder` and a shared `Transport`. Both are
//! read-only after construction, so one session can serve any number of
//! concurrent `send` calls without locking. Build failures are returned
//! from `send` directly; everything after dispatch arrives through the
//! returned `SessionTask`.

use std::fmt;
use std::sync::Arc;

use tracing::instrument;

use crate::auth::Credential;
use crate::builder::RequestBuilder;
use crate::config::{Environment, SessionConfig};
use crate::error::Result;
use crate::request::ApiRequest;
use crate::task::SessionTask;
use crate::transport::{ReqwestTransport, Transport};

/// Client session bound to one environment and credential.
#[derive(Clone)]
pub struct ApiSession {
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
}

impl ApiSession {
    /// Session over a reqwest client with default settings.
    pub fn new(credential: Credential, environment: Environment) -> Result<Self> {
        Self::with_config(credential, environment, &SessionConfig::default())
    }

    pub fn with_config(
        credential: Credential,
        environment: Environment,
        config: &SessionConfig,
    ) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(credential, environment, Arc::new(transport)))
    }

    /// Session over a caller-supplied transport.
    pub fn with_transport(
        credential: Credential,
        environment: Environment,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            builder: RequestBuilder::new(environment, credential),
            transport,
        }
    }

    pub fn environment(&self) -> &Environment {
        self.builder.environment()
    }

    pub fn credential(&self) -> &Credential {
        self.builder.credential()
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Build `request` and dispatch it on the current Tokio runtime.
    ///
    /// Encoding and URL errors are returned here, before any I/O, as is
    /// `Error::Configuration` when no runtime is running. Transport, API and
    /// decoding errors come out of the task's views.
    #[instrument(
        name = "api_send",
        skip(self, request),
        fields(method = %request.method(), path = %request.path())
    )]
    pub fn send<R: ApiRequest + ?Sized>(&self, request: &R) -> Result<SessionTask> {
        let built = self.builder.build(request)?;
        SessionTask::spawn(Arc::clone(&self.transport), built)
    }
}

impl fmt::Debug for ApiSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSession")
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}
