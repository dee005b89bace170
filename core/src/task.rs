//! Handle for one in-flight request.
//!
//! # Design
//! `SessionTask::spawn` runs the transport on a Tokio task and publishes the
//! single outcome on a `watch` channel. Every view (`response_data`, `json`,
//! `decode`, ...) waits on its own receiver and derives its result from the
//! shared raw response, so views are independent and may be requested in any
//! order, any number of times.
//!
//! Cancellation drops the transport future through a `CancellationToken`.
//! The outcome is only published while the token is still live, under the
//! channel's write lock, and `cancel` takes the read lock before returning.
//! Once `cancel` returns the task either already holds its outcome (and
//! behaves as if cancel came too late) or never will: the sender goes away
//! and every view reports `Error::Cancelled`.

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result, TransportCause};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

type Outcome = std::result::Result<HttpResponse, TransportCause>;

/// An in-flight or completed request.
///
/// Cloning yields another handle onto the same request.
#[derive(Debug, Clone)]
pub struct SessionTask {
    outcome: watch::Receiver<Option<Outcome>>,
    cancel: CancellationToken,
    runtime: Handle,
}

impl SessionTask {
    /// Dispatch `request` on the current Tokio runtime.
    ///
    /// Fails with `Error::Configuration` when called outside a runtime.
    pub fn spawn(transport: Arc<dyn Transport>, request: HttpRequest) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::Configuration(format!("no Tokio runtime to dispatch on: {e}")))?;
        let (sender, outcome) = watch::channel(None);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        runtime.spawn(async move {
            let method = request.method;
            let url = request.url.clone();
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(%method, %url, "request cancelled before completion");
                }
                result = transport.execute(request) => {
                    let result = result.map_err(TransportCause::from);
                    let published = sender.send_if_modified(|slot| {
                        if token.is_cancelled() {
                            return false;
                        }
                        *slot = Some(result);
                        true
                    });
                    if !published {
                        debug!(%method, %url, "request cancelled as it completed");
                    }
                }
            }
        });

        Ok(Self {
            outcome,
            cancel,
            runtime,
        })
    }

    /// Stop the request. No view or callback observes a result afterwards
    /// unless the request had already completed by the time this returns.
    pub fn cancel(&self) {
        self.cancel.cancel();
        // Waits out a publish that raced the token.
        let finished = self.outcome.borrow().is_some();
        debug!(finished, "cancel requested");
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether an outcome (response or transport failure) is available.
    pub fn is_finished(&self) -> bool {
        self.outcome.borrow().is_some()
    }

    /// The raw response.
    pub async fn response(&self) -> Result<HttpResponse> {
        let mut outcome = self.outcome.clone();
        let guard = outcome
            .wait_for(Option::is_some)
            .await
            .map_err(|_| Error::Cancelled)?;
        match &*guard {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(cause)) => Err(Error::Transport(cause.clone())),
            None => Err(Error::Cancelled),
        }
    }

    /// Raw body bytes, whatever the status.
    pub async fn response_data(&self) -> Result<Bytes> {
        self.response().await.map(|response| response.body)
    }

    /// Body as JSON, after the API-error check.
    pub async fn json(&self) -> Result<Value> {
        self.response().await?.json()
    }

    /// Body decoded into `T`, after the API-error check.
    pub async fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        self.response().await?.decode()
    }

    /// Run `handler` once with the raw body. Never runs if the task is
    /// cancelled before completing.
    pub fn on_response_data<F>(&self, handler: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Bytes>) + Send + 'static,
    {
        let task = self.clone();
        self.runtime.spawn(async move {
            let result = task.response_data().await;
            if !matches!(result, Err(Error::Cancelled)) {
                handler(result);
            }
        })
    }

    /// Run `handler` once with the JSON view.
    pub fn on_json<F>(&self, handler: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Value>) + Send + 'static,
    {
        let task = self.clone();
        self.runtime.spawn(async move {
            let result = task.json().await;
            if !matches!(result, Err(Error::Cancelled)) {
                handler(result);
            }
        })
    }

    /// Run `handler` once with the typed view.
    pub fn on_decode<T, F>(&self, handler: F) -> JoinHandle<()>
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T>) + Send + 'static,
    {
        let task = self.clone();
        self.runtime.spawn(async move {
            let result = task.decode::<T>().await;
            if !matches!(result, Err(Error::Cancelled)) {
                handler(result);
            }
        })
    }
}
