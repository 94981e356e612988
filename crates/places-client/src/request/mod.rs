//! Fluent request builders and their terminal operations.
//!
//! One generic [`RequestBuilder`] serves every endpoint; the endpoint marker
//! type (`NearbySearch`, `TextSearch`, `RadarSearch`, `Details`) fixes the
//! path, the result type, and which extra setters are available. Terminal
//! operations consume the builder, so the error listener is always part of
//! the request before it is dispatched.

mod endpoint;
mod search;

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use reqwest::Url;
use tokio::sync::oneshot;

use crate::client::PlacesClient;
use crate::dispatch::ContextHandle;
use crate::engine;
use crate::error::{PlacesError, RequestError};
use crate::query::Query;

pub use endpoint::{
    Details, Endpoint, NearbySearch, RadarSearch, TextSearch, DETAILS_PATH, NEARBY_SEARCH_PATH,
    RADAR_SEARCH_PATH, TEXT_SEARCH_PATH,
};
pub use search::{RankBy, SearchEndpoint, MAX_PRICE_TIER, MIN_PRICE_TIER};

/// Callback that receives failed outcomes.
pub type ErrorListener = Arc<dyn Fn(RequestError) + Send + Sync>;

/// What happens to a [`RequestError`] delivered through
/// [`RequestBuilder::execute`] when the request has no listener of its own.
#[derive(Clone, Default)]
pub enum ErrorPolicy {
    /// Escalate: panic on the delivery context with the error's diagnostics.
    #[default]
    Panic,
    /// Hand the error to a client-wide listener.
    Handler(ErrorListener),
}

impl ErrorPolicy {
    pub fn handler<F>(listener: F) -> Self
    where
        F: Fn(RequestError) + Send + Sync + 'static,
    {
        ErrorPolicy::Handler(Arc::new(listener))
    }

    /// # Panics
    ///
    /// Panics for [`ErrorPolicy::Panic`].
    pub fn deliver(&self, error: RequestError) {
        match self {
            ErrorPolicy::Panic => panic!("uncaught request error: {}", error.describe()),
            ErrorPolicy::Handler(listener) => listener(error),
        }
    }
}

impl std::fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPolicy::Panic => f.write_str("Panic"),
            ErrorPolicy::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// Accumulates the parameters of one request to endpoint `E`.
#[must_use = "a request does nothing until `send`, `spawn`, or `execute` is called"]
pub struct RequestBuilder<E> {
    client: PlacesClient,
    query: Query,
    error_policy: Option<ErrorPolicy>,
    endpoint: PhantomData<fn() -> E>,
}

impl<E: Endpoint> RequestBuilder<E> {
    pub(crate) fn new(client: PlacesClient) -> Self {
        Self {
            client,
            query: Query::new(E::PATH),
            error_policy: None,
            endpoint: PhantomData,
        }
    }

    pub(crate) fn param(mut self, key: &str, value: impl Into<crate::query::ParamValue>) -> Self {
        self.query.put(key, value);
        self
    }

    pub(crate) fn location_param(mut self, latitude: f64, longitude: f64) -> Self {
        self.query.put_location("location", latitude, longitude);
        self
    }

    /// Overrides the client-wide language for this request.
    pub fn language(self, language: &str) -> Self {
        self.param("language", language)
    }

    /// Registers the error listener for this request, replacing the client's
    /// [`ErrorPolicy`]. Only consulted by [`RequestBuilder::execute`].
    pub fn on_error<F>(mut self, listener: F) -> Self
    where
        F: Fn(RequestError) + Send + Sync + 'static,
    {
        self.error_policy = Some(ErrorPolicy::handler(listener));
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The URL this request would be sent to, API key and default language
    /// included.
    pub fn url(&self) -> Url {
        self.client.materialize(&self.query)
    }

    /// Runs the request on the current task.
    ///
    /// # Errors
    ///
    /// Returns the [`RequestError`] for a transport failure or a non-`OK`
    /// service status.
    pub async fn send(self) -> Result<E::Output, RequestError> {
        engine::run::<E::Output>(&self.client, &self.query).await
    }

    /// Runs the request on a background task and returns a handle that
    /// resolves to the outcome wherever it is awaited.
    ///
    /// With no runtime to run on (none configured on the client and none
    /// current here), the handle resolves at once to a [`RequestError`]
    /// whose cause is [`PlacesError::NoRuntime`].
    pub fn spawn(self) -> PendingRequest<E::Output> {
        let (tx, rx) = oneshot::channel();
        let client = self.client.clone();
        let query = self.query;
        let spawned = self.client.spawn_task(async move {
            let outcome = engine::run::<E::Output>(&client, &query).await;
            // The receiver may have been dropped; nothing is waiting then.
            let _ = tx.send(outcome);
        });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "request not started");
            let (tx, rx) = oneshot::channel();
            let _ = tx.send(Err(not_started(err)));
            return PendingRequest { rx };
        }
        PendingRequest { rx }
    }

    /// Runs the request on a background task and delivers the outcome on
    /// `context`: `on_complete` on success, otherwise this request's error
    /// listener or, failing that, the client's [`ErrorPolicy`]. Exactly one
    /// of the two runs, once.
    ///
    /// With no runtime to run on, the error path is taken with a
    /// [`PlacesError::NoRuntime`] cause, still on `context`.
    pub fn execute<F>(self, context: &ContextHandle, on_complete: F)
    where
        F: FnOnce(E::Output) + Send + 'static,
    {
        let policy = self
            .error_policy
            .unwrap_or_else(|| self.client.error_policy());
        let task_policy = policy.clone();
        let task_context = context.clone();
        let client = self.client.clone();
        let query = self.query;
        let spawned = self.client.spawn_task(async move {
            let outcome = engine::run::<E::Output>(&client, &query).await;
            task_context.post(move || match outcome {
                Ok(result) => on_complete(result),
                Err(error) => task_policy.deliver(error),
            });
        });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "request not started");
            let error = not_started(err);
            context.post(move || policy.deliver(error));
        }
    }
}

fn not_started(cause: PlacesError) -> RequestError {
    RequestError::new("request could not be started").with_cause(cause)
}

impl<E> std::fmt::Debug for RequestBuilder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("query", &self.query)
            .field("error_policy", &self.error_policy)
            .finish_non_exhaustive()
    }
}

/// Outcome of a request started with [`RequestBuilder::spawn`].
#[must_use = "the outcome is lost unless the pending request is awaited"]
#[derive(Debug)]
pub struct PendingRequest<R> {
    rx: oneshot::Receiver<Result<R, RequestError>>,
}

impl<R> Future for PendingRequest<R> {
    type Output = Result<R, RequestError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(RequestError::new(
                    "request task ended before delivering an outcome",
                ))
            })
        })
    }
}
