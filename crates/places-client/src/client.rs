//! HTTP client for the places web service.
//!
//! Wraps `reqwest` with API key and language injection, hands out one
//! [`RequestBuilder`] per endpoint, and owns the process-wide [`IconCache`]
//! shared by every clone of the client.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use image::DynamicImage;
use places_core::AppConfig;
use reqwest::{Client, Url};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::dispatch::ContextHandle;
use crate::error::PlacesError;
use crate::icon_cache::{IconCache, DEFAULT_ICON_CACHE_CAPACITY};
use crate::query::Query;
use crate::request::{
    Details, ErrorPolicy, NearbySearch, RadarSearch, RequestBuilder, TextSearch,
};
use crate::types::Place;

pub const DEFAULT_BASE_URL: &str = places_core::DEFAULT_BASE_URL;
const DEFAULT_USER_AGENT: &str = "places-client/0.1";
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

type IconFetch = Shared<BoxFuture<'static, Option<DynamicImage>>>;

struct Inner {
    http: Client,
    api_key: String,
    base_url: Url,
    language: RwLock<String>,
    icons: IconCache,
    icon_fetches: Mutex<HashMap<String, IconFetch>>,
    error_policy: ErrorPolicy,
    runtime: Option<Handle>,
}

/// Client for the places web service.
///
/// Cloning is cheap; clones share configuration and the icon cache. Use
/// [`PlacesClient::builder`] to configure one, or [`PlacesClient::new`] for
/// production defaults.
#[derive(Clone)]
pub struct PlacesClient {
    inner: Arc<Inner>,
}

impl PlacesClient {
    /// Creates a client pointed at the production service with default
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str) -> Result<Self, PlacesError> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: &str) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Creates a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Same as [`ClientBuilder::build`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::builder(&config.api_key)
            .base_url(&config.base_url)
            .language(&config.language)
            .user_agent(&config.user_agent)
            .timeout_secs(config.request_timeout_secs)
            .icon_cache_capacity(config.icon_cache_capacity)
            .build()
    }

    /// Nearby search around `latitude`,`longitude` within `radius_meters`.
    pub fn nearby_search(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
        sensor: bool,
    ) -> RequestBuilder<NearbySearch> {
        RequestBuilder::new(self.clone())
            .location_param(latitude, longitude)
            .param("radius", radius_meters)
            .param("sensor", sensor)
    }

    /// Free-text search such as `"pizza in New York"`.
    pub fn text_search(&self, query: &str, sensor: bool) -> RequestBuilder<TextSearch> {
        RequestBuilder::new(self.clone())
            .param("query", query)
            .param("sensor", sensor)
    }

    pub fn radar_search(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
        sensor: bool,
    ) -> RequestBuilder<RadarSearch> {
        RequestBuilder::new(self.clone())
            .location_param(latitude, longitude)
            .param("radius", radius_meters)
            .param("sensor", sensor)
    }

    /// Detail lookup for the place identified by `reference`.
    pub fn details(&self, reference: &str, sensor: bool) -> RequestBuilder<Details> {
        RequestBuilder::new(self.clone())
            .param("reference", reference)
            .param("sensor", sensor)
    }

    /// Default `language` sent with every request that does not set its own.
    pub fn language(&self) -> String {
        self.inner
            .language
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_language(&self, language: &str) {
        *self
            .inner
            .language
            .write()
            .unwrap_or_else(PoisonError::into_inner) = language.to_owned();
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn icon_cache(&self) -> &IconCache {
        &self.inner.icons
    }

    pub(crate) fn error_policy(&self) -> ErrorPolicy {
        self.inner.error_policy.clone()
    }

    /// Builds the final URL for `query`: `key` and the current default
    /// language first, caller parameters on top.
    pub(crate) fn materialize(&self, query: &Query) -> Url {
        let language = self.language();
        query.to_url(
            &self.inner.base_url,
            &[("key", self.inner.api_key.as_str()), ("language", language.as_str())],
        )
    }

    /// Runtime for background tasks: the configured one, else the runtime
    /// current on the calling thread.
    fn runtime_handle(&self) -> Result<Handle, PlacesError> {
        match &self.inner.runtime {
            Some(handle) => Ok(handle.clone()),
            None => Handle::try_current().map_err(|_| PlacesError::NoRuntime),
        }
    }

    /// # Errors
    ///
    /// Returns [`PlacesError::NoRuntime`] when there is no runtime to spawn
    /// on; `task` is dropped without running.
    pub(crate) fn spawn_task<F>(&self, task: F) -> Result<JoinHandle<F::Output>, PlacesError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        Ok(self.runtime_handle()?.spawn(task))
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and returns the body.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] on network failure or a non-2xx status.
    pub(crate) async fn request_text(&self, url: &Url) -> Result<String, PlacesError> {
        let response = self.inner.http.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Downloads and decodes the image at `url`, bypassing the cache.
    ///
    /// Returns `Ok(None)` for a non-2xx response.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::Image`] if the body is not a decodable image.
    pub async fn fetch_icon(&self, url: &str) -> Result<Option<DynamicImage>, PlacesError> {
        let response = self.inner.http.get(url).send().await?;
        if !response.status().is_success() {
            tracing::debug!(url, status = %response.status(), "icon request returned non-success status");
            return Ok(None);
        }
        let bytes = response.bytes().await?;
        Ok(Some(image::load_from_memory(&bytes)?))
    }

    /// Icon for `place`, served from the cache when possible. Any failure
    /// yields `None`.
    pub async fn icon(&self, place: &Place) -> Option<DynamicImage> {
        let url = place.icon.as_deref()?;
        self.icon_for_url(url).await
    }

    /// Cached, de-duplicated icon fetch: concurrent misses for one URL share
    /// a single download.
    pub async fn icon_for_url(&self, url: &str) -> Option<DynamicImage> {
        if let Some(hit) = self.inner.icons.get(url) {
            tracing::debug!(url, "icon cache hit");
            return Some(hit);
        }
        self.shared_icon_fetch(url).await
    }

    /// Fetches the icon for `place` in the background and posts `on_icon` to
    /// `context` if an image was obtained. Nothing is delivered otherwise,
    /// including when no runtime is available to run the fetch.
    pub fn icon_with<F>(&self, place: &Place, context: &ContextHandle, on_icon: F)
    where
        F: FnOnce(DynamicImage) + Send + 'static,
    {
        let Some(url) = place.icon.clone() else {
            return;
        };
        let client = self.clone();
        let context = context.clone();
        let spawned = self.spawn_task(async move {
            if let Some(icon) = client.icon_for_url(&url).await {
                context.post(move || on_icon(icon));
            }
        });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "icon fetch not started");
        }
    }

    /// Joins the in-flight download for `url` or starts one. The download
    /// runs on its own task, so it finishes and clears its entry even when
    /// every waiter has gone away.
    fn shared_icon_fetch(&self, url: &str) -> IconFetch {
        let Ok(runtime) = self.runtime_handle() else {
            let client = self.clone();
            let key = url.to_owned();
            return async move { client.download_icon(&key).await }
                .boxed()
                .shared();
        };

        let mut fetches = self.icon_fetches();
        if let Some(existing) = fetches.get(url) {
            tracing::debug!(url, "joining in-flight icon fetch");
            return existing.clone();
        }

        tracing::debug!(url, "icon cache miss");
        let client = self.clone();
        let key = url.to_owned();
        // The entry is inserted below before this lock is released, so the
        // task's removal always follows the insert.
        let download = runtime.spawn(async move {
            let icon = client.download_icon(&key).await;
            client.icon_fetches().remove(&key);
            icon
        });
        let fetch = async move { download.await.ok().flatten() }.boxed().shared();

        fetches.insert(url.to_owned(), fetch.clone());
        fetch
    }

    /// Uncached fetch that stores a successful result in the icon cache.
    async fn download_icon(&self, url: &str) -> Option<DynamicImage> {
        let icon = match self.fetch_icon(url).await {
            Ok(icon) => icon,
            Err(err) => {
                tracing::warn!(url, error = %err, "icon fetch failed");
                None
            }
        };
        if let Some(icon) = &icon {
            self.inner.icons.put(url, icon.clone());
        }
        icon
    }

    fn icon_fetches(&self) -> MutexGuard<'_, HashMap<String, IconFetch>> {
        self.inner
            .icon_fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.inner.base_url.as_str())
            .field("language", &self.language())
            .field("icon_cache_capacity", &self.inner.icons.capacity())
            .field("error_policy", &self.inner.error_policy)
            .finish_non_exhaustive()
    }
}

/// Configures and builds a [`PlacesClient`].
#[derive(Debug)]
#[must_use]
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    language: String,
    user_agent: String,
    timeout_secs: u64,
    icon_cache_capacity: usize,
    error_policy: ErrorPolicy,
    runtime: Option<Handle>,
}

impl ClientBuilder {
    fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            language: DEFAULT_LANGUAGE.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            icon_cache_capacity: DEFAULT_ICON_CACHE_CAPACITY,
            error_policy: ErrorPolicy::default(),
            runtime: None,
        }
    }

    /// Service base, e.g. a wiremock server URI in tests.
    pub fn base_url(mut self, base_url: &str) -> Self {
        base_url.clone_into(&mut self.base_url);
        self
    }

    pub fn language(mut self, language: &str) -> Self {
        language.clone_into(&mut self.language);
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        user_agent.clone_into(&mut self.user_agent);
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn icon_cache_capacity(mut self, capacity: usize) -> Self {
        self.icon_cache_capacity = capacity;
        self
    }

    /// Policy for errors from [`RequestBuilder::execute`] requests that have
    /// no listener of their own. Defaults to [`ErrorPolicy::Panic`].
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Runtime for background tasks. Without one, `build` captures the
    /// runtime it is called from, if any; otherwise tasks go to the runtime
    /// current at each call site.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// # Errors
    ///
    /// - [`PlacesError::InvalidBaseUrl`] if the base URL does not parse or
    ///   cannot carry a path.
    /// - [`PlacesError::InvalidIconCacheCapacity`] for a zero capacity.
    /// - [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn build(self) -> Result<PlacesClient, PlacesError> {
        let base_url = Url::parse(&self.base_url).map_err(|e| PlacesError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PlacesError::InvalidBaseUrl {
                url: self.base_url,
                reason: "URL cannot carry a path".to_owned(),
            });
        }
        if self.icon_cache_capacity == 0 {
            return Err(PlacesError::InvalidIconCacheCapacity);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(self.user_agent)
            .build()?;

        Ok(PlacesClient {
            inner: Arc::new(Inner {
                http,
                api_key: self.api_key,
                base_url,
                language: RwLock::new(self.language),
                icons: IconCache::new(self.icon_cache_capacity),
                icon_fetches: Mutex::new(HashMap::new()),
                error_policy: self.error_policy,
                runtime: self.runtime.or_else(|| Handle::try_current().ok()),
            }),
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
