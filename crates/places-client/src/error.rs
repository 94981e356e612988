use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Low-level failures raised while talking to the places service.
///
/// These are the *causes* carried inside a [`RequestError`]; icon fetches
/// surface them directly through [`crate::PlacesClient::fetch_icon`].
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The icon body could not be decoded as an image.
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("icon cache capacity must be at least 1")]
    InvalidIconCacheCapacity,

    /// Background work was requested but the client has no runtime handle
    /// and none is current on the calling thread.
    #[error("no Tokio runtime available for background work")]
    NoRuntime,
}

/// Method and URL of the request an error belongs to. The API key value is
/// redacted from `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescription {
    pub method: String,
    pub url: String,
}

impl fmt::Display for RequestDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Failure delivered to error listeners for search and detail requests.
///
/// Both transport failures and non-`OK` service statuses end up here so a
/// caller needs only one handling path. For service failures `reason` is the
/// status string itself and there is no cause.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct RequestError {
    reason: String,
    #[source]
    cause: Option<Arc<PlacesError>>,
    request: Option<RequestDescription>,
}

impl RequestError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            cause: None,
            request: None,
        }
    }

    /// A failure that happened before a response body could be parsed.
    pub(crate) fn transport(
        reason: impl Into<String>,
        cause: PlacesError,
        request: RequestDescription,
    ) -> Self {
        Self {
            reason: reason.into(),
            cause: Some(Arc::new(cause)),
            request: Some(request),
        }
    }

    #[must_use]
    pub(crate) fn with_cause(mut self, cause: PlacesError) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    #[must_use]
    pub fn with_request(mut self, request: RequestDescription) -> Self {
        self.request = Some(request);
        self
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The underlying transport or parse failure, if any.
    pub fn cause(&self) -> Option<&PlacesError> {
        self.cause.as_deref()
    }

    pub fn request(&self) -> Option<&RequestDescription> {
        self.request.as_ref()
    }

    /// Multi-line diagnostic: reason, request line, and cause chain.
    pub fn describe(&self) -> String {
        let mut out = format!("RequestError: {}", self.reason);
        if let Some(request) = &self.request {
            out.push('\n');
            out.push_str(&request.to_string());
        }
        if let Some(cause) = &self.cause {
            out.push_str(": ");
            out.push_str(&cause.to_string());
        }
        out
    }
}
