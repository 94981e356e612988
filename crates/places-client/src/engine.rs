//! Executes one built request and classifies its outcome.
//!
//! ```text
//! Built ──► Dispatched ──┬─► Transport-Failure ─┐
//!                        ├─► Parsed-Failure ────┼─► Result<R, RequestError>
//!                        └─► Parsed-Success ────┘
//! ```
//!
//! There is no retry: a single failed attempt is terminal for the request.

use reqwest::Url;

use crate::client::PlacesClient;
use crate::error::{PlacesError, RequestDescription, RequestError};
use crate::query::Query;
use crate::types::PlaceResponse;

const REDACTED: &str = "REDACTED";

/// Fetches and parses `query`, then splits the result into success or error.
pub(crate) async fn run<R: PlaceResponse>(
    client: &PlacesClient,
    query: &Query,
) -> Result<R, RequestError> {
    into_outcome(fetch::<R>(client, query).await)
}

/// Fetches and parses `query` into `R`. Never fails: transport and parse
/// failures produce an `R` that carries only the error, and a non-`OK`
/// status attaches an error whose reason is the status string.
pub(crate) async fn fetch<R: PlaceResponse>(client: &PlacesClient, query: &Query) -> R {
    let url = client.materialize(query);
    let request = RequestDescription {
        method: "GET".to_owned(),
        url: redact_key(&url),
    };
    tracing::debug!(path = query.path(), url = %request.url, "dispatching places request");

    let body = match client.request_text(&url).await {
        Ok(body) => body,
        Err(err) => {
            tracing::warn!(path = query.path(), error = %err, "places request failed");
            return R::from_error(RequestError::transport(
                format!("failed to request {}", query.path()),
                err,
                request,
            ));
        }
    };

    let mut result: R = match serde_json::from_str(&body) {
        Ok(result) => result,
        Err(source) => {
            tracing::warn!(path = query.path(), error = %source, "unparsable places response");
            return R::from_error(RequestError::transport(
                format!("failed to parse response from {}", query.path()),
                PlacesError::Deserialize {
                    context: query.path().to_owned(),
                    source,
                },
                request,
            ));
        }
    };

    if let Some(error) = result.error() {
        tracing::warn!(path = query.path(), status = error.reason(), "places service reported failure");
        result.set_error(error.with_request(request));
    }
    result
}

fn into_outcome<R: PlaceResponse>(result: R) -> Result<R, RequestError> {
    match result.error() {
        None => Ok(result),
        Some(error) => Err(error),
    }
}

/// Renders `url` with the `key` parameter's value masked.
pub(crate) fn redact_key(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == "key") {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == "key" { REDACTED.to_owned() } else { v.into_owned() };
            (k.into_owned(), value)
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
