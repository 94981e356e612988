//! Places API response types.
//!
//! Every response is a JSON object carrying a `status` string. Exactly `OK`
//! is success; every other status still parses into a well-formed result
//! object. Success is decided by [`PlaceResponse::is_success`], which also
//! accounts for an error attached by the execution engine.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::RequestError;

/// Service-level status code, orthogonal to HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Status {
    Ok,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    NotFound,
    UnknownError,
    /// Any status this client does not know, kept verbatim.
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Ok => "OK",
            Status::ZeroResults => "ZERO_RESULTS",
            Status::OverQueryLimit => "OVER_QUERY_LIMIT",
            Status::RequestDenied => "REQUEST_DENIED",
            Status::InvalidRequest => "INVALID_REQUEST",
            Status::NotFound => "NOT_FOUND",
            Status::UnknownError => "UNKNOWN_ERROR",
            Status::Other(s) => s,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match value.as_str() {
            "OK" => Status::Ok,
            "ZERO_RESULTS" => Status::ZeroResults,
            "OVER_QUERY_LIMIT" => Status::OverQueryLimit,
            "REQUEST_DENIED" => Status::RequestDenied,
            "INVALID_REQUEST" => Status::InvalidRequest,
            "NOT_FOUND" => Status::NotFound,
            "UNKNOWN_ERROR" => Status::UnknownError,
            _ => Status::Other(value),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
}

/// A single place entry as returned by the search and detail endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// URL of the place's icon image.
    #[serde(default)]
    pub icon: Option<String>,
    /// Token accepted by the detail endpoint.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub international_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Place {
    pub fn location(&self) -> Option<LatLng> {
        self.geometry.as_ref().map(|g| g.location)
    }

    /// Formatted address if present, otherwise the vicinity text.
    pub fn address(&self) -> Option<&str> {
        self.formatted_address
            .as_deref()
            .or(self.vicinity.as_deref())
    }
}

/// Common contract of every endpoint result.
///
/// `is_success()` is true iff no error is carried and the status is `OK`;
/// `error()` returns `None` exactly when `is_success()` is true.
pub trait PlaceResponse: DeserializeOwned + Send + 'static {
    fn status(&self) -> Option<&Status>;

    fn carried_error(&self) -> Option<&RequestError>;

    fn set_error(&mut self, error: RequestError);

    /// A result that carries only `error` (no payload).
    fn from_error(error: RequestError) -> Self;

    fn is_success(&self) -> bool {
        self.carried_error().is_none() && self.status().is_some_and(Status::is_ok)
    }

    /// The carried error, or one synthesized from a non-`OK` status.
    fn error(&self) -> Option<RequestError> {
        if let Some(err) = self.carried_error() {
            return Some(err.clone());
        }
        match self.status() {
            Some(status) if status.is_ok() => None,
            Some(status) => Some(RequestError::new(status.as_str())),
            None => Some(RequestError::new("missing status")),
        }
    }
}

/// Result of a nearby, text, or radar search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    status: Option<Status>,
    #[serde(default)]
    results: Vec<Place>,
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default)]
    html_attributions: Vec<String>,
    #[serde(skip)]
    error: Option<RequestError>,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Place> {
        self.results.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Place> {
        self.results.iter()
    }

    pub fn places(&self) -> &[Place] {
        &self.results
    }

    /// Token for fetching the next page with
    /// [`crate::RequestBuilder::page_token`]. Not followed automatically.
    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    pub fn html_attributions(&self) -> &[String] {
        &self.html_attributions
    }
}

impl std::ops::Index<usize> for SearchResult {
    type Output = Place;

    fn index(&self, index: usize) -> &Place {
        &self.results[index]
    }
}

impl<'a> IntoIterator for &'a SearchResult {
    type Item = &'a Place;
    type IntoIter = std::slice::Iter<'a, Place>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl IntoIterator for SearchResult {
    type Item = Place;
    type IntoIter = std::vec::IntoIter<Place>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl PlaceResponse for SearchResult {
    fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    fn carried_error(&self) -> Option<&RequestError> {
        self.error.as_ref()
    }

    fn set_error(&mut self, error: RequestError) {
        self.error = Some(error);
    }

    fn from_error(error: RequestError) -> Self {
        Self {
            status: None,
            results: Vec::new(),
            next_page_token: None,
            html_attributions: Vec::new(),
            error: Some(error),
        }
    }
}

/// Result of a detail lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetail {
    #[serde(default)]
    status: Option<Status>,
    #[serde(default)]
    result: Option<Place>,
    #[serde(default)]
    html_attributions: Vec<String>,
    #[serde(skip)]
    error: Option<RequestError>,
}

impl PlaceDetail {
    pub fn place(&self) -> Option<&Place> {
        self.result.as_ref()
    }

    pub fn into_place(self) -> Option<Place> {
        self.result
    }

    pub fn html_attributions(&self) -> &[String] {
        &self.html_attributions
    }
}

impl PlaceResponse for PlaceDetail {
    fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    fn carried_error(&self) -> Option<&RequestError> {
        self.error.as_ref()
    }

    fn set_error(&mut self, error: RequestError) {
        self.error = Some(error);
    }

    fn from_error(error: RequestError) -> Self {
        Self {
            status: None,
            result: None,
            html_attributions: Vec::new(),
            error: Some(error),
        }
    }
}
