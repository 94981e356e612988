//! Asynchronous client for a place-search web service.
//!
//! # Overview
//! [`PlacesClient`] hands out one fluent [`RequestBuilder`] per endpoint
//! (nearby, text, radar, details). A builder accumulates parameters and ends
//! in one of three terminal operations:
//!
//! - [`RequestBuilder::send`] runs on the caller's task;
//! - [`RequestBuilder::spawn`] runs on a background task and returns a
//!   [`PendingRequest`];
//! - [`RequestBuilder::execute`] runs on a background task and delivers the
//!   outcome to an explicit [`ContextHandle`].
//!
//! Transport failures and non-`OK` service statuses both surface as a
//! [`RequestError`]. Place icons are fetched through a small shared
//! [`IconCache`].

pub mod client;
pub mod dispatch;
mod engine;
pub mod error;
pub mod icon_cache;
pub mod query;
pub mod request;
pub mod types;

pub use client::{ClientBuilder, PlacesClient, DEFAULT_BASE_URL};
pub use dispatch::{delivery_context, ContextHandle, ContextLoop};
pub use error::{PlacesError, RequestDescription, RequestError};
pub use icon_cache::{IconCache, DEFAULT_ICON_CACHE_CAPACITY};
pub use query::{ParamValue, Query};
pub use request::{
    Details, Endpoint, ErrorListener, ErrorPolicy, NearbySearch, PendingRequest, RadarSearch,
    RankBy, RequestBuilder, SearchEndpoint, TextSearch,
};
pub use types::{Geometry, LatLng, OpeningHours, Place, PlaceDetail, PlaceResponse, SearchResult, Status};

pub use image::DynamicImage;
