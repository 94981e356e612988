use crate::types::{PlaceDetail, PlaceResponse, SearchResult};

use super::RequestBuilder;

pub const NEARBY_SEARCH_PATH: &str = "/nearbysearch/json";
pub const TEXT_SEARCH_PATH: &str = "/textsearch/json";
pub const RADAR_SEARCH_PATH: &str = "/radarsearch/json";
pub const DETAILS_PATH: &str = "/details/json";

/// Path and result type of one service endpoint.
pub trait Endpoint: Send + 'static {
    const PATH: &'static str;
    type Output: PlaceResponse;
}

#[derive(Debug, Clone, Copy)]
pub struct NearbySearch;

#[derive(Debug, Clone, Copy)]
pub struct TextSearch;

#[derive(Debug, Clone, Copy)]
pub struct RadarSearch;

#[derive(Debug, Clone, Copy)]
pub struct Details;

impl Endpoint for NearbySearch {
    const PATH: &'static str = NEARBY_SEARCH_PATH;
    type Output = SearchResult;
}

impl Endpoint for TextSearch {
    const PATH: &'static str = TEXT_SEARCH_PATH;
    type Output = SearchResult;
}

impl Endpoint for RadarSearch {
    const PATH: &'static str = RADAR_SEARCH_PATH;
    type Output = SearchResult;
}

impl Endpoint for Details {
    const PATH: &'static str = DETAILS_PATH;
    type Output = PlaceDetail;
}

impl RequestBuilder<NearbySearch> {
    pub fn keyword(self, keyword: &str) -> Self {
        self.param("keyword", keyword)
    }
}

impl RequestBuilder<TextSearch> {
    /// Biases results towards `latitude`,`longitude`.
    pub fn location(self, latitude: f64, longitude: f64) -> Self {
        self.location_param(latitude, longitude)
    }

    pub fn radius(self, radius_meters: f64) -> Self {
        self.param("radius", radius_meters)
    }
}

impl RequestBuilder<RadarSearch> {
    pub fn keyword(self, keyword: &str) -> Self {
        self.param("keyword", keyword)
    }
}
