//! Setters shared by the three search endpoints.

use std::fmt;

use crate::types::SearchResult;

use super::{Endpoint, NearbySearch, RadarSearch, RequestBuilder, TextSearch};

pub const MIN_PRICE_TIER: i32 = 0;
pub const MAX_PRICE_TIER: i32 = 4;

/// Endpoints that return a [`SearchResult`] and accept the search filters.
pub trait SearchEndpoint: Endpoint<Output = SearchResult> {}

impl SearchEndpoint for NearbySearch {}
impl SearchEndpoint for TextSearch {}
impl SearchEndpoint for RadarSearch {}

/// Result ordering for searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    Prominence,
    Distance,
}

impl RankBy {
    pub fn as_str(self) -> &'static str {
        match self {
            RankBy::Prominence => "prominence",
            RankBy::Distance => "distance",
        }
    }
}

impl fmt::Display for RankBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RankBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prominence" => Ok(RankBy::Prominence),
            "distance" => Ok(RankBy::Distance),
            other => Err(format!("unknown rank-by strategy '{other}'")),
        }
    }
}

fn assert_price_tier(setter: &str, tier: i32) {
    assert!(
        (MIN_PRICE_TIER..=MAX_PRICE_TIER).contains(&tier),
        "{setter}: price tier {tier} outside [{MIN_PRICE_TIER}, {MAX_PRICE_TIER}]"
    );
}

impl<E: SearchEndpoint> RequestBuilder<E> {
    /// # Panics
    ///
    /// Panics if `tier` is outside `0..=4`.
    pub fn min_price(self, tier: i32) -> Self {
        assert_price_tier("min_price", tier);
        self.param("minprice", tier)
    }

    /// # Panics
    ///
    /// Panics if `tier` is outside `0..=4`.
    pub fn max_price(self, tier: i32) -> Self {
        assert_price_tier("max_price", tier);
        self.param("maxprice", tier)
    }

    /// Space-separated terms matched against place names.
    pub fn name(self, name: &str) -> Self {
        self.param("name", name)
    }

    pub fn rank_by(self, rank_by: RankBy) -> Self {
        self.param("rankby", rank_by.as_str())
    }

    pub fn open_now(self, open_now: bool) -> Self {
        self.param("opennow", open_now)
    }

    /// Requests the page named by a previous [`SearchResult::next_page_token`].
    pub fn page_token(self, token: &str) -> Self {
        self.param("pagetoken", token)
    }

    /// Restricts results to curated (Zagat-selected) places. Experimental.
    pub fn zagat_selected(self, selected: bool) -> Self {
        self.param("zagatselected", selected)
    }

    pub fn types<I, S>(self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types: Vec<String> = types.into_iter().map(Into::into).collect();
        self.param("types", types)
    }
}
