//! Request handlers for the CLI subcommands.
//!
//! Each handler builds one request from the parsed arguments, sends it on
//! the current task, and prints one line per place to stdout.

use anyhow::anyhow;
use places_client::{
    Place, PlaceDetail, PlacesClient, RequestBuilder, RequestError, SearchEndpoint, SearchResult,
};

use crate::Filters;

/// Applies the global search filters to a search request.
pub(crate) fn apply_filters<E: SearchEndpoint>(
    mut request: RequestBuilder<E>,
    filters: &Filters,
) -> RequestBuilder<E> {
    if let Some(language) = &filters.language {
        request = request.language(language);
    }
    if filters.open_now {
        request = request.open_now(true);
    }
    if let Some(tier) = filters.min_price {
        request = request.min_price(tier);
    }
    if let Some(tier) = filters.max_price {
        request = request.max_price(tier);
    }
    if let Some(rank_by) = filters.rank_by {
        request = request.rank_by(rank_by);
    }
    if let Some(token) = &filters.page_token {
        request = request.page_token(token);
    }
    request
}

pub(crate) async fn run_nearby(
    client: &PlacesClient,
    filters: &Filters,
    lat: f64,
    lng: f64,
    radius: f64,
    keyword: Option<&str>,
    types: &[String],
) -> anyhow::Result<()> {
    let mut request = apply_filters(client.nearby_search(lat, lng, radius, false), filters);
    if let Some(keyword) = keyword {
        request = request.keyword(keyword);
    }
    if !types.is_empty() {
        request = request.types(types.iter().cloned());
    }
    let result = request.send().await.map_err(into_anyhow)?;
    print_search(&result);
    Ok(())
}

pub(crate) async fn run_text(
    client: &PlacesClient,
    filters: &Filters,
    query: &str,
    area: Option<(f64, f64, f64)>,
) -> anyhow::Result<()> {
    let mut request = apply_filters(client.text_search(query, false), filters);
    if let Some((lat, lng, radius)) = area {
        request = request.location(lat, lng).radius(radius);
    }
    let result = request.send().await.map_err(into_anyhow)?;
    print_search(&result);
    Ok(())
}

pub(crate) async fn run_radar(
    client: &PlacesClient,
    filters: &Filters,
    lat: f64,
    lng: f64,
    radius: f64,
    keyword: Option<&str>,
) -> anyhow::Result<()> {
    let mut request = apply_filters(client.radar_search(lat, lng, radius, false), filters);
    if let Some(keyword) = keyword {
        request = request.keyword(keyword);
    }
    let result = request.send().await.map_err(into_anyhow)?;
    print_search(&result);
    Ok(())
}

pub(crate) async fn run_detail(
    client: &PlacesClient,
    filters: &Filters,
    reference: &str,
) -> anyhow::Result<()> {
    let mut request = client.details(reference, false);
    if let Some(language) = &filters.language {
        request = request.language(language);
    }
    let detail = request.send().await.map_err(into_anyhow)?;
    print_detail(&detail);
    Ok(())
}

pub(crate) async fn run_icon(client: &PlacesClient, url: &str) -> anyhow::Result<()> {
    let icon = client
        .fetch_icon(url)
        .await?
        .ok_or_else(|| anyhow!("no icon at {url}"))?;
    println!("{url}: {}x{}", icon.width(), icon.height());
    Ok(())
}

fn into_anyhow(error: RequestError) -> anyhow::Error {
    anyhow!(error.describe())
}

/// `name | address | lat,lng | reference`, with `-` for missing fields.
pub(crate) fn format_place(place: &Place) -> String {
    let location = place
        .location()
        .map_or_else(|| "-".to_owned(), |l| format!("{},{}", l.lat, l.lng));
    format!(
        "{} | {} | {} | {}",
        place.name,
        place.address().unwrap_or("-"),
        location,
        place.reference.as_deref().unwrap_or("-"),
    )
}

fn print_search(result: &SearchResult) {
    for place in result {
        println!("{}", format_place(place));
    }
    if let Some(token) = result.next_page_token() {
        println!("next page token: {token}");
    }
    tracing::info!(count = result.len(), "search complete");
}

fn print_detail(detail: &PlaceDetail) {
    let Some(place) = detail.place() else {
        tracing::warn!("detail response carried no place");
        return;
    };
    println!("{}", format_place(place));
    let extras = [
        ("phone", place.international_phone_number.as_deref()),
        ("website", place.website.as_deref()),
        ("url", place.url.as_deref()),
    ];
    for (label, value) in extras {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
    if let Some(rating) = place.rating {
        println!("  rating: {rating}");
    }
    for attribution in detail.html_attributions() {
        println!("  attribution: {attribution}");
    }
}
