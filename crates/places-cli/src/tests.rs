use super::*;

#[test]
fn parses_nearby_command_with_types() {
    let cli = Cli::try_parse_from([
        "places-cli", "nearby", "--lat", "35.68", "--lng", "139.76", "--radius", "500", "--types",
        "cafe,bakery",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Nearby {
            lat,
            lng,
            radius,
            keyword,
            types,
        } => {
            assert!((lat - 35.68).abs() < f64::EPSILON);
            assert!((lng - 139.76).abs() < f64::EPSILON);
            assert!((radius - 500.0).abs() < f64::EPSILON);
            assert!(keyword.is_none());
            assert_eq!(types, vec!["cafe".to_owned(), "bakery".to_owned()]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn nearby_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "places-cli", "nearby", "--lat", "-33.86", "--lng", "-151.2", "--radius", "100",
    ])
    .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Nearby { lat, .. } if lat < 0.0));
}

#[test]
fn parses_global_filters_after_subcommand() {
    let cli = Cli::try_parse_from([
        "places-cli",
        "text",
        "pizza in new york",
        "--open-now",
        "--min-price",
        "1",
        "--max-price",
        "3",
        "--rank-by",
        "distance",
        "--language",
        "it",
    ])
    .expect("expected valid cli args");

    assert!(cli.filters.open_now);
    assert_eq!(cli.filters.min_price, Some(1));
    assert_eq!(cli.filters.max_price, Some(3));
    assert_eq!(cli.filters.rank_by, Some(RankBy::Distance));
    assert_eq!(cli.filters.language.as_deref(), Some("it"));
    assert!(matches!(
        cli.command,
        Commands::Text { ref query, lat: None, .. } if query == "pizza in new york"
    ));
}

#[test]
fn rejects_price_tier_out_of_range() {
    let result = Cli::try_parse_from(["places-cli", "detail", "ref", "--max-price", "5"]);
    assert!(result.is_err());
}

#[test]
fn rejects_unknown_rank_by() {
    let result = Cli::try_parse_from(["places-cli", "detail", "ref", "--rank-by", "nearest"]);
    assert!(result.is_err());
}

#[test]
fn text_location_requires_all_three_values() {
    let result = Cli::try_parse_from(["places-cli", "text", "sushi", "--lat", "1.0"]);
    assert!(result.is_err());

    let cli = Cli::try_parse_from([
        "places-cli", "text", "sushi", "--lat", "1.0", "--lng", "2.0", "--radius", "300",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Text {
            lat: Some(_),
            lng: Some(_),
            radius: Some(_),
            ..
        }
    ));
}

#[test]
fn parses_detail_and_icon_commands() {
    let cli = Cli::try_parse_from(["places-cli", "detail", "CnRkAAAA"]).expect("valid");
    assert!(matches!(cli.command, Commands::Detail { ref reference } if reference == "CnRkAAAA"));

    let cli = Cli::try_parse_from(["places-cli", "icon", "https://maps.example.com/i.png"])
        .expect("valid");
    assert!(matches!(cli.command, Commands::Icon { .. }));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["places-cli"]).is_err());
}

#[test]
fn filters_render_on_search_urls() {
    let client = PlacesClient::builder("k")
        .base_url("https://maps.example.com/place")
        .build()
        .expect("client");
    let cli = Cli::try_parse_from([
        "places-cli",
        "radar",
        "--lat",
        "1",
        "--lng",
        "2",
        "--radius",
        "3",
        "--open-now",
        "--page-token",
        "tok",
        "--rank-by",
        "prominence",
    ])
    .expect("valid");

    let url = search::apply_filters(client.radar_search(1.0, 2.0, 3.0, false), &cli.filters).url();
    let query = url.query().unwrap_or_default();
    assert!(query.contains("opennow=true"), "{query}");
    assert!(query.contains("pagetoken=tok"), "{query}");
    assert!(query.contains("rankby=prominence"), "{query}");
    assert!(!query.contains("minprice"), "{query}");
}

#[test]
fn format_place_uses_placeholders_for_missing_fields() {
    let place: places_client::Place =
        serde_json::from_str(r#"{"name":"Verve","vicinity":"1 Market St"}"#).expect("fixture");
    assert_eq!(search::format_place(&place), "Verve | 1 Market St | - | -");
}
