mod search;

use clap::{Args, Parser, Subcommand};
use places_client::{PlacesClient, RankBy};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "places-cli")]
#[command(about = "Query the places web service from the command line")]
struct Cli {
    #[command(flatten)]
    filters: Filters,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every request. Search filters are ignored by `detail`
/// and `icon`.
#[derive(Debug, Args)]
pub(crate) struct Filters {
    /// Response language (overrides PLACES_LANGUAGE)
    #[arg(long, global = true)]
    pub language: Option<String>,
    /// Only return places open right now
    #[arg(long, global = true)]
    pub open_now: bool,
    /// Lowest price tier, 0 (cheapest) to 4
    #[arg(long, global = true, value_parser = clap::value_parser!(i32).range(0..=4))]
    pub min_price: Option<i32>,
    /// Highest price tier, 0 (cheapest) to 4
    #[arg(long, global = true, value_parser = clap::value_parser!(i32).range(0..=4))]
    pub max_price: Option<i32>,
    /// Result ordering: prominence or distance
    #[arg(long, global = true)]
    pub rank_by: Option<RankBy>,
    /// Token from a previous search's "next page token" line
    #[arg(long, global = true)]
    pub page_token: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search around a location
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in meters
        #[arg(long)]
        radius: f64,
        #[arg(long)]
        keyword: Option<String>,
        /// Comma-separated place types (e.g. cafe,bakery)
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
    },
    /// Free-text search such as "pizza in New York"
    Text {
        query: String,
        #[arg(long, allow_hyphen_values = true, requires_all = ["lng", "radius"])]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires_all = ["lat", "radius"])]
        lng: Option<f64>,
        #[arg(long, requires_all = ["lat", "lng"])]
        radius: Option<f64>,
    },
    /// Up to 200 bare results around a location
    Radar {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        radius: f64,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Full details for the place with the given reference token
    Detail { reference: String },
    /// Download an icon and print its dimensions
    Icon { url: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Loads `.env` before reading the environment.
    let config = places_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = PlacesClient::from_config(&config)?;
    tracing::debug!(?client, "client ready");

    match cli.command {
        Commands::Nearby {
            lat,
            lng,
            radius,
            keyword,
            types,
        } => {
            search::run_nearby(&client, &cli.filters, lat, lng, radius, keyword.as_deref(), &types)
                .await?;
        }
        Commands::Text {
            query,
            lat,
            lng,
            radius,
        } => {
            let area = match (lat, lng, radius) {
                (Some(lat), Some(lng), Some(radius)) => Some((lat, lng, radius)),
                _ => None,
            };
            search::run_text(&client, &cli.filters, &query, area).await?;
        }
        Commands::Radar {
            lat,
            lng,
            radius,
            keyword,
        } => {
            search::run_radar(&client, &cli.filters, lat, lng, radius, keyword.as_deref()).await?;
        }
        Commands::Detail { reference } => {
            search::run_detail(&client, &cli.filters, &reference).await?;
        }
        Commands::Icon { url } => search::run_icon(&client, &url).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
