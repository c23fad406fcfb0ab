use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use hacker_house_scout::models::{Coordinates, EventLocation, Listing, SearchCriteria, SearchFilters};
use hacker_house_scout::providers::{
    BookingProvider, LlmProvider, MockBookingProvider, OpenAiLlmProvider, SearchApiBookingProvider,
};
use hacker_house_scout::search::{AnchorConfig, ScoredListing};
use hacker_house_scout::{Config, SearchError, SearchListingsUseCase};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hacker-house-scout")]
#[command(about = "Find and rank hacker-house lodging for a trip")]
struct Cli {
    /// JSON file with per-city events and coworking spaces (overrides ANCHORS_PATH)
    #[arg(long, global = true)]
    anchors: Option<PathBuf>,

    /// Where to save the results
    #[arg(long, global = true, default_value = "search_results.json")]
    output: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search from a free-text travel request
    Message {
        text: String,
        #[arg(long)]
        event_name: Option<String>,
        #[arg(long, requires = "event_lng")]
        event_lat: Option<f64>,
        #[arg(long, requires = "event_lat")]
        event_lng: Option<f64>,
    },

    /// Search from structured criteria
    Criteria {
        #[arg(long)]
        city: String,
        #[arg(long)]
        check_in: NaiveDate,
        #[arg(long)]
        check_out: NaiveDate,
        #[arg(long)]
        bedrooms: u32,
        #[arg(long)]
        max_price: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    info!("🏠 Hacker House Scout");
    info!("=====================");

    let use_case = build_use_case(&config, cli.anchors.clone()).await?;

    let result = match cli.command {
        Commands::Message {
            text,
            event_name,
            event_lat,
            event_lng,
        } => {
            let event = event_name.map(|name| EventLocation {
                name,
                coordinates: event_lat.zip(event_lng).map(|(lat, lng)| Coordinates::new(lat, lng)),
            });

            use_case
                .search_from_message(&text, event.as_ref())
                .await
                .map(|outcome| {
                    info!(
                        "\n✅ {} results for {}, overall rating {}/100\n",
                        outcome.results.len(),
                        outcome.derived_criteria.city,
                        outcome.overall_rating
                    );
                    print_scored(&outcome.results);
                    to_pretty_json(&outcome)
                })
        }
        Commands::Criteria {
            city,
            check_in,
            check_out,
            bedrooms,
            max_price,
        } => {
            let criteria = SearchCriteria {
                filters: max_price.map(|max_price| SearchFilters {
                    max_price: Some(max_price),
                    ..Default::default()
                }),
                ..SearchCriteria::new(city, check_in, check_out, bedrooms)
            };

            use_case.search_from_criteria(criteria).await.map(|outcome| {
                info!(
                    "\n✅ {} listings in {}\n",
                    outcome.listings.len(),
                    outcome.derived_criteria.city
                );
                for (i, listing) in outcome.listings.iter().enumerate() {
                    print_listing(i, listing);
                    println!();
                }
                to_pretty_json(&outcome)
            })
        }
    };

    match result {
        Ok(json) => {
            let json = json?;
            tokio::fs::write(&cli.output, json)
                .await
                .with_context(|| format!("Failed to write {}", cli.output.display()))?;
            info!("💾 Saved results to {}", cli.output.display());
            Ok(())
        }
        Err(err) => report_failure(err),
    }
}

async fn build_use_case(
    config: &Config,
    anchors_override: Option<PathBuf>,
) -> anyhow::Result<SearchListingsUseCase> {
    let booking: Arc<dyn BookingProvider> = match &config.searchapi_api_key {
        Some(key) => Arc::new(
            SearchApiBookingProvider::with_base_url(
                config.searchapi_base_url.clone(),
                key.clone(),
                config.call_timeout,
            )?,
        ),
        None => {
            warn!("SEARCHAPI_IO_API_KEY not set, using mock listings");
            Arc::new(MockBookingProvider::new())
        }
    };

    let llm: Arc<dyn LlmProvider> = Arc::new(
        OpenAiLlmProvider::new(config.openai_api_key.clone(), config.call_timeout)?
            .with_base_url(config.openai_base_url.clone())
            .with_model(config.openai_model.clone()),
    );

    let anchors = match anchors_override.or_else(|| config.anchors_path.clone()) {
        Some(path) => AnchorConfig::load(path).await?,
        None => {
            info!("No anchors file configured, enrichment only uses request data");
            AnchorConfig::default()
        }
    };

    Ok(SearchListingsUseCase::new(booking, llm, Arc::new(anchors))
        .with_max_attempts(config.llm_max_attempts)
        .with_call_timeout(config.call_timeout))
}

fn print_scored(results: &[ScoredListing]) {
    for (i, scored) in results.iter().enumerate() {
        print_listing(i, &scored.listing);
        let scores = &scored.scores;
        match scores.event_proximity {
            Some(event) => println!(
                "   Scores: overall {} | safety {} | coworking {} | event {}",
                scores.overall, scores.safety, scores.coworking_proximity, event
            ),
            None => println!(
                "   Scores: overall {} | safety {} | coworking {}",
                scores.overall, scores.safety, scores.coworking_proximity
            ),
        }
        println!();
    }
}

fn print_listing(i: usize, listing: &Listing) {
    println!("{}. {} (${:.0}/night)", i + 1, listing.name, listing.price);
    println!("   {} bedrooms, {}", listing.bedrooms, listing.city);
    if let Some(neighborhood) = &listing.neighborhood {
        println!("   Area: {}", neighborhood);
    }
    if let Some(distance) = listing.distance_to_event {
        println!("   Event: {:.2} km away", distance);
    }
    if let Some(insights) = &listing.insights {
        println!("   Safety: {}", insights.area_safety);
        println!("   Coworking: {}", insights.coworking_proximity.description);
    }
    println!("   ID: {}", listing.id);
    if let Some(link) = &listing.link {
        println!("   URL: {}", link);
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize results")
}

fn report_failure(err: SearchError) -> anyhow::Result<()> {
    if let SearchError::Internal(cause) = &err {
        error!(error = ?cause, "Search failed");
    }

    let status = err.status_code();
    let body = to_pretty_json(&err.to_body())?;
    eprintln!("{}", body);
    bail!("Search failed with status {}", status)
}
