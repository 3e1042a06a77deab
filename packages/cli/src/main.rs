#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the event map.
//!
//! Ingests users, venues, and events from the configured locations, applies
//! the filter flags, and prints the requested view as JSON or as a plain
//! text summary. Set `RUST_LOG` to see ingestion diagnostics.

mod render;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use event_map_aggregate::{aggregate, export::bundles_to_geojson, heatmap::heat_points};
use event_map_filter::{filtered_events, filtered_users};
use event_map_ingest::{build_client, config::load_config, ingest};
use event_map_models::{
    DistanceBucket, FilterCriteria, Selection, VenueId, catalog::event_type_label,
};

#[derive(Parser)]
#[command(name = "event_map", about = "Event map filtering and aggregation tool")]
struct Cli {
    /// Path to an ingestion config TOML (overrides `EVENT_MAP_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct FilterArgs {
    /// Age bucket (e.g. "25-34"), or "all"
    #[arg(long, global = true, default_value = "all")]
    age: Selection<String>,
    /// User district, matched exactly
    #[arg(long, global = true)]
    district: Option<String>,
    /// Event category (case-insensitive), or "all"
    #[arg(long, global = true, default_value = "all")]
    category: Selection<String>,
    /// Distance bucket: low, medium, high, or all
    #[arg(long, global = true, default_value = "all")]
    distance: Selection<DistanceBucket>,
    /// Venue id, or "all"
    #[arg(long, global = true, default_value = "all")]
    venue: Selection<VenueId>,
    /// Venue district, or "all"
    #[arg(long, global = true, default_value = "all")]
    venue_district: Selection<String>,
    /// Minimum event type share as `category=share` (e.g. `konser=0.3`).
    /// May be repeated.
    #[arg(long = "min-share", global = true, value_parser = parse_share)]
    min_share: Vec<(String, f64)>,
}

impl FilterArgs {
    fn into_criteria(self) -> FilterCriteria {
        for (category, _) in &self.min_share {
            if event_type_label(category).is_none() {
                log::warn!("Unknown event type `{category}` in --min-share");
            }
        }

        FilterCriteria {
            age: self.age,
            district: self.district,
            event_category: self.category,
            distance: self.distance,
            venue_id: self.venue,
            venue_district: self.venue_district,
            min_category_share: self.min_share.into_iter().collect::<BTreeMap<_, _>>(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print record counts and the ingestion report (default)
    Summary,
    /// Print the filtered users as JSON
    Users,
    /// Print the filtered events as JSON
    Events,
    /// Print the line bundles built from the filtered events
    Bundles {
        /// Emit a `GeoJSON` `FeatureCollection` of line features instead
        #[arg(long)]
        geojson: bool,
    },
    /// Print heatmap points for the filtered users as JSON
    Heatmap,
    /// Print the available filter options as JSON
    Facets,
}

fn parse_share(s: &str) -> Result<(String, f64), String> {
    let (category, share) = s
        .split_once('=')
        .ok_or_else(|| format!("expected `category=share`, got `{s}`"))?;
    let share: f64 = share
        .trim()
        .parse()
        .map_err(|e| format!("invalid share `{share}`: {e}"))?;
    let category = category.trim();
    if category.is_empty() {
        return Err("category must not be empty".to_string());
    }
    Ok((category.to_string(), share))
}

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Failed to load event map data: {e}");
            eprintln!("Failed to load event map data: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref())?;
    let client = build_client(&config)?;
    let ingestion = ingest(&client, &config).await?;
    log::info!(
        "Loaded {} users, {} venues, {} events",
        ingestion.store.user_count(),
        ingestion.store.venue_count(),
        ingestion.store.events().len()
    );

    let store = &ingestion.store;
    let criteria = cli.filters.into_criteria();

    match cli.command.unwrap_or(Commands::Summary) {
        Commands::Summary => {
            let users = filtered_users(store, &criteria);
            let events = filtered_events(store, &criteria);
            let bundles = aggregate(store, &events);
            render::summary(&ingestion.report, store, users.len(), events.len(), bundles.len());
        }
        Commands::Users => {
            render::json(&filtered_users(store, &criteria))?;
        }
        Commands::Events => {
            render::json(&filtered_events(store, &criteria))?;
        }
        Commands::Bundles { geojson } => {
            let bundles = aggregate(store, &filtered_events(store, &criteria));
            if geojson {
                render::json(&bundles_to_geojson(&bundles))?;
            } else {
                render::json(&bundles)?;
            }
        }
        Commands::Heatmap => {
            render::json(&heat_points(filtered_users(store, &criteria)))?;
        }
        Commands::Facets => {
            render::json(&render::facet_options(store, &criteria.venue_district))?;
        }
    }

    Ok(())
}
