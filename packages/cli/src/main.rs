#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the patrol map toolchain.
//!
//! `reload` runs the offline ingestion pipeline from a `GeoJSON` file;
//! `locate` resolves an address (or raw coordinates) to a zone and
//! prints the responsible officers. Resolution failures at any stage
//! degrade to "no result", never an error exit.

use clap::{Parser, Subcommand};
use patrol_map_database::{db, queries, run_migrations};
use patrol_map_geocoder::{Coordinates, Geocoder as _, google::GoogleGeocoder};

#[derive(Parser)]
#[command(name = "patrol_map_cli", about = "Zone data loading and officer lookup")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Reset and reload all zone data from a `GeoJSON` `FeatureCollection`
    Reload {
        /// Path to the `GeoJSON` file (e.g., "CPDZones.geojson")
        path: String,
    },
    /// Resolve an address or coordinate pair to its zone's officers
    Locate {
        /// Free-text address to geocode (requires `GOOGLE_MAPS_API_KEY`)
        address: Option<String>,
        /// Latitude, used with --lon instead of an address
        #[arg(long, requires = "lon", conflicts_with = "address")]
        lat: Option<f64>,
        /// Longitude, used with --lat instead of an address
        #[arg(long, requires = "lat", conflicts_with = "address")]
        lon: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let db = db::connect_from_env().await?;

    match cli.command {
        Commands::Migrate => {
            run_migrations(db.as_ref()).await?;
        }
        Commands::Reload { path } => {
            let raw = std::fs::read_to_string(&path)?;
            let collection: serde_json::Value = serde_json::from_str(&raw)?;

            let stats = patrol_map_ingest::reload(db.as_ref(), &collection).await?;

            println!(
                "Loaded {} zones, {} regions, {} officers ({} reused), {} assignments",
                stats.zones,
                stats.regions,
                stats.officers_created,
                stats.officers_reused,
                stats.assignments,
            );
            if stats.skipped_geometries > 0 {
                println!("Skipped {} unsupported geometries", stats.skipped_geometries);
            }
        }
        Commands::Locate { address, lat, lon } => {
            locate(db.as_ref(), address, lat, lon).await?;
        }
    }

    Ok(())
}

/// Resolves coordinates (geocoding the address when given) to a zone and
/// prints its officers. Every absence — geocoding miss, uncovered point,
/// unassigned zone — prints "No result." and exits cleanly.
async fn locate(
    db: &dyn switchy_database::Database,
    address: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinates = match (address, lat, lon) {
        (Some(query), _, _) => GoogleGeocoder::from_env()?.geocode(&query).await,
        (None, Some(lat), Some(lon)) => Some(Coordinates { lat, lng: lon }),
        _ => {
            eprintln!("Provide an address or both --lat and --lon");
            return Ok(());
        }
    };

    let Some(coordinates) = coordinates else {
        println!("No result.");
        return Ok(());
    };

    log::info!(
        "Resolving point ({}, {})",
        coordinates.lat,
        coordinates.lng
    );

    let Some(zone_id) =
        patrol_map_resolver::find_zone(db, coordinates.lat, coordinates.lng).await?
    else {
        println!("No result.");
        return Ok(());
    };

    let zone_name = queries::zone_by_id(db, zone_id)
        .await?
        .map_or_else(|| zone_id.to_string(), |zone| zone.name);

    let officers = patrol_map_resolver::find_officers(db, zone_id).await?;

    println!("Zone {zone_name}");
    if officers.is_empty() {
        println!("  (no officers assigned)");
    }
    for officer in officers {
        println!(
            "  {} {} <{}> {}",
            officer.title, officer.name, officer.email, officer.phone
        );
    }

    Ok(())
}
