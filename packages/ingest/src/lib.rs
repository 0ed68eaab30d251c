#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion pipeline loading a zone `GeoJSON` `FeatureCollection` into
//! the `PostGIS` store.
//!
//! A reload is a full reset-and-reload: all existing assignments,
//! officers, regions, and zones are deleted (leaves first), then every
//! feature is persisted in input order. Officers are deduplicated by
//! exact name across features; `MultiPolygon` geometries are decomposed
//! into one region row per part.
//!
//! Statements autocommit one at a time in the order zone, officers,
//! assignments, regions, so a mid-run failure leaves a partially applied
//! but internally consistent store: no assignment or region ever exists
//! without its owning zone. Concurrent reloads are not supported and
//! must be serialized by the caller.

pub mod feature;
pub mod geometry;

use std::sync::atomic::Ordering;

use patrol_map_database::{DbError, queries};
use patrol_map_ingest_models::{OfficerCandidate, ReloadOptions, ReloadStats, ZoneFeature};
use switchy_database::Database;
use thiserror::Error;

/// Errors that abort a reload run.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A feature is missing a required property, or the input is not a
    /// `FeatureCollection`. Detected before the reset, so the store is
    /// left untouched.
    #[error("Malformed feature: {message}")]
    MalformedFeature {
        /// Which feature and property failed validation.
        message: String,
    },

    /// The persistence layer failed mid-run. The store is left in the
    /// partially applied but internally consistent state described in
    /// the crate docs.
    #[error("Store failure: {0}")]
    StoreFailure(#[from] DbError),
}

/// Resets the store and reloads it from a `GeoJSON` `FeatureCollection`.
///
/// # Errors
///
/// Returns [`IngestError::MalformedFeature`] if the input fails
/// validation (nothing is deleted or written in that case), or
/// [`IngestError::StoreFailure`] if a database operation fails mid-run.
pub async fn reload(
    db: &dyn Database,
    collection: &serde_json::Value,
) -> Result<ReloadStats, IngestError> {
    reload_with_options(db, collection, &ReloadOptions::default()).await
}

/// [`reload`] with cooperative cancellation.
///
/// The cancellation flag is checked between features, never mid-feature,
/// so a cancelled run abandons at most one partially-pending feature and
/// returns the stats accumulated so far with `cancelled` set.
///
/// # Errors
///
/// Same as [`reload`].
pub async fn reload_with_options(
    db: &dyn Database,
    collection: &serde_json::Value,
    options: &ReloadOptions,
) -> Result<ReloadStats, IngestError> {
    // Validate everything up front so malformed input fails the run
    // before the reset destroys the previous load.
    let features = feature::extract_features(collection)?;

    log::info!("Reloading zone data from {} features", features.len());

    queries::reset_all(db).await?;

    let mut stats = ReloadStats::default();

    for (index, zone_feature) in features.iter().enumerate() {
        if options
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            log::warn!(
                "Reload cancelled after {index} of {} features",
                features.len()
            );
            stats.cancelled = true;
            break;
        }

        ingest_feature(db, zone_feature, &mut stats).await?;
    }

    log::info!(
        "Reload complete: {} zones, {} officers created, {} reused, \
         {} assignments, {} regions, {} geometries skipped",
        stats.zones,
        stats.officers_created,
        stats.officers_reused,
        stats.assignments,
        stats.regions,
        stats.skipped_geometries,
    );

    Ok(stats)
}

/// Persists one feature: zone first (foreign-key target), then officers,
/// assignments, and region parts.
async fn ingest_feature(
    db: &dyn Database,
    zone_feature: &ZoneFeature,
    stats: &mut ReloadStats,
) -> Result<(), IngestError> {
    let zone_id = queries::insert_zone(db, &zone_feature.zone_name).await?;
    stats.zones += 1;

    let captain_id = resolve_officer(db, &zone_feature.captain, stats).await?;
    let lieutenant_id = resolve_officer(db, &zone_feature.lieutenant, stats).await?;

    queries::insert_assignment(db, zone_id, captain_id).await?;
    queries::insert_assignment(db, zone_id, lieutenant_id).await?;
    stats.assignments += 2;

    if zone_feature.geometry_skipped {
        stats.skipped_geometries += 1;
    }

    for part in &zone_feature.polygon_parts {
        stats.regions += queries::insert_region(db, zone_id, part).await?;
    }

    log::info!(
        "Zone {} (id {zone_id}): {} regions",
        zone_feature.zone_name,
        zone_feature.polygon_parts.len()
    );

    Ok(())
}

/// Resolves an officer candidate to a row id, creating the row if no
/// officer with that exact name exists yet.
///
/// The lookup observes officers committed by earlier features in this
/// run (every statement autocommits on the shared connection), so two
/// features naming the same captain resolve to one officer row.
async fn resolve_officer(
    db: &dyn Database,
    candidate: &OfficerCandidate,
    stats: &mut ReloadStats,
) -> Result<i32, IngestError> {
    if let Some(id) = queries::find_officer_by_name(db, &candidate.name).await? {
        stats.officers_reused += 1;
        return Ok(id);
    }

    let id = queries::insert_officer(
        db,
        &candidate.name,
        &candidate.email,
        &candidate.phone,
        candidate.title,
    )
    .await?;
    stats.officers_created += 1;

    Ok(id)
}
