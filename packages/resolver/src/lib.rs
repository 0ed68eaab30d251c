#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Resolves a geographic point to its administrative zone and the
//! officers responsible for it.
//!
//! Two containment paths are provided:
//!
//! - [`find_zone`] queries `PostGIS` directly (`ST_Covers` over the
//!   geography column) — the geography-aware authority, one query round
//!   trip per lookup.
//! - [`ZoneIndex`] loads all region polygons into an in-memory R-tree
//!   for repeated lookups without a round trip. Rebuild it after every
//!   reload; its planar predicate is an approximation (see `index`).
//!
//! Absence is never an error: an uncovered point is `None`, an unknown
//! or unassigned zone is an empty officer list.

pub mod index;

pub use index::ZoneIndex;

use patrol_map_database::{DbError, queries};
use patrol_map_database_models::OfficerRow;
use switchy_database::Database;

/// Returns the id of the zone whose region covers `(lon, lat)`, or
/// `None` if no region covers the point.
///
/// Containment is boundary-inclusive: a point exactly on a region's
/// border resolves to that region's zone. When regions overlap (a
/// data-quality anomaly), the first match in the store's natural
/// retrieval order wins.
///
/// # Errors
///
/// Returns [`DbError`] if the database query fails.
pub async fn find_zone(db: &dyn Database, lat: f64, lon: f64) -> Result<Option<i32>, DbError> {
    queries::find_zone_covering(db, lat, lon).await
}

/// Returns all officers assigned to `zone_id`, in no guaranteed order.
///
/// Empty if the zone has no assignments or does not exist.
///
/// # Errors
///
/// Returns [`DbError`] if the database query fails.
pub async fn find_officers(db: &dyn Database, zone_id: i32) -> Result<Vec<OfficerRow>, DbError> {
    queries::officers_for_zone(db, zone_id).await
}
