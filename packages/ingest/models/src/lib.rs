#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Normalized zone feature and reload result types.
//!
//! A raw `GeoJSON` feature is validated and flattened into a
//! [`ZoneFeature`] before anything touches the database, so malformed
//! input fails the run up front rather than mid-insert.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use patrol_map_database_models::OfficerTitle;
use serde::{Deserialize, Serialize};

/// An officer candidate extracted from a feature's properties.
///
/// Identity is resolved by exact `name` match at persist time; two
/// features naming the same captain produce one officer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficerCandidate {
    /// Officer name (the dedup key).
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Role this candidate holds for the zone.
    pub title: OfficerTitle,
}

/// A validated zone feature, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneFeature {
    /// Zone name from the `CPD_Zone` property.
    pub zone_name: String,
    /// Captain candidate from `CAPT` / `CAPT_EMAIL` / `CAPT_PHONE`.
    pub captain: OfficerCandidate,
    /// Lieutenant candidate from `LT` / `LT_EMAIL` / `LT_PHONE`.
    pub lieutenant: OfficerCandidate,
    /// Simple polygon parts as `GeoJSON` strings, one per region row.
    ///
    /// Empty when the feature carried an unsupported geometry type; the
    /// zone and its officers are still persisted, it just owns no
    /// regions and can never win a containment query.
    pub polygon_parts: Vec<String>,
    /// Whether the feature's geometry type was unsupported and skipped.
    pub geometry_skipped: bool,
}

/// Counts reported by a completed (or cancelled) reload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadStats {
    /// Zone rows created.
    pub zones: u64,
    /// Officer rows created.
    pub officers_created: u64,
    /// Officer candidates resolved to an existing row by name.
    pub officers_reused: u64,
    /// Zone-officer assignment rows created.
    pub assignments: u64,
    /// Region rows created.
    pub regions: u64,
    /// Features whose geometry type was unsupported and skipped.
    pub skipped_geometries: u64,
    /// Whether the run stopped early at a cancellation point.
    pub cancelled: bool,
}

/// Options for a reload run.
#[derive(Debug, Clone, Default)]
pub struct ReloadOptions {
    /// Cooperative cancellation flag, checked between features.
    ///
    /// A cancelled run stops before starting the next feature, leaving at
    /// most one fully-ingested feature beyond the cancellation request.
    pub cancel: Option<Arc<AtomicBool>>,
}
