#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database row types for the patrol map zone store.
//!
//! These types represent the shapes of data as stored in and retrieved
//! from the `PostGIS` database: zones, region boundaries, and officers.
//! Cross-entity relationships are plain foreign-key ids; every join is an
//! explicit query in `patrol_map_database::queries`.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Role an officer holds within a zone assignment.
///
/// Stored in the `officers.title` column as the strings `"Captain"` and
/// `"Lieutenant"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum OfficerTitle {
    /// Zone captain.
    Captain,
    /// Zone lieutenant.
    Lieutenant,
}

/// A zone row as retrieved from the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRow {
    /// Primary key.
    pub id: i32,
    /// Human-readable zone name (e.g. "5A"). Unique by ingestion
    /// contract, not enforced by the schema.
    pub name: String,
}

/// An officer row as retrieved from the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficerRow {
    /// Primary key.
    pub id: i32,
    /// Officer name. Dedup identity key across repeated features.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Role string ("Captain" / "Lieutenant").
    pub title: String,
}

/// A region boundary as returned by the boundary query feeding the
/// in-memory zone index.
///
/// One row per simple polygon. A zone whose source geometry was a
/// `MultiPolygon` is represented by several rows sharing a `zone_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionBoundary {
    /// Primary key of the region row.
    pub region_id: i32,
    /// Owning zone.
    pub zone_id: i32,
    /// Polygon geometry as a `GeoJSON` string (WGS84 lon/lat).
    pub geojson: String,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn officer_title_round_trips_stored_strings() {
        assert_eq!(OfficerTitle::Captain.as_ref(), "Captain");
        assert_eq!(OfficerTitle::Lieutenant.to_string(), "Lieutenant");
        assert_eq!(
            OfficerTitle::from_str("Captain").unwrap(),
            OfficerTitle::Captain
        );
    }

    #[test]
    fn rejects_unknown_title() {
        assert!(OfficerTitle::from_str("Sergeant").is_err());
    }
}
