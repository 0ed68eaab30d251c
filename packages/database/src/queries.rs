//! Store operations for zones, regions, officers, and assignments.
//!
//! Spatial queries use `query_raw_params()` with `PostGIS` functions.
//! Geometry is stored and queried as (longitude, latitude) pairs in SRID
//! 4326, matching the `GeoJSON` convention.
//!
//! All statements autocommit on the shared connection, so a lookup issued
//! after an insert in the same run observes that insert. The ingestion
//! pipeline relies on this for officer dedup across features.

use moosicbox_json_utils::database::ToValue as _;
use patrol_map_database_models::{OfficerRow, OfficerTitle, RegionBoundary, ZoneRow};
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Deletes all zone data in referential dependency order, leaves first:
/// assignments, then officers, then regions, then zones.
///
/// The ingestion pipeline calls this before every reload so that
/// re-running ingestion never duplicates rows.
///
/// # Errors
///
/// Returns [`DbError`] if any delete fails.
pub async fn reset_all(db: &dyn Database) -> Result<(), DbError> {
    let assignments = db.exec_raw_params("DELETE FROM zone_assignments", &[]).await?;
    let officers = db.exec_raw_params("DELETE FROM officers", &[]).await?;
    let regions = db.exec_raw_params("DELETE FROM regions", &[]).await?;
    let zones = db.exec_raw_params("DELETE FROM zones", &[]).await?;

    log::info!(
        "Reset zone data: deleted {assignments} assignments, {officers} officers, \
         {regions} regions, {zones} zones"
    );

    Ok(())
}

/// Inserts a zone and returns its id.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_zone(db: &dyn Database, name: &str) -> Result<i32, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO zones (name) VALUES ($1) RETURNING id",
            &[DatabaseValue::String(name.to_string())],
        )
        .await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Failed to get zone id from insert".to_string(),
    })?;

    let id: i32 = row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse zone id: {e}"),
    })?;

    Ok(id)
}

/// Looks up an officer id by exact name match.
///
/// Case- and whitespace-sensitive: `"J. Smith"` and `"j. smith"` are
/// distinct officers.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn find_officer_by_name(db: &dyn Database, name: &str) -> Result<Option<i32>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id FROM officers WHERE name = $1",
            &[DatabaseValue::String(name.to_string())],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(None);
    };

    let id: i32 = row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse officer id: {e}"),
    })?;

    Ok(Some(id))
}

/// Inserts an officer and returns their id.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_officer(
    db: &dyn Database,
    name: &str,
    email: &str,
    phone: &str,
    title: OfficerTitle,
) -> Result<i32, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO officers (name, email, phone, title)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
            &[
                DatabaseValue::String(name.to_string()),
                DatabaseValue::String(email.to_string()),
                DatabaseValue::String(phone.to_string()),
                DatabaseValue::String(title.to_string()),
            ],
        )
        .await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Failed to get officer id from insert".to_string(),
    })?;

    let id: i32 = row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse officer id: {e}"),
    })?;

    Ok(id)
}

/// Links an officer to a zone.
///
/// `(zone_id, officer_id)` pairs are not deduplicated here; the full
/// reset preceding every reload keeps the table free of duplicates.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_assignment(
    db: &dyn Database,
    zone_id: i32,
    officer_id: i32,
) -> Result<(), DbError> {
    db.exec_raw_params(
        "INSERT INTO zone_assignments (zone_id, officer_id) VALUES ($1, $2)",
        &[
            DatabaseValue::Int32(zone_id),
            DatabaseValue::Int32(officer_id),
        ],
    )
    .await?;

    Ok(())
}

/// Inserts one region polygon owned by a zone.
///
/// `geometry_json` must be a `GeoJSON` Polygon; callers decompose
/// `MultiPolygon` geometries into parts before inserting.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_region(
    db: &dyn Database,
    zone_id: i32,
    geometry_json: &str,
) -> Result<u64, DbError> {
    let inserted = db
        .exec_raw_params(
            "INSERT INTO regions (geog, zone_id)
             VALUES (ST_GeomFromGeoJSON($1)::geography, $2)",
            &[
                DatabaseValue::String(geometry_json.to_string()),
                DatabaseValue::Int32(zone_id),
            ],
        )
        .await?;

    Ok(inserted)
}

/// Finds the zone whose region covers the point `(lon, lat)`.
///
/// `ST_Covers` is boundary-inclusive: a point exactly on a region's
/// border is contained. If multiple regions cover the point (a
/// data-quality anomaly — zones are expected to partition the map),
/// the first match in the store's natural retrieval order wins.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn find_zone_covering(
    db: &dyn Database,
    lat: f64,
    lon: f64,
) -> Result<Option<i32>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT zone_id FROM regions
             WHERE ST_Covers(geog, ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography)
             LIMIT 1",
            &[DatabaseValue::Real64(lon), DatabaseValue::Real64(lat)],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(None);
    };

    let zone_id: i32 = row.to_value("zone_id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse zone id: {e}"),
    })?;

    Ok(Some(zone_id))
}

/// Looks up a zone by id.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn zone_by_id(db: &dyn Database, zone_id: i32) -> Result<Option<ZoneRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, name FROM zones WHERE id = $1",
            &[DatabaseValue::Int32(zone_id)],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(None);
    };

    Ok(Some(ZoneRow {
        id: row.to_value("id").unwrap_or(0),
        name: row.to_value("name").unwrap_or_default(),
    }))
}

/// Returns all officers assigned to a zone, in no guaranteed order.
///
/// Empty if the zone has no assignments or does not exist.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn officers_for_zone(db: &dyn Database, zone_id: i32) -> Result<Vec<OfficerRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT o.id, o.name, o.email, o.phone, o.title
             FROM officers o
             JOIN zone_assignments za ON za.officer_id = o.id
             WHERE za.zone_id = $1",
            &[DatabaseValue::Int32(zone_id)],
        )
        .await?;

    let mut officers = Vec::with_capacity(rows.len());

    for row in &rows {
        officers.push(OfficerRow {
            id: row.to_value("id").unwrap_or(0),
            name: row.to_value("name").unwrap_or_default(),
            email: row.to_value("email").unwrap_or_default(),
            phone: row.to_value("phone").unwrap_or_default(),
            title: row.to_value("title").unwrap_or_default(),
        });
    }

    Ok(officers)
}

/// Returns every region boundary as `GeoJSON`, in region-id order.
///
/// Feeds the in-memory zone index; the id ordering matches the natural
/// retrieval order used by [`find_zone_covering`] so both paths agree on
/// which region wins when boundaries overlap.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn region_boundaries(db: &dyn Database) -> Result<Vec<RegionBoundary>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, zone_id, ST_AsGeoJSON(geog) as geojson
             FROM regions
             WHERE geog IS NOT NULL
             ORDER BY id",
            &[],
        )
        .await?;

    let mut boundaries = Vec::with_capacity(rows.len());

    for row in &rows {
        boundaries.push(RegionBoundary {
            region_id: row.to_value("id").unwrap_or(0),
            zone_id: row.to_value("zone_id").unwrap_or(0),
            geojson: row.to_value("geojson").unwrap_or_default(),
        });
    }

    Ok(boundaries)
}
