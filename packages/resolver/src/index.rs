//! In-memory spatial index over region polygons.
//!
//! Loads every region boundary from the store, builds an R-tree of
//! bounding boxes, and answers point-in-zone lookups without a database
//! round trip. Intended as a read-through cache for callers doing many
//! lookups; rebuild after every reload to invalidate.
//!
//! The point-in-polygon predicate here is planar, not ellipsoidal. For
//! municipal-scale zones the curvature error is negligible, but the
//! `PostGIS` path in [`crate::find_zone`] remains the geography-aware
//! authority.

use geo::{Intersects, Polygon};
use geojson::GeoJson;
use patrol_map_database::{DbError, queries};
use patrol_map_database_models::RegionBoundary;
use rstar::{AABB, RTree, RTreeObject};
use switchy_database::Database;

/// A region polygon stored in the R-tree with its owning zone.
struct RegionEntry {
    region_id: i32,
    zone_id: i32,
    envelope: AABB<[f64; 2]>,
    polygon: Polygon<f64>,
}

impl RTreeObject for RegionEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built spatial index over all region polygons.
pub struct ZoneIndex {
    regions: RTree<RegionEntry>,
}

impl ZoneIndex {
    /// Fetches all region boundaries from the store and builds the index.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the boundary query fails.
    pub async fn load(db: &dyn Database) -> Result<Self, DbError> {
        let boundaries = queries::region_boundaries(db).await?;
        let index = Self::from_regions(&boundaries);
        log::info!("Loaded {} regions into zone index", index.len());
        Ok(index)
    }

    /// Builds the index from already-fetched region boundaries.
    ///
    /// Regions whose `GeoJSON` fails to parse as a polygon are skipped
    /// with a warning; a bad row should not take down every lookup.
    #[must_use]
    pub fn from_regions(boundaries: &[RegionBoundary]) -> Self {
        let mut entries = Vec::with_capacity(boundaries.len());

        for boundary in boundaries {
            let Some(polygon) = parse_polygon(&boundary.geojson) else {
                log::warn!(
                    "Failed to parse polygon for region {} (zone {})",
                    boundary.region_id,
                    boundary.zone_id
                );
                continue;
            };

            entries.push(RegionEntry {
                region_id: boundary.region_id,
                zone_id: boundary.zone_id,
                envelope: compute_envelope(&polygon),
                polygon,
            });
        }

        Self {
            regions: RTree::bulk_load(entries),
        }
    }

    /// Returns the id of the zone whose region contains `(lon, lat)`.
    ///
    /// Boundary-inclusive: a point exactly on a region's border is
    /// contained. When regions overlap, the lowest region id wins,
    /// matching the store's natural retrieval order so both lookup
    /// paths agree.
    #[must_use]
    pub fn find_zone(&self, lat: f64, lon: f64) -> Option<i32> {
        let point = geo::Point::new(lon, lat);
        let query_env = AABB::from_point([lon, lat]);

        let mut first: Option<&RegionEntry> = None;

        for entry in self.regions.locate_in_envelope_intersecting(&query_env) {
            if entry.polygon.intersects(&point) {
                match first {
                    None => first = Some(entry),
                    Some(current) if entry.region_id < current.region_id => {
                        first = Some(entry);
                    }
                    _ => {}
                }
            }
        }

        first.map(|entry| entry.zone_id)
    }

    /// Number of indexed regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.size()
    }

    /// Whether the index holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.size() == 0
    }
}

/// Parses a `GeoJSON` string into a [`Polygon`].
fn parse_polygon(geojson_str: &str) -> Option<Polygon<f64>> {
    let geojson: GeoJson = geojson_str.parse().ok()?;
    if let GeoJson::Geometry(geom) = geojson {
        let geo_geom: geo::Geometry<f64> = geom.try_into().ok()?;
        match geo_geom {
            geo::Geometry::Polygon(polygon) => Some(polygon),
            _ => None,
        }
    } else {
        None
    }
}

/// Computes the bounding box envelope for a [`Polygon`].
fn compute_envelope(polygon: &Polygon<f64>) -> AABB<[f64; 2]> {
    use geo::BoundingRect;

    polygon.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(region_id: i32, zone_id: i32, origin: (f64, f64), size: f64) -> RegionBoundary {
        let (x, y) = origin;
        let geojson = serde_json::json!({
            "type": "Polygon",
            "coordinates": [[
                [x, y],
                [x + size, y],
                [x + size, y + size],
                [x, y + size],
                [x, y],
            ]],
        });
        RegionBoundary {
            region_id,
            zone_id,
            geojson: geojson.to_string(),
        }
    }

    #[test]
    fn resolves_interior_point() {
        let index = ZoneIndex::from_regions(&[square(1, 10, (0.0, 0.0), 4.0)]);
        assert_eq!(index.find_zone(2.0, 2.0), Some(10));
    }

    #[test]
    fn resolves_point_on_boundary_edge() {
        let index = ZoneIndex::from_regions(&[square(1, 10, (0.0, 0.0), 4.0)]);
        // Midpoint of the southern edge: lat 0.0, lon 2.0.
        assert_eq!(index.find_zone(0.0, 2.0), Some(10));
    }

    #[test]
    fn resolves_point_on_boundary_vertex() {
        let index = ZoneIndex::from_regions(&[square(1, 10, (0.0, 0.0), 4.0)]);
        assert_eq!(index.find_zone(0.0, 0.0), Some(10));
    }

    #[test]
    fn misses_exterior_point() {
        let index = ZoneIndex::from_regions(&[square(1, 10, (0.0, 0.0), 4.0)]);
        assert_eq!(index.find_zone(5.0, 5.0), None);
    }

    #[test]
    fn empty_index_resolves_nothing() {
        let index = ZoneIndex::from_regions(&[]);
        assert!(index.is_empty());
        assert_eq!(index.find_zone(2.0, 2.0), None);
    }

    #[test]
    fn multi_part_zone_resolves_from_every_part() {
        // Three disjoint parts of the same zone, as produced by
        // MultiPolygon decomposition.
        let index = ZoneIndex::from_regions(&[
            square(1, 7, (0.0, 0.0), 1.0),
            square(2, 7, (10.0, 0.0), 1.0),
            square(3, 7, (20.0, 0.0), 1.0),
        ]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.find_zone(0.5, 0.5), Some(7));
        assert_eq!(index.find_zone(0.5, 10.5), Some(7));
        assert_eq!(index.find_zone(0.5, 20.5), Some(7));
        assert_eq!(index.find_zone(0.5, 5.0), None);
    }

    #[test]
    fn overlap_resolves_to_first_region_in_retrieval_order() {
        // Overlapping regions are a data-quality anomaly; the lowest
        // region id wins regardless of input order.
        let index = ZoneIndex::from_regions(&[
            square(2, 20, (0.0, 0.0), 4.0),
            square(1, 10, (2.0, 2.0), 4.0),
        ]);
        assert_eq!(index.find_zone(3.0, 3.0), Some(10));
    }

    #[test]
    fn skips_unparseable_region() {
        let bad = RegionBoundary {
            region_id: 1,
            zone_id: 10,
            geojson: "not geojson".to_string(),
        };
        let index = ZoneIndex::from_regions(&[bad, square(2, 20, (0.0, 0.0), 4.0)]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.find_zone(2.0, 2.0), Some(20));
    }

    #[test]
    fn coordinate_order_is_lon_lat_in_geometry() {
        // A tall narrow box: lon in [0, 1], lat in [0, 10]. A lookup at
        // lat 5, lon 0.5 must hit; swapping the arguments must miss.
        let geojson = serde_json::json!({
            "type": "Polygon",
            "coordinates": [[
                [0.0, 0.0], [1.0, 0.0], [1.0, 10.0], [0.0, 10.0], [0.0, 0.0],
            ]],
        });
        let index = ZoneIndex::from_regions(&[RegionBoundary {
            region_id: 1,
            zone_id: 10,
            geojson: geojson.to_string(),
        }]);
        assert_eq!(index.find_zone(5.0, 0.5), Some(10));
        assert_eq!(index.find_zone(0.5, 5.0), None);
    }
}
