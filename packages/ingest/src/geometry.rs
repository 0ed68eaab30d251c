//! Decomposes `GeoJSON` geometries into simple polygon parts.
//!
//! A `Polygon` yields one part; a `MultiPolygon` yields one part per
//! constituent polygon, each rewrapped as a standalone `GeoJSON` Polygon
//! so that every region row stores a simple polygon. Anything else is
//! unsupported and skipped by the caller.

/// Decomposes a feature's geometry into `GeoJSON` Polygon strings, one
/// per region row to create.
///
/// Returns `None` for unsupported or structurally unusable geometries
/// (wrong `type`, missing/empty `coordinates`, `null` geometry). The
/// caller skips these without aborting the reload.
#[must_use]
pub fn decompose(geometry: &serde_json::Value) -> Option<Vec<String>> {
    let geometry_type = geometry.get("type")?.as_str()?;
    let coordinates = geometry.get("coordinates")?.as_array()?;

    if coordinates.is_empty() {
        return None;
    }

    match geometry_type {
        "Polygon" => {
            if !coordinates.iter().all(serde_json::Value::is_array) {
                return None;
            }
            serde_json::to_string(geometry).ok().map(|s| vec![s])
        }
        "MultiPolygon" => {
            let mut parts = Vec::with_capacity(coordinates.len());
            for part in coordinates {
                if !part.is_array() {
                    return None;
                }
                let polygon = serde_json::json!({
                    "type": "Polygon",
                    "coordinates": part,
                });
                parts.push(serde_json::to_string(&polygon).ok()?);
            }
            Some(parts)
        }
        _ => None,
    }
}

/// Returns the geometry `type` string, for skip logging.
#[must_use]
pub fn geometry_type(geometry: &serde_json::Value) -> &str {
    geometry
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("null")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon() -> serde_json::Value {
        serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
        })
    }

    #[test]
    fn polygon_yields_one_part() {
        let parts = decompose(&polygon()).unwrap();
        assert_eq!(parts.len(), 1);

        let parsed: serde_json::Value = serde_json::from_str(&parts[0]).unwrap();
        assert_eq!(parsed["type"], "Polygon");
    }

    #[test]
    fn multi_polygon_yields_one_part_per_polygon() {
        let geometry = serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                [[[2.0, 2.0], [3.0, 2.0], [3.0, 3.0], [2.0, 2.0]]],
                [[[4.0, 4.0], [5.0, 4.0], [5.0, 5.0], [4.0, 4.0]]],
            ],
        });

        let parts = decompose(&geometry).unwrap();
        assert_eq!(parts.len(), 3);

        for part in &parts {
            let parsed: serde_json::Value = serde_json::from_str(part).unwrap();
            assert_eq!(parsed["type"], "Polygon");
            assert!(parsed["coordinates"].is_array());
        }
    }

    #[test]
    fn multi_polygon_parts_keep_their_rings() {
        let geometry = serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[2.0, 2.0], [3.0, 2.0], [3.0, 3.0], [2.0, 2.0]]],
            ],
        });

        let parts = decompose(&geometry).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&parts[0]).unwrap();
        assert_eq!(parsed["coordinates"][0][0][0], 2.0);
    }

    #[test]
    fn rejects_point_geometry() {
        let geometry = serde_json::json!({
            "type": "Point",
            "coordinates": [0.5, 0.5],
        });
        assert!(decompose(&geometry).is_none());
    }

    #[test]
    fn rejects_line_string_geometry() {
        let geometry = serde_json::json!({
            "type": "LineString",
            "coordinates": [[0.0, 0.0], [1.0, 1.0]],
        });
        assert!(decompose(&geometry).is_none());
    }

    #[test]
    fn rejects_null_geometry() {
        assert!(decompose(&serde_json::Value::Null).is_none());
    }

    #[test]
    fn rejects_empty_coordinates() {
        let geometry = serde_json::json!({
            "type": "Polygon",
            "coordinates": [],
        });
        assert!(decompose(&geometry).is_none());
    }

    #[test]
    fn reports_geometry_type_for_logging() {
        assert_eq!(geometry_type(&polygon()), "Polygon");
        assert_eq!(geometry_type(&serde_json::Value::Null), "null");
    }
}
