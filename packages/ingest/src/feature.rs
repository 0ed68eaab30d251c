//! Validates raw `GeoJSON` features and flattens them into
//! [`ZoneFeature`] values.
//!
//! Required properties are checked before anything touches the database:
//! a feature missing one of them fails the whole run. Unsupported
//! geometry types are a policy skip, not a failure — the zone and its
//! officers are still ingested.

use patrol_map_database_models::OfficerTitle;
use patrol_map_ingest_models::{OfficerCandidate, ZoneFeature};

use crate::{IngestError, geometry};

/// Required string properties on every feature.
const REQUIRED_PROPERTIES: &[&str] = &[
    "CPD_Zone",
    "CAPT",
    "CAPT_EMAIL",
    "CAPT_PHONE",
    "LT",
    "LT_EMAIL",
    "LT_PHONE",
];

/// Validates a `FeatureCollection` and extracts its features in input
/// order.
///
/// # Errors
///
/// Returns [`IngestError::MalformedFeature`] if the collection has no
/// `features` array or any feature is missing a required property.
pub fn extract_features(collection: &serde_json::Value) -> Result<Vec<ZoneFeature>, IngestError> {
    let features = collection
        .get("features")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| IngestError::MalformedFeature {
            message: "Input has no features array".to_string(),
        })?;

    features
        .iter()
        .enumerate()
        .map(|(index, feature)| extract_feature(feature, index))
        .collect()
}

/// Validates and flattens a single feature.
fn extract_feature(
    feature: &serde_json::Value,
    index: usize,
) -> Result<ZoneFeature, IngestError> {
    let props = feature
        .get("properties")
        .filter(|p| p.is_object())
        .ok_or_else(|| IngestError::MalformedFeature {
            message: format!("Feature {index}: missing properties object"),
        })?;

    for key in REQUIRED_PROPERTIES {
        if props.get(*key).and_then(serde_json::Value::as_str).is_none() {
            return Err(IngestError::MalformedFeature {
                message: format!("Feature {index}: missing required property {key}"),
            });
        }
    }

    let required = |key: &str| -> String {
        props[key].as_str().unwrap_or_default().to_string()
    };

    let zone_name = required("CPD_Zone");

    let captain = OfficerCandidate {
        name: required("CAPT"),
        email: required("CAPT_EMAIL"),
        phone: required("CAPT_PHONE"),
        title: OfficerTitle::Captain,
    };

    let lieutenant = OfficerCandidate {
        name: required("LT"),
        email: required("LT_EMAIL"),
        phone: required("LT_PHONE"),
        title: OfficerTitle::Lieutenant,
    };

    let geometry = feature.get("geometry").unwrap_or(&serde_json::Value::Null);
    let parts = geometry::decompose(geometry);

    if parts.is_none() {
        log::warn!(
            "Feature {index} (zone {zone_name}): unsupported geometry type {}, \
             no regions will be created",
            geometry::geometry_type(geometry)
        );
    }

    let geometry_skipped = parts.is_none();

    Ok(ZoneFeature {
        zone_name,
        captain,
        lieutenant,
        polygon_parts: parts.unwrap_or_default(),
        geometry_skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_feature() -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "properties": {
                "CPD_Zone": "5A",
                "CAPT": "A. Rivera",
                "CAPT_EMAIL": "arivera@cpd.example",
                "CAPT_PHONE": "555-0100",
                "LT": "B. Chen",
                "LT_EMAIL": "bchen@cpd.example",
                "LT_PHONE": "555-0101",
            },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            },
        })
    }

    fn collection(features: Vec<serde_json::Value>) -> serde_json::Value {
        serde_json::json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }

    #[test]
    fn extracts_zone_and_officers() {
        let features = extract_features(&collection(vec![valid_feature()])).unwrap();
        assert_eq!(features.len(), 1);

        let feature = &features[0];
        assert_eq!(feature.zone_name, "5A");
        assert_eq!(feature.captain.name, "A. Rivera");
        assert_eq!(feature.captain.title, OfficerTitle::Captain);
        assert_eq!(feature.lieutenant.name, "B. Chen");
        assert_eq!(feature.lieutenant.title, OfficerTitle::Lieutenant);
        assert_eq!(feature.polygon_parts.len(), 1);
        assert!(!feature.geometry_skipped);
    }

    #[test]
    fn rejects_missing_required_property() {
        let mut feature = valid_feature();
        feature["properties"]
            .as_object_mut()
            .unwrap()
            .remove("CAPT_EMAIL");

        let err = extract_features(&collection(vec![feature])).unwrap_err();
        match err {
            IngestError::MalformedFeature { message } => {
                assert!(message.contains("CAPT_EMAIL"));
            }
            IngestError::StoreFailure(_) => panic!("expected MalformedFeature"),
        }
    }

    #[test]
    fn rejects_non_string_property() {
        let mut feature = valid_feature();
        feature["properties"]["CAPT_PHONE"] = serde_json::json!(5550100);

        assert!(extract_features(&collection(vec![feature])).is_err());
    }

    #[test]
    fn rejects_missing_features_array() {
        let input = serde_json::json!({ "type": "FeatureCollection" });
        assert!(extract_features(&input).is_err());
    }

    #[test]
    fn unsupported_geometry_keeps_zone_and_officers() {
        let mut feature = valid_feature();
        feature["geometry"] = serde_json::json!({
            "type": "Point",
            "coordinates": [0.5, 0.5],
        });

        let features = extract_features(&collection(vec![feature])).unwrap();
        let feature = &features[0];
        assert_eq!(feature.zone_name, "5A");
        assert!(feature.polygon_parts.is_empty());
        assert!(feature.geometry_skipped);
    }

    #[test]
    fn shared_captain_extracts_to_identical_candidates() {
        let mut second = valid_feature();
        second["properties"]["CPD_Zone"] = serde_json::json!("5B");
        second["properties"]["LT"] = serde_json::json!("C. Okafor");

        let features = extract_features(&collection(vec![valid_feature(), second])).unwrap();
        assert_eq!(features[0].captain.name, features[1].captain.name);
        assert_ne!(features[0].lieutenant.name, features[1].lieutenant.name);
    }

    #[test]
    fn preserves_input_order() {
        let mut second = valid_feature();
        second["properties"]["CPD_Zone"] = serde_json::json!("5B");

        let features = extract_features(&collection(vec![valid_feature(), second])).unwrap();
        assert_eq!(features[0].zone_name, "5A");
        assert_eq!(features[1].zone_name, "5B");
    }
}
