//! Google Maps Geocoding API client.
//!
//! See <https://developers.google.com/maps/documentation/geocoding/requests-geocoding>

use std::time::Duration;

use async_trait::async_trait;

use crate::{Coordinates, GeocodeError, Geocoder};

/// Google Maps Geocoding API endpoint.
const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Request timeout. Geocoding sits on the request path, so a stalled
/// upstream must fail fast rather than hold the caller.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Geocoder backed by the Google Maps Geocoding API.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    /// Creates a client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the HTTP client cannot be built.
    pub fn new(api_key: Option<String>) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, api_key })
    }

    /// Creates a client reading the key from the `GOOGLE_MAPS_API_KEY`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, GeocodeError> {
        Self::new(std::env::var("GOOGLE_MAPS_API_KEY").ok())
    }

    /// Issues the geocoding request and parses the response.
    ///
    /// `Ok(None)` means the API matched nothing; errors mean the request
    /// or response itself failed. Both collapse to `None` at the
    /// [`Geocoder`] seam.
    async fn lookup(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let mut params = vec![("address", address.to_string())];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }

        let resp = self.client.get(GEOCODE_URL).query(&params).send().await?;
        let body: serde_json::Value = resp.json().await?;

        parse_response(&body)
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Option<Coordinates> {
        match self.lookup(address).await {
            Ok(coordinates) => coordinates,
            Err(e) => {
                log::warn!("Geocoding failed for {address:?}: {e}");
                None
            }
        }
    }
}

/// Parses a Google geocoding response, taking the first result's
/// location.
fn parse_response(body: &serde_json::Value) -> Result<Option<Coordinates>, GeocodeError> {
    let results = body["results"]
        .as_array()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Google response has no results array".to_string(),
        })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let location = &first["geometry"]["location"];

    let lat = location["lat"].as_f64().ok_or_else(|| GeocodeError::Parse {
        message: "Missing lat in Google response".to_string(),
    })?;

    let lng = location["lng"].as_f64().ok_or_else(|| GeocodeError::Parse {
        message: "Missing lng in Google response".to_string(),
    })?;

    Ok(Some(Coordinates { lat, lng }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_google_result() {
        let body = serde_json::json!({
            "status": "OK",
            "results": [{
                "formatted_address": "202 E University Ave, Champaign, IL",
                "geometry": {
                    "location": { "lat": 40.1184, "lng": -88.2434 }
                }
            }]
        });
        let coordinates = parse_response(&body).unwrap().unwrap();
        assert!((coordinates.lat - 40.1184).abs() < 1e-4);
        assert!((coordinates.lng - -88.2434).abs() < 1e-4);
    }

    #[test]
    fn parses_zero_results_as_none() {
        let body = serde_json::json!({ "status": "ZERO_RESULTS", "results": [] });
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn rejects_missing_results_array() {
        let body = serde_json::json!({ "error_message": "quota exceeded" });
        assert!(parse_response(&body).is_err());
    }

    #[test]
    fn rejects_missing_location() {
        let body = serde_json::json!({
            "results": [{ "geometry": {} }]
        });
        assert!(parse_response(&body).is_err());
    }
}
