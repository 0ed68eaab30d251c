#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address geocoding adapter.
//!
//! Converts a free-text address to WGS84 coordinates through the narrow
//! [`Geocoder`] seam. The resolution path treats geocoding as an
//! external collaborator: any failure — network error, zero results,
//! malformed response — surfaces as `None`, and callers map "no
//! coordinates available" to "no zone found" rather than an error.

pub mod google;

use async_trait::async_trait;
use thiserror::Error;

/// Geographic coordinates (WGS84) returned by a geocoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

/// The narrow seam between the resolution path and whichever geocoding
/// provider backs it.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a free-text address to coordinates.
    ///
    /// Returns `None` on any failure. Callers must not distinguish
    /// failure causes; the provider logs the details.
    async fn geocode(&self, address: &str) -> Option<Coordinates>;
}

/// Errors from the underlying geocoding request.
///
/// Collapsed to `None` at the [`Geocoder`] seam; only the provider
/// internals and their tests see these.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}
