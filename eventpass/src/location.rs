//! User location as seen by the filter engine.
//!
//! Permission prompts and reverse geocoding live outside this crate. Their
//! results arrive here as plain values: coordinates when known, and a city
//! name that falls back to a configured default when the lookup fails.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point from degrees
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometres (haversine)
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

/// What the app currently knows about where the user is
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationContext {
    /// Device coordinates, if permission was granted and a fix obtained
    pub coords: Option<GeoPoint>,
    /// Resolved city name, or the fallback city
    pub city: String,
}

impl LocationContext {
    /// Location resolved to coordinates and a city
    #[must_use]
    pub fn resolved(coords: GeoPoint, city: impl Into<String>) -> Self {
        Self {
            coords: Some(coords),
            city: city.into(),
        }
    }

    /// Location unavailable; only the fallback city is known
    #[must_use]
    pub fn unavailable(fallback_city: impl Into<String>) -> Self {
        Self {
            coords: None,
            city: fallback_city.into(),
        }
    }

    /// Distance from the user to `point`, if the user position is known
    #[must_use]
    pub fn distance_to(&self, point: &GeoPoint) -> Option<f64> {
        self.coords.map(|coords| coords.distance_km(point))
    }
}
