//! Geographic primitives shared by the distribution and logistics modules.

use serde::{Deserialize, Serialize};

/// Mean earth radius in kilometers (spherical-earth approximation).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another point in kilometers, using the
    /// haversine formula on a spherical earth.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self, other)
    }
}

/// Haversine great-circle distance between two points, in kilometers.
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Jakarta city center and Bandung, ~118 km apart great-circle.
    const JAKARTA: GeoPoint = GeoPoint {
        latitude: -6.2088,
        longitude: 106.8456,
    };
    const BANDUNG: GeoPoint = GeoPoint {
        latitude: -6.9175,
        longitude: 107.6191,
    };

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(haversine_km(&JAKARTA, &JAKARTA), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let ab = haversine_km(&JAKARTA, &BANDUNG);
        let ba = haversine_km(&BANDUNG, &JAKARTA);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance() {
        let d = haversine_km(&JAKARTA, &BANDUNG);
        assert!(d > 110.0 && d < 125.0, "got {}", d);
    }

    #[test]
    fn test_one_degree_latitude() {
        // One degree of latitude is ~111.2 km regardless of longitude.
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = haversine_km(&a, &b);
        assert!((d - 111.19).abs() < 0.5, "got {}", d);
    }
}
