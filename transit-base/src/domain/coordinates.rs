//! Geographic coordinates.

use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair.
///
/// # Examples
///
/// ```
/// use transit_base::domain::Coordinates;
///
/// let tolstopaltsevo = Coordinates::new(55.611087, 37.20829);
/// let marushkino = Coordinates::new(55.595884, 37.209755);
///
/// let metres = tolstopaltsevo.great_circle_to(&marushkino);
/// assert!((metres - 1693.0).abs() < 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create a coordinate pair from latitude and longitude in degrees.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another point, in metres.
    pub fn great_circle_to(&self, other: &Coordinates) -> f64 {
        Point::new(self.lng, self.lat).haversine_distance(&Point::new(other.lng, other.lat))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Distance is symmetric for any pair of points.
        #[test]
        fn symmetric(
            lat1 in -80.0f64..80.0, lng1 in -179.0f64..179.0,
            lat2 in -80.0f64..80.0, lng2 in -179.0f64..179.0,
        ) {
            let a = Coordinates::new(lat1, lng1);
            let b = Coordinates::new(lat2, lng2);
            let ab = a.great_circle_to(&b);
            let ba = b.great_circle_to(&a);
            prop_assert!((ab - ba).abs() < 1e-6, "ab={ab} ba={ba}");
        }

        /// Distance is never negative.
        #[test]
        fn non_negative(
            lat1 in -80.0f64..80.0, lng1 in -179.0f64..179.0,
            lat2 in -80.0f64..80.0, lng2 in -179.0f64..179.0,
        ) {
            let a = Coordinates::new(lat1, lng1);
            let b = Coordinates::new(lat2, lng2);
            prop_assert!(a.great_circle_to(&b) >= 0.0);
        }
    }
}
