use serde::Deserialize;
use utoipa::ToSchema;

/// Decimal-degree latitude/longitude pair. Out-of-range values are a caller
/// error; only finiteness is checked at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points (haversine formula), in meters.
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Inclusive containment: a point at exactly `radius_meters` from the center
/// is within range.
pub fn within_radius(point: Coordinates, center: Coordinates, radius_meters: f64) -> bool {
    distance_meters(point, center) <= radius_meters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seoul_city_hall() -> Coordinates {
        Coordinates {
            latitude: 37.5665,
            longitude: 126.9780,
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = seoul_city_hall();
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = seoul_city_hall();
        let b = Coordinates {
            latitude: 37.3948,
            longitude: 127.1112,
        };
        let d1 = distance_meters(a, b);
        let d2 = distance_meters(b, a);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn known_distance_within_one_percent() {
        // Nashville BNA to LAX, the standard haversine reference pair.
        // ~2886.4 km with an Earth radius of 6371 km.
        let bna = Coordinates {
            latitude: 36.12,
            longitude: -86.67,
        };
        let lax = Coordinates {
            latitude: 33.94,
            longitude: -118.40,
        };
        let d = distance_meters(bna, lax);
        let expected = 2_886_440.0;
        assert!((d - expected).abs() / expected < 0.01, "got {d}");
    }

    #[test]
    fn boundary_is_inclusive() {
        let center = seoul_city_hall();
        let point = Coordinates {
            latitude: 37.5665 + 0.00045, // ~50 m north
            longitude: 126.9780,
        };
        let d = distance_meters(point, center);
        assert!(within_radius(point, center, d));
        assert!(!within_radius(point, center, d - 0.1));
    }

    #[test]
    fn fifty_meters_inside_hundred_meter_fence() {
        let center = seoul_city_hall();
        let near = Coordinates {
            latitude: 37.5665 + 0.00045, // ~50 m
            longitude: 126.9780,
        };
        assert!(within_radius(near, center, 100.0));
    }

    #[test]
    fn five_hundred_meters_outside_hundred_meter_fence() {
        let center = seoul_city_hall();
        let far = Coordinates {
            latitude: 37.5665 + 0.0045, // ~500 m
            longitude: 126.9780,
        };
        assert!(!within_radius(far, center, 100.0));
    }
}
