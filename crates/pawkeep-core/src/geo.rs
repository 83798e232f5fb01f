//! Great-circle distance and nearby-provider search.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers, used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default number of results returned by [`search_nearby`] callers that do
/// not specify a limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// A latitude/longitude pair in degrees. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether the point lies within the valid latitude/longitude ranges
    /// ([-90, 90] and [-180, 180]).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A candidate record the proximity search can rank.
///
/// Providers without a position (walkers, sitters) return `None` and are
/// never matched; only vets carry coordinates.
pub trait Locatable {
    fn position(&self) -> Option<GeoPoint>;
    fn is_active(&self) -> bool;
}

/// Great-circle distance between two points in kilometers (haversine).
#[must_use]
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h fractionally past 1.0 for near-antipodal pairs,
    // which would turn asin into NaN.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Filter `candidates` to active providers within `radius_km` of `origin`,
/// sorted ascending by distance, truncated to `limit`.
///
/// The boundary is inclusive: a candidate exactly `radius_km` away is kept.
/// Ties keep input order (stable sort). Degenerate inputs — no candidates,
/// `radius_km <= 0`, or `limit == 0` — yield an empty vec, never an error.
pub fn search_nearby<T: Locatable>(
    origin: GeoPoint,
    radius_km: f64,
    limit: usize,
    candidates: &[T],
) -> Vec<(&T, f64)> {
    if radius_km <= 0.0 || limit == 0 {
        return Vec::new();
    }

    let mut hits: Vec<(&T, f64)> = candidates
        .iter()
        .filter(|c| c.is_active())
        .filter_map(|c| c.position().map(|p| (c, haversine_km(origin, p))))
        .filter(|(_, d)| *d <= radius_km)
        .collect();

    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits.truncate(limit);
    hits
}

/// Human-readable distance: `"{X.X} km"` at or above one kilometer,
/// otherwise whole meters.
#[must_use]
pub fn format_distance(distance_km: f64) -> String {
    if distance_km >= 1.0 {
        format!("{distance_km:.1} km")
    } else {
        format!("{:.0} m", distance_km * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Clinic {
        name: &'static str,
        point: GeoPoint,
        active: bool,
    }

    impl Locatable for Clinic {
        fn position(&self) -> Option<GeoPoint> {
            Some(self.point)
        }
        fn is_active(&self) -> bool {
            self.active
        }
    }

    fn clinic(name: &'static str, lat: f64, lon: f64) -> Clinic {
        Clinic {
            name,
            point: GeoPoint::new(lat, lon),
            active: true,
        }
    }

    const DELHI_CENTER: GeoPoint = GeoPoint {
        latitude: 28.6139,
        longitude: 77.2090,
    };

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(28.6139, 77.2090);
        let b = GeoPoint::new(28.5245, 77.2065);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-12);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(-33.8688, 151.2093);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn delhi_clinic_is_about_five_point_six_km_out() {
        let clinic = GeoPoint::new(28.6562, 77.2410);
        let d = haversine_km(DELHI_CENTER, clinic);
        assert!((d - 5.65).abs() < 0.05, "expected ~5.65 km, got {d}");
        assert_eq!(format_distance(d), "5.6 km");
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        assert!(d.is_finite(), "expected a finite distance, got {d}");
        assert!((d - 20_015.0).abs() < 1.0, "expected ~20015 km, got {d}");

        let poles = haversine_km(GeoPoint::new(90.0, 0.0), GeoPoint::new(-90.0, 0.0));
        assert!(poles.is_finite());
        assert!((poles - 20_015.0).abs() < 1.0, "expected ~20015 km, got {poles}");
    }

    #[test]
    fn search_includes_provider_inside_radius() {
        let candidates = vec![clinic("old delhi", 28.6562, 77.2410)];
        let results = search_nearby(DELHI_CENTER, 10.0, 5, &candidates);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.name, "old delhi");
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let candidates = vec![clinic("edge", 28.6562, 77.2410)];
        let exact = haversine_km(DELHI_CENTER, candidates[0].point);
        assert_eq!(search_nearby(DELHI_CENTER, exact, 5, &candidates).len(), 1);
        assert_eq!(
            search_nearby(DELHI_CENTER, exact - 1e-9, 5, &candidates).len(),
            0
        );
    }

    #[test]
    fn results_are_sorted_ascending_by_distance() {
        let candidates = vec![
            clinic("saket", 28.5245, 77.2065),
            clinic("old delhi", 28.6562, 77.2410),
            clinic("connaught", 28.6304, 77.2177),
        ];
        let results = search_nearby(DELHI_CENTER, 50.0, 10, &candidates);
        let distances: Vec<f64> = results.iter().map(|(_, d)| *d).collect();
        assert_eq!(results.len(), 3);
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(results[0].0.name, "connaught");
    }

    #[test]
    fn limit_truncates_after_sorting() {
        let candidates = vec![
            clinic("saket", 28.5245, 77.2065),
            clinic("old delhi", 28.6562, 77.2410),
            clinic("connaught", 28.6304, 77.2177),
        ];
        let results = search_nearby(DELHI_CENTER, 50.0, 2, &candidates);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.name, "connaught");
    }

    #[test]
    fn inactive_providers_are_skipped() {
        let mut c = clinic("closed", 28.6562, 77.2410);
        c.active = false;
        let candidates = vec![c];
        assert!(search_nearby(DELHI_CENTER, 50.0, 5, &candidates).is_empty());
    }

    #[test]
    fn degenerate_inputs_yield_empty_results() {
        let candidates = vec![clinic("old delhi", 28.6562, 77.2410)];
        assert!(search_nearby(DELHI_CENTER, 0.0, 5, &candidates).is_empty());
        assert!(search_nearby(DELHI_CENTER, -3.0, 5, &candidates).is_empty());
        assert!(search_nearby(DELHI_CENTER, 10.0, 0, &candidates).is_empty());
        let none: Vec<Clinic> = vec![];
        assert!(search_nearby(DELHI_CENTER, 10.0, 5, &none).is_empty());
    }

    #[test]
    fn search_is_idempotent() {
        let candidates = vec![
            clinic("saket", 28.5245, 77.2065),
            clinic("old delhi", 28.6562, 77.2410),
        ];
        let first: Vec<(String, f64)> = search_nearby(DELHI_CENTER, 50.0, 5, &candidates)
            .into_iter()
            .map(|(c, d)| (c.name.to_string(), d))
            .collect();
        let second: Vec<(String, f64)> = search_nearby(DELHI_CENTER, 50.0, 5, &candidates)
            .into_iter()
            .map(|(c, d)| (c.name.to_string(), d))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn format_distance_switches_to_meters_below_one_km() {
        assert_eq!(format_distance(5.84), "5.8 km");
        assert_eq!(format_distance(1.0), "1.0 km");
        assert_eq!(format_distance(0.9994), "999 m");
        assert_eq!(format_distance(0.05), "50 m");
    }

    #[test]
    fn point_validity_ranges() {
        assert!(GeoPoint::new(90.0, 180.0).is_valid());
        assert!(GeoPoint::new(-90.0, -180.0).is_valid());
        assert!(!GeoPoint::new(90.1, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.5).is_valid());
    }
}
