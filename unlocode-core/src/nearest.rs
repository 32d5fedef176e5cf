//! Nearest-location search in degree space.
//!
//! Distances are squared Euclidean distances between `(latitude, longitude)`
//! pairs, with the longitude difference scaled by `cos²(latitude)` of the
//! query point to offset meridian convergence. This is an ordering heuristic,
//! not a geodesic distance.

use geo::Coord;

use crate::Location;

/// Weighted squared distance from `origin` to `candidate`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use unlocode_core::weighted_squared_distance;
///
/// let origin = Coord { x: 10.0, y: 60.0 };
/// let east = Coord { x: 12.0, y: 60.0 };
/// // cos²(60°) = 0.25, so two degrees of longitude weigh as much as one of latitude.
/// assert!((weighted_squared_distance(origin, east) - 1.0).abs() < 1e-9);
/// ```
pub fn weighted_squared_distance(origin: Coord<f64>, candidate: Coord<f64>) -> f64 {
    let weight = origin.y.to_radians().cos().powi(2);
    let d_lat = origin.y - candidate.y;
    let d_lon = origin.x - candidate.x;
    d_lat * d_lat + d_lon * d_lon * weight
}

/// Return the candidate closest to `origin`.
///
/// Candidates without a position are ignored. When several candidates share
/// the minimal distance the first one encountered wins.
pub fn nearest_location<I>(origin: Coord<f64>, candidates: I) -> Option<Location>
where
    I: IntoIterator<Item = Location>,
{
    let mut best: Option<(f64, Location)> = None;
    for candidate in candidates {
        let Some(position) = candidate.position else {
            continue;
        };
        let distance = weighted_squared_distance(origin, position);
        let closer = best
            .as_ref()
            .is_none_or(|(best_distance, _)| distance < *best_distance);
        if closer {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, location)| location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn at(code: &str, latitude: f64, longitude: f64) -> Location {
        Location::new("NO", code, code).with_position(Coord {
            x: longitude,
            y: latitude,
        })
    }

    #[fixture]
    fn candidates() -> Vec<Location> {
        vec![
            at("AAA", 59.0, 10.0),
            at("BBB", 60.0, 12.5),
            at("CCC", 61.2, 10.0),
        ]
    }

    #[rstest]
    fn picks_weighted_minimum(candidates: Vec<Location>) {
        // From (60, 10): AAA = 1.0, BBB = 6.25 * 0.25 = 1.5625, CCC = 1.44.
        let origin = Coord { x: 10.0, y: 60.0 };
        let found = nearest_location(origin, candidates).expect("a candidate");
        assert_eq!(found.location_code, "AAA");
    }

    #[rstest]
    fn longitude_weight_shrinks_towards_the_poles() {
        // Unweighted, DDD (6.25) would lose to EEE (1.44). At 70° the
        // longitude weight is about 0.117, so DDD scores about 0.73.
        let origin = Coord { x: 10.0, y: 70.0 };
        let far_north = vec![at("DDD", 70.0, 12.5), at("EEE", 71.2, 10.0)];
        let found = nearest_location(origin, far_north).expect("a candidate");
        assert_eq!(found.location_code, "DDD");
    }

    #[rstest]
    fn ignores_unknown_positions() {
        let origin = Coord { x: 0.0, y: 0.0 };
        let unknown = Location::new("NO", "XXX", "Nowhere");
        let found = nearest_location(origin, vec![unknown.clone(), at("AAA", 5.0, 5.0)]);
        assert_eq!(found.map(|l| l.location_code), Some("AAA".into()));
        assert!(nearest_location(origin, vec![unknown]).is_none());
    }

    #[rstest]
    fn ties_keep_the_first_candidate() {
        let origin = Coord { x: 0.0, y: 0.0 };
        let found = nearest_location(origin, vec![at("AAA", 1.0, 0.0), at("BBB", -1.0, 0.0)]);
        assert_eq!(found.map(|l| l.location_code), Some("AAA".into()));
    }
}
