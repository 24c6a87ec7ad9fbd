//! Distance-decayed proximity between the user and a place.

use cityguide_core::{Place, Query, Scorer};
use geo::Coord;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two WGS84 coordinates
/// (`x = longitude`, `y = latitude`), using the haversine formula.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use cityguide_scorer::haversine_km;
///
/// let here = Coord { x: 88.342, y: 22.545 };
/// assert_eq!(haversine_km(here, here), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "haversine distance is floating-point trigonometry"
)]
pub fn haversine_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let d_lat = (to.y - from.y).to_radians();
    let d_lng = (to.x - from.x).to_radians();
    let half_chord = (d_lat / 2.0).sin().powi(2)
        + from.y.to_radians().cos() * to.y.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let clamped = half_chord.clamp(0.0, 1.0);
    let angle = 2.0 * clamped.sqrt().atan2((1.0 - clamped).sqrt());
    EARTH_RADIUS_KM * angle
}

/// Distance and proximity score for one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    /// Great-circle distance in kilometres, rounded to two decimal places.
    pub distance_km: f64,
    /// Linear decay score in `0.0..=1.0`.
    pub score: f64,
}

/// Scores places by how close they are to the query's user coordinate.
///
/// The score decays linearly from `1.0` at zero distance to `0.0` at
/// `radius_km`, and stays `0.0` beyond it. Queries without a coordinate
/// score `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProximityScorer {
    /// Distance at which the score reaches zero.
    pub radius_km: f64,
}

impl Default for GeoProximityScorer {
    fn default() -> Self {
        Self { radius_km: 20.0 }
    }
}

impl GeoProximityScorer {
    /// Score a known distance.
    ///
    /// # Examples
    /// ```
    /// use cityguide_scorer::GeoProximityScorer;
    ///
    /// let scorer = GeoProximityScorer::default();
    /// assert_eq!(scorer.score_distance(0.0), 1.0);
    /// assert_eq!(scorer.score_distance(10.0), 0.5);
    /// assert_eq!(scorer.score_distance(35.0), 0.0);
    /// ```
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "linear distance decay")]
    pub fn score_distance(&self, distance_km: f64) -> f64 {
        let decayed = 1.0 - distance_km.min(self.radius_km) / self.radius_km;
        Self::sanitise(decayed)
    }

    /// Distance and score between `origin` and `place`.
    #[must_use]
    pub fn measure(&self, origin: Coord<f64>, place: &Place) -> Proximity {
        let distance = haversine_km(origin, place.location);
        Proximity {
            distance_km: round_to_hundredths(distance),
            score: self.score_distance(distance),
        }
    }
}

impl Scorer for GeoProximityScorer {
    fn score(&self, place: &Place, query: &Query) -> f64 {
        query
            .origin
            .map_or(0.0, |origin| self.measure(origin, place).score)
    }
}

#[expect(clippy::float_arithmetic, reason = "display rounding")]
fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
