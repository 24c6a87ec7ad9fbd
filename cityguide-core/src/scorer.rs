//! Score places against a ranking request.
//!
//! The `Scorer` trait assigns a non-negative score to a
//! [`Place`](crate::Place) given the caller's [`Query`](crate::Query). The
//! ranking orchestrator sums the scores of every scorer that applies to the
//! selected mode.

use crate::{Place, Query};

/// Calculate a score for a place.
///
/// Higher scores indicate a better match. Implementations must be
/// thread-safe (`Send` + `Sync`) so one set of scorers can serve concurrent
/// requests. The method is infallible; implementers return `0.0` when the
/// query carries nothing they can score.
///
/// Implementations must:
/// - Produce finite (`f64::is_finite`) scores.
/// - Return non-negative values.
///
/// Scores are not normalised to a common range: text relevance is a sum of
/// integer weights while proximity lives in `0.0..=1.0`.
///
/// Use [`Scorer::sanitise`] to apply these guards.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use cityguide_core::{Place, Query, Scorer};
///
/// struct UnitScorer;
///
/// impl Scorer for UnitScorer {
///     fn score(&self, _place: &Place, _query: &Query) -> f64 {
///         1.0
///     }
/// }
///
/// let place = Place::new("1", "Esplanade", "transit", Coord { x: 0.0, y: 0.0 });
/// assert_eq!(UnitScorer.score(&place, &Query::default()), 1.0);
/// ```
pub trait Scorer: Send + Sync {
    /// Return a score for `place` according to `query`.
    fn score(&self, place: &Place, query: &Query) -> f64;

    /// Validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and clamps negatives to `0.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.max(0.0)
    }
}
