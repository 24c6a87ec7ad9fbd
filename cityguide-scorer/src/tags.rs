//! Bonus for requested tags a place carries.

use std::collections::BTreeSet;

use cityguide_core::{Place, Query, Scorer};

/// Adds `bonus` for each requested tag found in the place's tag set.
///
/// Both sides are lowercased and trimmed; matches are exact. Requested tags
/// are treated as a set, so repeats count once and order is irrelevant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagAffinityScorer {
    /// Score added per matching tag.
    pub bonus: f64,
}

impl Default for TagAffinityScorer {
    fn default() -> Self {
        Self { bonus: 0.3 }
    }
}

impl TagAffinityScorer {
    /// Score `place` against `requested` tags.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use cityguide_core::Place;
    /// use cityguide_scorer::TagAffinityScorer;
    ///
    /// let place = Place::new("1", "Park Street", "food", Coord { x: 0.0, y: 0.0 })
    ///     .with_tags(["Food", "nightlife"]);
    /// let score = TagAffinityScorer::default().affinity(["food", "museum"], &place);
    /// assert!((score - 0.3).abs() < 1e-9);
    /// ```
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "tag bonuses are additive")]
    pub fn affinity<I, T>(&self, requested: I, place: &Place) -> f64
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let wanted: BTreeSet<String> = requested
            .into_iter()
            .map(|tag| fold(tag.as_ref()))
            .filter(|tag| !tag.is_empty())
            .collect();
        if wanted.is_empty() {
            return 0.0;
        }
        let carried: BTreeSet<String> = place.tags.iter().map(String::as_str).map(fold).collect();
        let total = wanted
            .intersection(&carried)
            .fold(0.0, |acc, _| acc + self.bonus);
        Self::sanitise(total)
    }
}

impl Scorer for TagAffinityScorer {
    fn score(&self, place: &Place, query: &Query) -> f64 {
        self.affinity(&query.tags, place)
    }
}

fn fold(tag: &str) -> String {
    tag.trim().to_lowercase()
}
