//! Free-text relevance between a query and a place.

use cityguide_core::{Place, Query, Scorer};

/// Weights for each text signal.
///
/// Signals are additive: an exact name match also satisfies the prefix and
/// substring signals, so it scores `100 + 60 + 40` before any category, tag
/// or description bonus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextWeights {
    /// Name equals the query.
    pub exact_name: f64,
    /// Name starts with the query.
    pub name_prefix: f64,
    /// Name contains the query.
    pub name_contains: f64,
    /// Category or subcategory contains the query.
    pub category: f64,
    /// A tag equals the query, or the joined tag text contains it.
    pub tags: f64,
    /// Description contains the query.
    pub description: f64,
}

impl Default for TextWeights {
    fn default() -> Self {
        Self {
            exact_name: 100.0,
            name_prefix: 60.0,
            name_contains: 40.0,
            category: 25.0,
            tags: 30.0,
            description: 20.0,
        }
    }
}

/// Scores places by case-insensitive substring matches against the query
/// text.
///
/// Blank query text scores every place `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextRelevanceScorer {
    weights: TextWeights,
}

impl TextRelevanceScorer {
    /// Create a scorer with custom weights.
    #[must_use]
    pub const fn with_weights(weights: TextWeights) -> Self {
        Self { weights }
    }

    /// The weights in use.
    #[must_use]
    pub const fn weights(&self) -> TextWeights {
        self.weights
    }

    /// Score `place` against raw query `text`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "relevance is a sum of weighted signals"
    )]
    pub fn relevance(&self, text: &str, place: &Place) -> f64 {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return 0.0;
        }
        let name = place.name.to_lowercase();
        let signals = [
            (name == needle, self.weights.exact_name),
            (name.starts_with(&needle), self.weights.name_prefix),
            (name.contains(&needle), self.weights.name_contains),
            (category_mentions(place, &needle), self.weights.category),
            (tags_mention(place, &needle), self.weights.tags),
            (
                place.description.to_lowercase().contains(&needle),
                self.weights.description,
            ),
        ];
        let total = signals
            .iter()
            .filter(|(hit, _)| *hit)
            .fold(0.0, |acc, (_, weight)| acc + weight);
        Self::sanitise(total)
    }
}

impl Scorer for TextRelevanceScorer {
    fn score(&self, place: &Place, query: &Query) -> f64 {
        self.relevance(&query.text, place)
    }
}

fn category_mentions(place: &Place, needle: &str) -> bool {
    place.category.to_lowercase().contains(needle)
        || place
            .subcategory
            .as_deref()
            .is_some_and(|subcategory| subcategory.to_lowercase().contains(needle))
}

fn tags_mention(place: &Place, needle: &str) -> bool {
    place
        .tags
        .iter()
        .any(|tag| tag.trim().to_lowercase() == needle)
        || place.tags.join(",").to_lowercase().contains(needle)
}
