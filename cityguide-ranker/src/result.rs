//! Ranking output types.

use cityguide_core::Place;
use serde::Serialize;

/// A place with the score it was ranked by.
///
/// Serialises as the place's fields plus `score` and, in recommend mode,
/// `distance_km`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlace {
    /// The ranked place.
    #[serde(flatten)]
    pub place: Place,
    /// Combined score from the scorers that applied.
    pub score: f64,
    /// Great-circle distance from the user, rounded to two decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// One page of a name-ordered listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacePage {
    /// Places on this page.
    pub items: Vec<Place>,
    /// 1-based page number.
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
    /// Number of places matching the filter across all pages.
    pub total: usize,
}

/// Output of [`Ranker::rank`](crate::Ranker::rank).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Ranking {
    /// Listing mode output.
    Listing(PlacePage),
    /// Search or recommend mode output.
    Ranked(Vec<RankedPlace>),
}
