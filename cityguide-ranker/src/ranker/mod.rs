//! The ranking orchestrator.

use std::cmp::Ordering;

use cityguide_core::{
    FetchWindow, Place, PlaceFilter, PlaceRepository, Query, RankingMode, RawPlace,
    Scorer, normalise,
};
use cityguide_scorer::{GeoProximityScorer, TagAffinityScorer, TextRelevanceScorer};
use log::{debug, warn};

use crate::{PlacePage, RankError, RankedPlace, Ranking, RankerConfig};

/// A pooled record and its normalised place, before relation images are
/// attached.
pub(crate) struct Candidate {
    pub(crate) raw: RawPlace,
    pub(crate) place: Place,
}

struct ScoredCandidate {
    candidate: Candidate,
    score: f64,
}

/// Ranks places from a repository according to a [`Query`].
///
/// The ranker is generic over the repository and owns one instance of each
/// scorer. It keeps no per-request state.
pub struct Ranker<R>
where
    R: PlaceRepository,
{
    repository: R,
    text: TextRelevanceScorer,
    proximity: GeoProximityScorer,
    tags: TagAffinityScorer,
    config: RankerConfig,
}

impl<R> Ranker<R>
where
    R: PlaceRepository,
{
    /// Construct a ranker using default configuration and scorer weights.
    #[must_use]
    pub fn new(repository: R) -> Self {
        Self::with_config(repository, RankerConfig::default())
    }

    /// Construct a ranker with explicit configuration.
    #[must_use]
    pub fn with_config(repository: R, config: RankerConfig) -> Self {
        Self {
            repository,
            text: TextRelevanceScorer::default(),
            proximity: GeoProximityScorer::default(),
            tags: TagAffinityScorer::default(),
            config,
        }
    }

    /// Replace the scorers while returning `self` for chaining.
    #[must_use]
    pub fn with_scorers(
        mut self,
        text: TextRelevanceScorer,
        proximity: GeoProximityScorer,
        tags: TagAffinityScorer,
    ) -> Self {
        self.text = text;
        self.proximity = proximity;
        self.tags = tags;
        self
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// The underlying repository.
    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Rank `query` in the mode it implies.
    ///
    /// # Errors
    /// Returns [`RankError::InvalidRequest`] when a recommend query carries an
    /// out-of-range coordinate.
    pub fn rank(&self, query: &Query) -> Result<Ranking, RankError> {
        let mode = query.mode();
        debug!("ranking in {mode:?} mode");
        match mode {
            RankingMode::Listing => Ok(Ranking::Listing(self.list_places(query))),
            RankingMode::Search => Ok(Ranking::Ranked(self.search_places(query))),
            RankingMode::Recommend => self.recommend_places(query).map(Ranking::Ranked),
        }
    }

    /// List places matching the query's category filters, in name order, one
    /// page at a time.
    #[must_use]
    pub fn list_places(&self, query: &Query) -> PlacePage {
        let filter = query.filter();
        let total = self
            .repository
            .count_by_filter(&filter)
            .unwrap_or_else(|err| {
                warn!("counting places failed, reporting zero: {err}");
                0
            });
        let items = self
            .pool(&filter, FetchWindow::page(query.page))
            .into_iter()
            .map(|candidate| self.hydrate(&candidate.raw))
            .collect();
        PlacePage {
            items,
            page: query.page.page(),
            page_size: query.page.page_size(),
            total,
        }
    }

    /// Rank places by text relevance to the query text.
    ///
    /// Places scoring zero are dropped unless the text is blank, in which
    /// case every place scores zero and the result is name-ordered.
    #[must_use]
    pub fn search_places(&self, query: &Query) -> Vec<RankedPlace> {
        self.ranked(query, RankingMode::Search)
    }

    /// Rank places by proximity to the query's coordinate plus tag affinity.
    ///
    /// Every result carries its distance from the user.
    ///
    /// # Errors
    /// Returns [`RankError::InvalidRequest`] before touching the repository
    /// when the query has no coordinate or an out-of-range one.
    pub fn recommend_places(&self, query: &Query) -> Result<Vec<RankedPlace>, RankError> {
        query.validate_for(RankingMode::Recommend)?;
        Ok(self.ranked(query, RankingMode::Recommend))
    }

    /// Score, sort and truncate the mode's candidate pool.
    fn ranked(&self, query: &Query, mode: RankingMode) -> Vec<RankedPlace> {
        let pool_cap = match mode {
            RankingMode::Recommend => self.config.recommend_pool,
            RankingMode::Search | RankingMode::Listing => self.config.search_pool,
        };
        let scorers = self.scorers_for(mode);
        let mut scored: Vec<ScoredCandidate> = self
            .pool(&query.filter(), FetchWindow::first(pool_cap))
            .into_iter()
            .map(|candidate| {
                let score = combined_score(&scorers, &candidate.place, query);
                ScoredCandidate { candidate, score }
            })
            .collect();

        if mode == RankingMode::Search && !query.text.trim().is_empty() {
            scored.retain(|entry| entry.score > 0.0);
        }

        scored.sort_by(|lhs, rhs| {
            rhs.score
                .partial_cmp(&lhs.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| lhs.candidate.place.name.cmp(&rhs.candidate.place.name))
        });
        scored.truncate(query.limit.get());

        scored
            .into_iter()
            .map(|entry| {
                let place = self.hydrate(&entry.candidate.raw);
                let distance_km = query
                    .origin
                    .filter(|_| mode == RankingMode::Recommend)
                    .map(|origin| self.proximity.measure(origin, &place).distance_km);
                RankedPlace {
                    place,
                    score: entry.score,
                    distance_km,
                }
            })
            .collect()
    }

    fn scorers_for(&self, mode: RankingMode) -> Vec<&dyn Scorer> {
        match mode {
            RankingMode::Listing => Vec::new(),
            RankingMode::Search => vec![&self.text as &dyn Scorer],
            RankingMode::Recommend => vec![&self.proximity as &dyn Scorer, &self.tags],
        }
    }

    /// Fetch and normalise a window of candidates, degrading to an empty
    /// pool when the repository fails.
    pub(crate) fn pool(&self, filter: &PlaceFilter, window: FetchWindow) -> Vec<Candidate> {
        let rows = self
            .repository
            .fetch_by_filter(filter, window)
            .unwrap_or_else(|err| {
                warn!("fetching candidates failed, using an empty pool: {err}");
                Vec::new()
            });
        debug!(
            "pooled {} candidates (offset {}, limit {})",
            rows.len(),
            window.offset,
            window.limit
        );
        rows.into_iter()
            .map(|raw| {
                let place = normalise(&raw, Vec::new());
                Candidate { raw, place }
            })
            .collect()
    }

    /// Normalise `raw` with its related images.
    pub(crate) fn hydrate(&self, raw: &RawPlace) -> Place {
        let images = raw.id().map_or_else(Vec::new, |id| {
            self.repository.fetch_images(&id).unwrap_or_else(|err| {
                warn!("fetching images for place {id} failed: {err}");
                Vec::new()
            })
        });
        normalise(raw, images)
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "mode scores are the sum of their scorers"
)]
fn combined_score(scorers: &[&dyn Scorer], place: &Place, query: &Query) -> f64 {
    scorers
        .iter()
        .fold(0.0, |total, scorer| total + scorer.score(place, query))
}

#[cfg(test)]
mod tests;
