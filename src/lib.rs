//! Facade crate for the cityguide place-ranking engine.
//!
//! This crate re-exports the core domain types, the scorers and the ranking
//! orchestrator. The SQLite repository is available behind the
//! `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use cityguide_core::{
    FetchWindow, MemoryPlaceRepository, OpeningHours, PageRequest, Place, PlaceDumpError,
    PlaceFilter, PlaceRepository, Query, RankingMode, RawPlace, RequestValidationError,
    ResultLimit, Scorer, normalise,
};

#[cfg(feature = "store-sqlite")]
pub use cityguide_core::{SqlitePlaceRepository, SqlitePlaceRepositoryError};

pub use cityguide_ranker::{PlacePage, RankError, RankedPlace, Ranker, RankerConfig, Ranking};
pub use cityguide_scorer::{
    GeoProximityScorer, Keywords, Proximity, TagAffinityScorer, TextRelevanceScorer, TextWeights,
};
