//! Core domain types for the cityguide ranking engine.
//!
//! This crate owns the canonical [`Place`] model, the [`normalise`] boundary
//! that turns loosely typed [`RawPlace`] records into places, the per-request
//! [`Query`], and the [`PlaceRepository`] and [`Scorer`] traits the ranking
//! crates build on.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod normalise;
pub mod place;
pub mod query;
pub mod raw;
pub mod scorer;
pub mod store;

#[cfg(all(any(test, feature = "test-support"), feature = "store-sqlite"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use normalise::normalise;
pub use place::{OpeningHours, Place};
pub use query::{PageRequest, Query, RankingMode, RequestValidationError, ResultLimit};
pub use raw::RawPlace;
pub use scorer::Scorer;
pub use store::{FetchWindow, MemoryPlaceRepository, PlaceDumpError, PlaceFilter, PlaceRepository};
#[cfg(feature = "store-sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
pub use store::{SqlitePlaceRepository, SqlitePlaceRepositoryError};
