//! Ranking orchestration for the cityguide engine.
//!
//! [`Ranker`] pulls a bounded candidate pool from any
//! [`PlaceRepository`](cityguide_core::PlaceRepository), normalises each
//! record, and combines the scorers that apply to the query's
//! [`RankingMode`](cityguide_core::RankingMode):
//!
//! | Mode      | Pool                     | Score                       |
//! |-----------|--------------------------|-----------------------------|
//! | Listing   | one page, name order     | none                        |
//! | Search    | up to 500, name order    | text relevance              |
//! | Recommend | up to 800, name order    | proximity + tag affinity    |
//!
//! Scored results are sorted by score descending with ties kept in name
//! order. The ranker also selects chat context: places mentioning a keyword
//! of the message, or a random sample when nothing matches.
//!
//! The engine holds no per-request state; one `Ranker` can serve concurrent
//! requests when its repository can.
//!
//! # Examples
//!
//! ```
//! use cityguide_core::{MemoryPlaceRepository, Query, RawPlace};
//! use cityguide_ranker::Ranker;
//!
//! let repository = MemoryPlaceRepository::with_places([
//!     RawPlace::default()
//!         .with("id", "a")
//!         .with("name", "Victoria Memorial")
//!         .with("category", "monument")
//!         .with("lat", 22.545)
//!         .with("lng", 88.342),
//!     RawPlace::default()
//!         .with("id", "b")
//!         .with("name", "Park Street")
//!         .with("category", "food")
//!         .with("lat", 22.552)
//!         .with("lng", 88.352),
//! ]);
//! let ranker = Ranker::new(repository);
//!
//! let found = ranker.search_places(&Query::text("victoria"));
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].place.name, "Victoria Memorial");
//! ```

#![forbid(unsafe_code)]

mod chat;
mod config;
mod error;
mod ranker;
mod result;

pub use config::RankerConfig;
pub use error::RankError;
pub use ranker::Ranker;
pub use result::{PlacePage, RankedPlace, Ranking};
