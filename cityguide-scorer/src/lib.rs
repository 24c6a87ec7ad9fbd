//! Scoring signals for the cityguide ranking engine.
//!
//! Each scorer implements [`Scorer`](cityguide_core::Scorer) and reads only
//! the parts of the [`Query`](cityguide_core::Query) it cares about:
//! - [`TextRelevanceScorer`] sums weighted substring signals between the
//!   query text and a place's name, category, tags and description.
//! - [`GeoProximityScorer`] decays linearly from `1.0` at the user's
//!   position to `0.0` at a fixed radius, using great-circle distance.
//! - [`TagAffinityScorer`] adds a fixed bonus per requested tag the place
//!   carries.
//!
//! [`Keywords`] supports the chat context selector: it extracts keywords
//! from a free-form message and tests places for any mention.
//!
//! # Examples
//!
//! ```
//! use geo::Coord;
//! use cityguide_core::{Place, Query, Scorer};
//! use cityguide_scorer::TextRelevanceScorer;
//!
//! let place = Place::new("21vm", "Victoria Memorial", "monument", Coord { x: 88.342, y: 22.545 });
//! let score = TextRelevanceScorer::default().score(&place, &Query::text("victoria"));
//! assert_eq!(score, 100.0);
//! ```

#![forbid(unsafe_code)]

mod keywords;
mod proximity;
mod tags;
mod text;

pub use keywords::Keywords;
pub use proximity::{EARTH_RADIUS_KM, GeoProximityScorer, Proximity, haversine_km};
pub use tags::TagAffinityScorer;
pub use text::{TextRelevanceScorer, TextWeights};
