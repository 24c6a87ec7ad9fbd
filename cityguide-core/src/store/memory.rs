//! In-memory repository for small corpora, JSON dumps and tests.

use std::collections::HashMap;
use std::convert::Infallible;
use std::io::Read;

use log::debug;
use serde_json::Value;
use thiserror::Error;

use super::{FetchWindow, PlaceFilter, PlaceRepository};
use crate::RawPlace;

/// Error raised when loading a JSON dump of places.
#[derive(Debug, Error)]
pub enum PlaceDumpError {
    /// The dump could not be read or was not valid JSON.
    #[error("failed to decode place dump: {0}")]
    Decode(#[from] serde_json::Error),
    /// The top-level JSON value was not an array.
    #[error("place dump must be a JSON array of objects")]
    NotAnArray,
    /// An array entry was not a JSON object.
    #[error("place dump entry {index} is not a JSON object")]
    EntryNotObject {
        /// Position of the offending entry.
        index: usize,
    },
}

/// `PlaceRepository` holding raw records in insertion order.
///
/// Fetches perform a linear scan followed by a stable sort on name, so rows
/// sharing a name keep their insertion order.
///
/// # Examples
/// ```
/// use cityguide_core::{FetchWindow, MemoryPlaceRepository, PlaceFilter, PlaceRepository, RawPlace};
///
/// let repo = MemoryPlaceRepository::with_places([
///     RawPlace::default().with("id", "b").with("name", "Kalighat"),
///     RawPlace::default().with("id", "a").with("name", "Eden Gardens"),
/// ]);
/// let rows = repo.fetch_by_filter(&PlaceFilter::default(), FetchWindow::first(10))?;
/// assert_eq!(rows[0].name(), "Eden Gardens");
/// # Ok::<(), std::convert::Infallible>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryPlaceRepository {
    places: Vec<RawPlace>,
    images: HashMap<String, Vec<String>>,
}

impl MemoryPlaceRepository {
    /// Create a repository containing a single record.
    #[must_use]
    pub fn with_place(place: RawPlace) -> Self {
        Self::with_places(std::iter::once(place))
    }

    /// Create a repository from a collection of records.
    pub fn with_places<I>(places: I) -> Self
    where
        I: IntoIterator<Item = RawPlace>,
    {
        Self {
            places: places.into_iter().collect(),
            images: HashMap::new(),
        }
    }

    /// Load records from a JSON array of objects.
    ///
    /// Image URLs embedded in the dump stay on the record and are resolved
    /// by the normaliser; the image relation starts empty.
    ///
    /// # Errors
    /// Returns [`PlaceDumpError`] when the input is not a JSON array of
    /// objects.
    pub fn from_json_dump<R: Read>(reader: R) -> Result<Self, PlaceDumpError> {
        let Value::Array(entries) = serde_json::from_reader(reader)? else {
            return Err(PlaceDumpError::NotAnArray);
        };
        let places = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                RawPlace::from_value(entry).ok_or(PlaceDumpError::EntryNotObject { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!("loaded {} places from JSON dump", places.len());
        Ok(Self::with_places(places))
    }

    /// Attach ordered image URLs to `place_id`, replacing any existing list.
    pub fn insert_images<I, S>(&mut self, place_id: impl Into<String>, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images
            .insert(place_id.into(), urls.into_iter().map(Into::into).collect());
    }

    /// Number of stored records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.places.len()
    }

    /// Whether the repository holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    fn matching<'a>(&'a self, filter: &'a PlaceFilter) -> impl Iterator<Item = &'a RawPlace> {
        self.places.iter().filter(move |raw| filter.matches(raw))
    }
}

impl PlaceRepository for MemoryPlaceRepository {
    type Error = Infallible;

    fn fetch_by_filter(
        &self,
        filter: &PlaceFilter,
        window: FetchWindow,
    ) -> Result<Vec<RawPlace>, Self::Error> {
        let mut rows: Vec<(String, &RawPlace)> = self
            .matching(filter)
            .map(|raw| (raw.name(), raw))
            .collect();
        rows.sort_by(|left, right| left.0.cmp(&right.0));
        Ok(rows
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .map(|(_, raw)| raw.clone())
            .collect())
    }

    fn fetch_images(&self, place_id: &str) -> Result<Vec<String>, Self::Error> {
        Ok(self.images.get(place_id).cloned().unwrap_or_default())
    }

    fn count_by_filter(&self, filter: &PlaceFilter) -> Result<usize, Self::Error> {
        Ok(self.matching(filter).count())
    }
}
