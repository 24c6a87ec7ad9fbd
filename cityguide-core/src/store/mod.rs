//! Data access traits for stored places.
//!
//! The `PlaceRepository` trait is the read-only collaborator the ranking
//! engine pulls candidates from. Implementations return loosely typed
//! [`RawPlace`] records; turning them into [`Place`](crate::Place) values is
//! the normaliser's job.

use crate::raw::{RawPlace, keys};

mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::{MemoryPlaceRepository, PlaceDumpError};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqlitePlaceRepository, SqlitePlaceRepositoryError};

/// Category filters applied when fetching candidates.
///
/// Both filters are case-insensitive substring matches, folding case with
/// [`str::to_lowercase`] in every repository, so non-ASCII letters match
/// regardless of case. Blank filters are ignored. `category` matches the stored category, subcategory or raw tag
/// text; `subcategory` matches only the stored subcategory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceFilter {
    /// Substring matched against category, subcategory and tags.
    pub category: Option<String>,
    /// Substring matched against subcategory.
    pub subcategory: Option<String>,
}

impl PlaceFilter {
    /// The category filter, if non-blank.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        active(self.category.as_deref())
    }

    /// The subcategory filter, if non-blank.
    #[must_use]
    pub fn subcategory(&self) -> Option<&str> {
        active(self.subcategory.as_deref())
    }

    /// Whether `raw` passes both filters.
    ///
    /// # Examples
    /// ```
    /// use cityguide_core::{PlaceFilter, RawPlace};
    ///
    /// let raw = RawPlace::default()
    ///     .with("category", "Heritage")
    ///     .with("sentiment_tags", "river, Food");
    /// let filter = PlaceFilter { category: Some("food".into()), subcategory: None };
    /// assert!(filter.matches(&raw));
    /// ```
    #[must_use]
    pub fn matches(&self, raw: &RawPlace) -> bool {
        let category_ok = self.category().is_none_or(|needle| {
            [keys::CATEGORY, keys::SUBCATEGORY, keys::TAGS]
                .iter()
                .any(|candidates| contains_folded(&raw.text(candidates), needle))
        });
        let subcategory_ok = self
            .subcategory()
            .is_none_or(|needle| contains_folded(&raw.text(keys::SUBCATEGORY), needle));
        category_ok && subcategory_ok
    }
}

fn active(filter: Option<&str>) -> Option<&str> {
    filter.map(str::trim).filter(|text| !text.is_empty())
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A slice of the name-ordered candidate sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    /// Rows to skip.
    pub offset: usize,
    /// Maximum rows to return.
    pub limit: usize,
}

impl FetchWindow {
    /// The first `limit` rows.
    #[must_use]
    pub const fn first(limit: usize) -> Self {
        Self { offset: 0, limit }
    }

    /// The rows covered by a listing page.
    #[must_use]
    pub const fn page(page: crate::PageRequest) -> Self {
        Self {
            offset: page.offset(),
            limit: page.page_size(),
        }
    }
}

/// Read-only access to stored places.
///
/// Implementations must support concurrent reads. Results from
/// [`fetch_by_filter`](Self::fetch_by_filter) are ordered by name ascending;
/// rows sharing a name keep their storage order.
///
/// # Examples
///
/// ```rust
/// use std::convert::Infallible;
/// use cityguide_core::{FetchWindow, PlaceFilter, PlaceRepository, RawPlace};
///
/// struct Fixed(Vec<RawPlace>);
///
/// impl PlaceRepository for Fixed {
///     type Error = Infallible;
///
///     fn fetch_by_filter(
///         &self,
///         filter: &PlaceFilter,
///         window: FetchWindow,
///     ) -> Result<Vec<RawPlace>, Self::Error> {
///         Ok(self
///             .0
///             .iter()
///             .filter(|raw| filter.matches(raw))
///             .skip(window.offset)
///             .take(window.limit)
///             .cloned()
///             .collect())
///     }
///
///     fn fetch_images(&self, _place_id: &str) -> Result<Vec<String>, Self::Error> {
///         Ok(Vec::new())
///     }
///
///     fn count_by_filter(&self, filter: &PlaceFilter) -> Result<usize, Self::Error> {
///         Ok(self.0.iter().filter(|raw| filter.matches(raw)).count())
///     }
/// }
///
/// let repo = Fixed(vec![RawPlace::default().with("name", "Dakshineswar")]);
/// let rows = repo.fetch_by_filter(&PlaceFilter::default(), FetchWindow::first(10)).unwrap();
/// assert_eq!(rows.len(), 1);
/// ```
pub trait PlaceRepository: Send + Sync {
    /// Failure raised by the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Return the rows passing `filter`, ordered by name, within `window`.
    ///
    /// # Errors
    /// Returns the backing store's error when the read fails.
    fn fetch_by_filter(
        &self,
        filter: &PlaceFilter,
        window: FetchWindow,
    ) -> Result<Vec<RawPlace>, Self::Error>;

    /// Return the ordered image URLs related to `place_id`.
    ///
    /// # Errors
    /// Returns the backing store's error when the read fails.
    fn fetch_images(&self, place_id: &str) -> Result<Vec<String>, Self::Error>;

    /// Count the rows passing `filter`.
    ///
    /// # Errors
    /// Returns the backing store's error when the read fails.
    fn count_by_filter(&self, filter: &PlaceFilter) -> Result<usize, Self::Error>;
}
