//! Per-request ranking input.
//!
//! A [`Query`] carries everything a caller may supply: free text, category
//! and subcategory filters, requested tags, an optional user coordinate and
//! result bounds. The presence of a coordinate or text selects the
//! [`RankingMode`].

use geo::Coord;
use thiserror::Error;

use crate::store::PlaceFilter;

/// Number of results returned by search and recommend, clamped to `1..=100`.
///
/// # Examples
/// ```
/// use cityguide_core::ResultLimit;
///
/// assert_eq!(ResultLimit::new(0).get(), 1);
/// assert_eq!(ResultLimit::new(25).get(), 25);
/// assert_eq!(ResultLimit::new(5_000).get(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultLimit(usize);

impl ResultLimit {
    /// Smallest permitted limit.
    pub const MIN: usize = 1;
    /// Largest permitted limit.
    pub const MAX: usize = 100;
    /// Default limit for search and recommend requests.
    pub const DEFAULT: Self = Self(10);
    /// Default page size for listing requests.
    pub const DEFAULT_PAGE_SIZE: Self = Self(20);

    /// Clamp `requested` into the permitted range.
    #[must_use]
    pub fn new(requested: usize) -> Self {
        Self(requested.clamp(Self::MIN, Self::MAX))
    }

    /// The clamped value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for ResultLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A 1-based page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: ResultLimit,
}

impl PageRequest {
    /// Build a page request. Page `0` is treated as page `1`.
    #[must_use]
    pub fn new(page: usize, page_size: ResultLimit) -> Self {
        Self {
            page: page.max(1),
            page_size,
        }
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(self) -> usize {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn page_size(self) -> usize {
        self.page_size.get()
    }

    /// Rows to skip before the first item of this page.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size.get())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, ResultLimit::DEFAULT_PAGE_SIZE)
    }
}

/// The ranking behaviour selected for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingMode {
    /// Filter and name-ordered pagination; no scoring.
    Listing,
    /// Text relevance ranking.
    Search,
    /// Proximity plus tag affinity ranking around a user coordinate.
    Recommend,
}

/// Rejection of a request before any ranking work is done.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RequestValidationError {
    /// Recommend mode was requested without a user coordinate.
    #[error("recommendations require a user latitude and longitude")]
    MissingCoordinate,
    /// The user coordinate was non-finite or outside WGS84 bounds.
    #[error("user coordinate ({latitude}, {longitude}) is outside the valid range")]
    InvalidCoordinate {
        /// Requested latitude in degrees.
        latitude: f64,
        /// Requested longitude in degrees.
        longitude: f64,
    },
}

/// A ranking request.
///
/// # Examples
/// ```
/// use cityguide_core::{Query, RankingMode};
///
/// let query = Query::text("victoria");
/// assert_eq!(query.mode(), RankingMode::Search);
///
/// let nearby = Query::default().near(22.545, 88.342).with_tags(["Food", "food "]);
/// assert_eq!(nearby.mode(), RankingMode::Recommend);
/// assert_eq!(nearby.tags, vec!["food".to_owned()]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    /// Free text; may be empty.
    pub text: String,
    /// Case-insensitive substring filter on category, subcategory and tags.
    pub category: Option<String>,
    /// Case-insensitive substring filter on subcategory.
    pub subcategory: Option<String>,
    /// Requested tags, lowercased, trimmed and de-duplicated.
    pub tags: Vec<String>,
    /// User coordinate (`x = longitude`, `y = latitude`).
    pub origin: Option<Coord<f64>>,
    /// Result bound for search and recommend.
    pub limit: ResultLimit,
    /// Page bounds for listing.
    pub page: PageRequest,
}

impl Query {
    /// A query carrying only free text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Restrict candidates to a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict candidates to a subcategory.
    #[must_use]
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    /// Set the requested tags.
    ///
    /// Tags are compared as a set, so blank entries and repeats are dropped.
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut normalised: Vec<String> = Vec::new();
        for tag in tags {
            let cleaned = tag.as_ref().trim().to_lowercase();
            if !cleaned.is_empty() && !normalised.contains(&cleaned) {
                normalised.push(cleaned);
            }
        }
        self.tags = normalised;
        self
    }

    /// Rank around the given user coordinate.
    #[must_use]
    pub const fn near(mut self, latitude: f64, longitude: f64) -> Self {
        self.origin = Some(Coord {
            x: longitude,
            y: latitude,
        });
        self
    }

    /// Bound the number of search or recommend results.
    #[must_use]
    pub const fn with_limit(mut self, limit: ResultLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Select a listing page.
    #[must_use]
    pub const fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Select the ranking mode implied by the query.
    ///
    /// A coordinate selects [`RankingMode::Recommend`], non-blank text selects
    /// [`RankingMode::Search`], anything else is a listing.
    #[must_use]
    pub fn mode(&self) -> RankingMode {
        if self.origin.is_some() {
            RankingMode::Recommend
        } else if self.text.trim().is_empty() {
            RankingMode::Listing
        } else {
            RankingMode::Search
        }
    }

    /// Repository filter derived from the category fields.
    #[must_use]
    pub fn filter(&self) -> PlaceFilter {
        PlaceFilter {
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
        }
    }

    /// Check that the query carries the inputs `mode` requires.
    ///
    /// # Errors
    /// Returns [`RequestValidationError::MissingCoordinate`] when recommend
    /// mode has no coordinate, and [`RequestValidationError::InvalidCoordinate`]
    /// when the coordinate is non-finite or out of range.
    pub fn validate_for(&self, mode: RankingMode) -> Result<(), RequestValidationError> {
        if mode != RankingMode::Recommend {
            return Ok(());
        }
        let origin = self
            .origin
            .ok_or(RequestValidationError::MissingCoordinate)?;
        let latitude_ok = origin.y.is_finite() && (-90.0..=90.0).contains(&origin.y);
        let longitude_ok = origin.x.is_finite() && (-180.0..=180.0).contains(&origin.x);
        if latitude_ok && longitude_ok {
            Ok(())
        } else {
            Err(RequestValidationError::InvalidCoordinate {
                latitude: origin.y,
                longitude: origin.x,
            })
        }
    }
}
