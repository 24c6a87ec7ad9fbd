//! Canonical place records consumed by every scorer.
//!
//! A [`Place`] is produced once per request by
//! [`normalise`](crate::normalise::normalise) and never mutated by the
//! ranking code afterwards.

use geo::Coord;
use serde_json::Value;

/// Opening hours surfaced exactly as stored.
///
/// Stored text that decodes to a JSON array or object is kept as structured
/// data; anything else stays free text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum OpeningHours {
    /// Decoded JSON array or object.
    Structured(Value),
    /// Free text that did not decode to an array or object.
    Text(String),
}

/// A point of interest in the directory.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Missing or
/// malformed coordinates are stored as `0.0`, never as an absent value.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use cityguide_core::Place;
///
/// let place = Place::new("21vm", "Victoria Memorial", "monument", Coord { x: 88.342, y: 22.545 })
///     .with_tags(["heritage", "museum"]);
///
/// assert_eq!(place.latitude(), 22.545);
/// assert_eq!(place.tags, vec!["heritage".to_owned(), "museum".to_owned()]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Place {
    /// Externally assigned identifier; the join key for the image relation.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Primary category.
    pub category: String,
    /// Optional finer-grained category.
    pub subcategory: Option<String>,
    /// Long-form description.
    pub description: String,
    /// Historical background.
    pub history: String,
    /// Local tips for visitors.
    pub personal_tips: String,
    /// Geospatial position.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "coordinate", serialize_with = "serialize_location")
    )]
    pub location: Coord<f64>,
    /// Opening hours, when any were stored.
    pub opening_hours: Option<OpeningHours>,
    /// Free-text price information.
    pub price: String,
    /// Free-text advice on when to visit.
    pub best_time: String,
    /// Free-text notes on past events.
    pub past_events: String,
    /// Nearby recommendations, decoded entries or plain-text items.
    pub nearby_recommendations: Vec<Value>,
    /// Ordered tags; duplicates are preserved.
    pub tags: Vec<String>,
    /// Primary image URL, or empty when the place has no images.
    pub image: String,
    /// Ordered image URLs.
    pub images: Vec<String>,
    /// Where the record was sourced from.
    pub source_url: String,
}

impl Place {
    /// Construct a place with the identifying fields set and every other
    /// field empty.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        location: Coord<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            subcategory: None,
            description: String::new(),
            history: String::new(),
            personal_tips: String::new(),
            location,
            opening_hours: None,
            price: String::new(),
            best_time: String::new(),
            past_events: String::new(),
            nearby_recommendations: Vec::new(),
            tags: Vec::new(),
            image: String::new(),
            images: Vec::new(),
            source_url: String::new(),
        }
    }

    /// Replace the tag list while returning `self` for chaining.
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the subcategory while returning `self` for chaining.
    #[must_use]
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    /// Set the description while returning `self` for chaining.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }

    /// Primary image, if the place has one.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        Some(self.image.as_str()).filter(|image| !image.is_empty())
    }
}

#[cfg(feature = "serde")]
fn serialize_location<S>(location: &Coord<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeStruct;

    let mut state = serializer.serialize_struct("Coordinate", 2)?;
    state.serialize_field("lat", &location.y)?;
    state.serialize_field("lng", &location.x)?;
    state.end()
}
