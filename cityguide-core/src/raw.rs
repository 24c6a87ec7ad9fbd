//! Loosely typed place records as they come out of storage.

use serde_json::{Map, Value};

/// Field spellings accepted for each canonical attribute, in lookup order.
pub(crate) mod keys {
    pub(crate) const ID: &[&str] = &["id", "ID"];
    pub(crate) const NAME: &[&str] = &["name", "Name"];
    pub(crate) const CATEGORY: &[&str] = &["category", "Category", "Category & Subcategory"];
    pub(crate) const SUBCATEGORY: &[&str] = &["subcategory", "Subcategory"];
    pub(crate) const DESCRIPTION: &[&str] = &["description", "Description"];
    pub(crate) const HISTORY: &[&str] = &["history", "History"];
    pub(crate) const PERSONAL_TIPS: &[&str] = &["personal_tips", "Personal Tips"];
    pub(crate) const LATITUDE: &[&str] = &["lat", "latitude", "Latitude"];
    pub(crate) const LONGITUDE: &[&str] = &["lng", "longitude", "Longitude"];
    pub(crate) const OPENING_HOURS: &[&str] = &["opening_hours", "Opening Hours"];
    pub(crate) const PRICE: &[&str] = &["price", "Price"];
    pub(crate) const BEST_TIME: &[&str] = &["best_time", "Best Time"];
    pub(crate) const PAST_EVENTS: &[&str] = &["past_events", "Past Events"];
    pub(crate) const NEARBY: &[&str] = &["nearby_recommendations", "Nearby Recommendations"];
    pub(crate) const TAGS: &[&str] = &["sentiment_tags", "tags", "Sentiment Tags"];
    pub(crate) const SOURCE_URL: &[&str] = &["source_url", "Source URL"];
    pub(crate) const PRIMARY_IMAGE: &[&str] = &["image"];
    pub(crate) const IMAGE_LIST: &[&str] = &["image_urls", "images"];
}

/// A stored place record before normalisation.
///
/// Field names and encodings vary between sources: JSON sub-documents may be
/// stored as text, lists as comma-separated strings, and coordinates under
/// alternate names. [`normalise`](crate::normalise::normalise) resolves all
/// of that into a [`Place`](crate::Place).
///
/// # Examples
/// ```
/// use cityguide_core::RawPlace;
///
/// let raw = RawPlace::default()
///     .with("id", "21howrah")
///     .with("Name", "Howrah Bridge");
/// assert_eq!(raw.id().as_deref(), Some("21howrah"));
/// assert_eq!(raw.name(), "Howrah Bridge");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPlace {
    fields: Map<String, Value>,
}

impl RawPlace {
    /// Wrap a JSON object. Returns `None` for any other JSON value.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Add a field while returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a field by its exact stored name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Iterate over stored fields.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Identifier rendered as a string, if one is stored.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        Some(self.text(keys::ID)).filter(|id| !id.is_empty())
    }

    /// Stored name, or an empty string.
    #[must_use]
    pub fn name(&self) -> String {
        self.text(keys::NAME)
    }

    /// First non-null value among `candidates`.
    pub(crate) fn first(&self, candidates: &[&str]) -> Option<&Value> {
        candidates
            .iter()
            .filter_map(|key| self.fields.get(*key))
            .find(|value| !value.is_null())
    }

    /// Render the first non-null value among `candidates` as text.
    ///
    /// Arrays are joined with commas so list-valued fields read the same as
    /// their comma-separated spelling.
    pub(crate) fn text(&self, candidates: &[&str]) -> String {
        self.first(candidates).map_or_else(String::new, render_text)
    }
}

impl From<Map<String, Value>> for RawPlace {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

pub(crate) fn render_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
    }
}
