//! Convert stored records into canonical [`Place`] values.
//!
//! All schema tolerance lives here so that scorers never branch on how a
//! field happened to be stored. Normalisation cannot fail: every decode error
//! degrades to a plain-text fallback.
//!
//! Rules:
//! - Coordinates come from `lat`/`lng` or `latitude`/`longitude`; anything
//!   missing, unparseable or non-finite becomes `0.0`.
//! - Opening hours that decode to a JSON array or object are kept structured;
//!   other non-blank text is kept verbatim; blank or absent values yield
//!   `None`.
//! - Tags and nearby recommendations decode as JSON when possible and are
//!   otherwise split on commas, trimmed, and stripped of empty items.
//! - Images from the image relation win when non-empty; otherwise the
//!   `image_urls` column is decoded like tags. The primary image is the
//!   explicit `image` field, falling back to the first resolved image.

use geo::Coord;
use serde_json::Value;

use crate::place::{OpeningHours, Place};
use crate::raw::{RawPlace, keys, render_text};

/// Build a [`Place`] from a stored record and its related image URLs.
///
/// # Examples
/// ```
/// use cityguide_core::{RawPlace, normalise};
///
/// let raw = RawPlace::default()
///     .with("id", "21park")
///     .with("name", "Park Street")
///     .with("latitude", "22.552")
///     .with("sentiment_tags", "food, nightlife");
/// let place = normalise(&raw, Vec::new());
///
/// assert_eq!(place.latitude(), 22.552);
/// assert_eq!(place.longitude(), 0.0);
/// assert_eq!(place.tags, vec!["food".to_owned(), "nightlife".to_owned()]);
/// ```
#[must_use]
pub fn normalise(raw: &RawPlace, relation_images: Vec<String>) -> Place {
    let images = if relation_images.is_empty() {
        string_sequence(raw.first(keys::IMAGE_LIST))
    } else {
        relation_images
    };
    let image = primary_image(raw, &images);

    Place {
        id: raw.id().unwrap_or_default(),
        name: raw.text(keys::NAME),
        category: raw.text(keys::CATEGORY),
        subcategory: Some(raw.text(keys::SUBCATEGORY)).filter(|text| !text.trim().is_empty()),
        description: raw.text(keys::DESCRIPTION),
        history: raw.text(keys::HISTORY),
        personal_tips: raw.text(keys::PERSONAL_TIPS),
        location: Coord {
            x: coordinate(raw.first(keys::LONGITUDE)),
            y: coordinate(raw.first(keys::LATITUDE)),
        },
        opening_hours: opening_hours(raw.first(keys::OPENING_HOURS)),
        price: raw.text(keys::PRICE),
        best_time: raw.text(keys::BEST_TIME),
        past_events: raw.text(keys::PAST_EVENTS),
        nearby_recommendations: nearby_recommendations(raw.first(keys::NEARBY)),
        tags: string_sequence(raw.first(keys::TAGS)),
        image,
        images,
        source_url: raw.text(keys::SOURCE_URL),
    }
}

fn coordinate(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|degrees| degrees.is_finite()).unwrap_or(0.0)
}

fn opening_hours(value: Option<&Value>) -> Option<OpeningHours> {
    match value? {
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(
            decode_structured(text)
                .map_or_else(|| OpeningHours::Text(text.clone()), OpeningHours::Structured),
        ),
        structured @ (Value::Array(_) | Value::Object(_)) => {
            Some(OpeningHours::Structured(structured.clone()))
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => None,
    }
}

fn nearby_recommendations(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::String(text)) => match decode_structured(text) {
            Some(Value::Array(items)) => items,
            Some(object) => vec![object],
            None => split_list(text).into_iter().map(Value::String).collect(),
        },
        Some(Value::Array(items)) => items.clone(),
        Some(object @ Value::Object(_)) => vec![object.clone()],
        _ => Vec::new(),
    }
}

/// Decode a list-valued field into trimmed, non-empty strings.
fn string_sequence(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => strings_from_items(&items),
            _ => split_list(text),
        },
        Some(Value::Array(items)) => strings_from_items(items),
        _ => Vec::new(),
    }
}

fn strings_from_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| render_text(item).trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn decode_structured(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(|value| value.is_array() || value.is_object())
}

fn primary_image(raw: &RawPlace, images: &[String]) -> String {
    match raw.first(keys::PRIMARY_IMAGE) {
        Some(Value::String(explicit)) if !explicit.trim().is_empty() => explicit.clone(),
        _ => images.first().cloned().unwrap_or_default(),
    }
}
