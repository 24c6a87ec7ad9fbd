//! Fixtures shared by unit and behaviour tests across the workspace.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::Path;

use rusqlite::{Connection, params_from_iter, types::Value as SqlValue};
use serde_json::Value;

use crate::RawPlace;

/// Columns of the canonical `places` table, in declaration order.
pub const PLACE_COLUMNS: [&str; 18] = [
    "id",
    "name",
    "category",
    "subcategory",
    "description",
    "history",
    "nearby_recommendations",
    "personal_tips",
    "lat",
    "lng",
    "opening_hours",
    "price",
    "best_time",
    "past_events",
    "sentiment_tags",
    "source_url",
    "image",
    "image_urls",
];

const SCHEMA: &str = "
    CREATE TABLE places (
        id TEXT PRIMARY KEY,
        name TEXT,
        category TEXT,
        subcategory TEXT,
        description TEXT,
        history TEXT,
        nearby_recommendations TEXT,
        personal_tips TEXT,
        lat REAL,
        lng REAL,
        opening_hours TEXT,
        price TEXT,
        best_time TEXT,
        past_events TEXT,
        sentiment_tags TEXT,
        source_url TEXT,
        image TEXT,
        image_urls TEXT
    );
    CREATE TABLE place_images (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        place_id TEXT NOT NULL,
        url TEXT NOT NULL,
        sort_order INTEGER
    );
";

/// Persist `places` and their related `images` to a new SQLite database at
/// `path`.
///
/// Only fields named after [`PLACE_COLUMNS`] are written; JSON arrays and
/// objects are stored as encoded text, mirroring how exports land in the
/// table. Images are stored with `sort_order` following list order.
///
/// # Errors
/// Returns any `rusqlite` failure raised while creating or filling the
/// tables.
pub fn write_sqlite_database<S: BuildHasher>(
    path: &Path,
    places: &[RawPlace],
    images: &HashMap<String, Vec<String>, S>,
) -> Result<(), rusqlite::Error> {
    let mut connection = Connection::open(path)?;
    connection.execute_batch(SCHEMA)?;
    let transaction = connection.transaction()?;
    {
        let placeholders = vec!["?"; PLACE_COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT INTO places ({}) VALUES ({placeholders})",
            PLACE_COLUMNS.join(", ")
        );
        let mut insert_place = transaction.prepare(&sql)?;
        for place in places {
            let values = PLACE_COLUMNS
                .iter()
                .map(|column| sql_value(place.get(column)));
            insert_place.execute(params_from_iter(values))?;
        }

        let mut insert_image = transaction
            .prepare("INSERT INTO place_images (place_id, url, sort_order) VALUES (?1, ?2, ?3)")?;
        for (place_id, urls) in images {
            for (order, url) in urls.iter().enumerate() {
                let sort_order = i64::try_from(order).unwrap_or(i64::MAX);
                insert_image.execute((place_id, url, sort_order))?;
            }
        }
    }
    transaction.commit()
}

fn sql_value(value: Option<&Value>) -> SqlValue {
    match value {
        None | Some(Value::Null) => SqlValue::Null,
        Some(Value::Bool(flag)) => SqlValue::Integer(i64::from(*flag)),
        Some(Value::Number(number)) => number.as_i64().map_or_else(
            || SqlValue::Real(number.as_f64().unwrap_or_default()),
            SqlValue::Integer,
        ),
        Some(Value::String(text)) => SqlValue::Text(text.clone()),
        Some(structured @ (Value::Array(_) | Value::Object(_))) => {
            SqlValue::Text(structured.to_string())
        }
    }
}
