//! Test helpers for writing place sources to disk.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use cityguide_core::RawPlace;
use cityguide_core::test_support::write_sqlite_database;
use serde_json::json;

pub(super) fn utf8_root(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace")
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write file");
}

fn city() -> Vec<RawPlace> {
    vec![
        RawPlace::default()
            .with("id", "a")
            .with("name", "Victoria Memorial")
            .with("category", "monument")
            .with("lat", 22.545)
            .with("lng", 88.342),
        RawPlace::default()
            .with("id", "b")
            .with("name", "Park Street")
            .with("category", "food")
            .with("sentiment_tags", r#"["food","nightlife"]"#)
            .with("lat", 22.552)
            .with("lng", 88.352),
        RawPlace::default()
            .with("id", "c")
            .with("name", "Howrah Bridge")
            .with("category", "landmark")
            .with("lat", 22.585)
            .with("lng", 88.347),
    ]
}

/// Write the sample city as a JSON dump and return its path.
pub(super) fn write_places_json(root: &Utf8Path) -> Utf8PathBuf {
    let path = root.join("places.json");
    let records: Vec<_> = city()
        .into_iter()
        .map(|place| {
            let fields: serde_json::Map<_, _> = place
                .fields()
                .map(|(key, value)| (key.to_owned(), value.clone()))
                .collect();
            serde_json::Value::Object(fields)
        })
        .collect();
    let payload = serde_json::to_vec(&json!(records)).expect("serialise places");
    write_utf8(&path, &payload);
    path
}

/// Write the sample city as a SQLite database and return its path.
pub(super) fn write_database(root: &Utf8Path) -> Utf8PathBuf {
    let path = root.join("places.db");
    let images = HashMap::from([(
        String::from("a"),
        vec![String::from("https://img/vm-1.jpg")],
    )]);
    write_sqlite_database(path.as_std_path(), &city(), &images).expect("write database");
    path
}
