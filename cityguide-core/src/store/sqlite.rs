//! SQLite-backed repository for persisted places.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use log::debug;
use rusqlite::{
    Connection, OpenFlags, Row,
    functions::{Context, FunctionFlags},
    params_from_iter,
    types::{Value as SqlValue, ValueRef},
};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::{FetchWindow, PlaceFilter, PlaceRepository};
use crate::RawPlace;
use crate::raw::keys;

/// SQL function lowercasing text with full Unicode case folding.
const FOLD_CASE: &str = "cityguide_fold_case";

/// Error raised when reading persisted places.
#[derive(Debug, Error)]
pub enum SqlitePlaceRepositoryError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A statement failed to prepare or execute.
    #[error("failed to {operation}: {source}")]
    Query {
        /// What the repository was doing.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A previous reader panicked while holding the connection.
    #[error("SQLite connection lock was poisoned")]
    ConnectionPoisoned,
    /// `COUNT(*)` returned a value that does not fit in `usize`.
    #[error("row count {count} is out of range")]
    CountOutOfRange {
        /// Count reported by SQLite.
        count: i64,
    },
}

/// Read-only repository over a `places` table and an optional
/// `place_images` relation.
///
/// Rows are converted column by column into [`RawPlace`] records, so any
/// column layout the normaliser understands is accepted. Filters read the
/// first non-null column among the spellings the table actually has, the
/// same way [`PlaceFilter::matches`] reads a record; a filter on an
/// attribute the table lacks matches nothing.
pub struct SqlitePlaceRepository {
    connection: Mutex<Connection>,
    layout: ColumnLayout,
    has_image_table: bool,
}

impl fmt::Debug for SqlitePlaceRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlitePlaceRepository")
            .field("layout", &self.layout)
            .field("has_image_table", &self.has_image_table)
            .finish_non_exhaustive()
    }
}

/// SQL expressions for the filterable attributes of the `places` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ColumnLayout {
    name: Option<String>,
    category: Option<String>,
    subcategory: Option<String>,
    tags: Option<String>,
}

impl ColumnLayout {
    fn from_columns(columns: &[String]) -> Self {
        Self {
            name: first_non_null(columns, keys::NAME),
            category: first_non_null(columns, keys::CATEGORY),
            subcategory: first_non_null(columns, keys::SUBCATEGORY),
            tags: first_non_null(columns, keys::TAGS),
        }
    }

    fn order_by(&self) -> String {
        self.name.as_ref().map_or_else(
            || String::from(" ORDER BY rowid ASC"),
            |name| format!(" ORDER BY {name} ASC, rowid ASC"),
        )
    }
}

/// `COALESCE` over the columns of `aliases` present in `columns`, in alias
/// order.
fn first_non_null(columns: &[String], aliases: &[&str]) -> Option<String> {
    let present: Vec<String> = aliases
        .iter()
        .filter(|alias| columns.iter().any(|column| column == *alias))
        .map(|alias| quote_identifier(alias))
        .collect();
    if present.is_empty() {
        None
    } else {
        Some(format!("COALESCE({}, NULL)", present.join(", ")))
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl SqlitePlaceRepository {
    /// Open the database at `path` read-only.
    ///
    /// # Errors
    /// Returns [`SqlitePlaceRepositoryError::OpenDatabase`] when the file
    /// cannot be opened, or a query error when the schema cannot be read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqlitePlaceRepositoryError> {
        let database_path = path.as_ref();
        let connection =
            Connection::open_with_flags(database_path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
                |source| SqlitePlaceRepositoryError::OpenDatabase {
                    path: database_path.to_path_buf(),
                    source,
                },
            )?;
        Self::from_connection(connection)
    }

    /// Wrap an existing connection.
    ///
    /// # Errors
    /// Returns a query error when the schema cannot be inspected.
    pub fn from_connection(connection: Connection) -> Result<Self, SqlitePlaceRepositoryError> {
        connection
            .create_scalar_function(
                FOLD_CASE,
                1,
                FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
                fold_case,
            )
            .map_err(query_error("register case folding"))?;
        let columns = place_columns(&connection)?;
        let layout = ColumnLayout::from_columns(&columns);
        let has_image_table = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'place_images'",
                [],
                |row| row.get::<_, i64>(0),
            )
            .map_err(query_error("inspect schema"))?
            > 0;
        debug!("places columns {columns:?}; image relation present: {has_image_table}");
        Ok(Self {
            connection: Mutex::new(connection),
            layout,
            has_image_table,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqlitePlaceRepositoryError> {
        self.connection
            .lock()
            .map_err(|_| SqlitePlaceRepositoryError::ConnectionPoisoned)
    }
}

impl PlaceRepository for SqlitePlaceRepository {
    type Error = SqlitePlaceRepositoryError;

    fn fetch_by_filter(
        &self,
        filter: &PlaceFilter,
        window: FetchWindow,
    ) -> Result<Vec<RawPlace>, Self::Error> {
        let (clause, mut params) = where_clause(&self.layout, filter);
        params.push(SqlValue::Integer(to_sql_int(window.limit)));
        params.push(SqlValue::Integer(to_sql_int(window.offset)));
        let sql = format!(
            "SELECT * FROM places{clause}{} LIMIT ? OFFSET ?",
            self.layout.order_by()
        );
        debug!("fetching places with `{sql}`");

        let connection = self.lock()?;
        let mut statement = connection
            .prepare(&sql)
            .map_err(query_error("prepare place query"))?;
        let columns: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let mut rows = statement
            .query(params_from_iter(params.iter()))
            .map_err(query_error("fetch places"))?;

        let mut places = Vec::new();
        while let Some(row) = rows.next().map_err(query_error("fetch places"))? {
            places.push(raw_place(&columns, row).map_err(query_error("decode place row"))?);
        }
        debug!("fetched {} places", places.len());
        Ok(places)
    }

    fn fetch_images(&self, place_id: &str) -> Result<Vec<String>, Self::Error> {
        if !self.has_image_table {
            return Ok(Vec::new());
        }
        let connection = self.lock()?;
        let mut statement = connection
            .prepare(
                "SELECT url FROM place_images WHERE place_id = ? \
                 ORDER BY COALESCE(sort_order, 0) ASC, rowid ASC",
            )
            .map_err(query_error("prepare image query"))?;
        let urls = statement
            .query_map([place_id], |row| row.get::<_, Option<String>>(0))
            .map_err(query_error("fetch images"))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_error("fetch images"))?;
        Ok(urls
            .into_iter()
            .flatten()
            .filter(|url| !url.trim().is_empty())
            .collect())
    }

    fn count_by_filter(&self, filter: &PlaceFilter) -> Result<usize, Self::Error> {
        let (clause, params) = where_clause(&self.layout, filter);
        let sql = format!("SELECT COUNT(*) FROM places{clause}");
        let connection = self.lock()?;
        let count: i64 = connection
            .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
            .map_err(query_error("count places"))?;
        usize::try_from(count).map_err(|_| SqlitePlaceRepositoryError::CountOutOfRange { count })
    }
}

fn query_error(
    operation: &'static str,
) -> impl FnOnce(rusqlite::Error) -> SqlitePlaceRepositoryError {
    move |source| SqlitePlaceRepositoryError::Query { operation, source }
}

fn to_sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Column names of the `places` table, in table order.
fn place_columns(connection: &Connection) -> Result<Vec<String>, SqlitePlaceRepositoryError> {
    let mut statement = connection
        .prepare("SELECT name FROM pragma_table_info('places')")
        .map_err(query_error("inspect place columns"))?;
    statement
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(query_error("inspect place columns"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(query_error("inspect place columns"))
}

/// Lowercase a value the way [`str::to_lowercase`] does; SQLite's own
/// `lower()` and `LIKE` only fold ASCII.
fn fold_case(ctx: &Context<'_>) -> rusqlite::Result<Option<String>> {
    Ok(match ctx.get_raw(0) {
        ValueRef::Null => None,
        ValueRef::Integer(int) => Some(int.to_string()),
        ValueRef::Real(real) => Some(real.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).to_lowercase())
        }
    })
}

/// Build a `WHERE` clause and its bound parameters for `filter`.
fn where_clause(layout: &ColumnLayout, filter: &PlaceFilter) -> (String, Vec<SqlValue>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();
    if let Some(category) = filter.category() {
        let alternatives: Vec<String> = [&layout.category, &layout.subcategory, &layout.tags]
            .into_iter()
            .flatten()
            .map(|column| folded_like(column))
            .collect();
        if alternatives.is_empty() {
            conditions.push(String::from("0"));
        } else {
            params.extend(std::iter::repeat_n(
                SqlValue::Text(like_pattern(&category.to_lowercase())),
                alternatives.len(),
            ));
            conditions.push(format!("({})", alternatives.join(" OR ")));
        }
    }
    if let Some(subcategory) = filter.subcategory() {
        match &layout.subcategory {
            Some(column) => {
                conditions.push(folded_like(column));
                params.push(SqlValue::Text(like_pattern(&subcategory.to_lowercase())));
            }
            None => conditions.push(String::from("0")),
        }
    }
    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

fn folded_like(column: &str) -> String {
    format!("{FOLD_CASE}({column}) LIKE ? ESCAPE '\\'")
}

/// Wrap `needle` in `%` after escaping LIKE wildcards.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn raw_place(columns: &[String], row: &Row<'_>) -> Result<RawPlace, rusqlite::Error> {
    let mut fields = Map::new();
    for (index, name) in columns.iter().enumerate() {
        fields.insert(name.clone(), json_value(row.get_ref(index)?));
    }
    Ok(RawPlace::from(fields))
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(int) => Value::from(int),
        ValueRef::Real(real) => Number::from_f64(real).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
