//! Resolution of the place data source shared by every command.

use std::io::{self, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use cityguide_core::{
    FetchWindow, MemoryPlaceRepository, PlaceFilter, PlaceRepository, RawPlace,
    SqlitePlaceRepository, SqlitePlaceRepositoryError,
};
use log::debug;

use crate::{ARG_DATABASE, ARG_PLACES_JSON, CliError};

/// Where the place records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlaceSource {
    /// A SQLite database with a `places` table.
    Database(Utf8PathBuf),
    /// A JSON array of place objects.
    PlacesJson(Utf8PathBuf),
}

impl PlaceSource {
    /// Pick the single configured source.
    pub(crate) fn resolve(
        database: Option<Utf8PathBuf>,
        places_json: Option<Utf8PathBuf>,
    ) -> Result<Self, CliError> {
        match (database, places_json) {
            (Some(path), None) => Ok(Self::Database(path)),
            (None, Some(path)) => Ok(Self::PlacesJson(path)),
            (Some(_), Some(_)) => Err(CliError::ConflictingSources),
            (None, None) => Err(CliError::MissingSource),
        }
    }

    const fn field(&self) -> &'static str {
        match self {
            Self::Database(_) => ARG_DATABASE,
            Self::PlacesJson(_) => ARG_PLACES_JSON,
        }
    }

    fn path(&self) -> &Utf8Path {
        match self {
            Self::Database(path) | Self::PlacesJson(path) => path,
        }
    }

    /// Check that the source path names an existing regular file.
    pub(crate) fn validate(&self) -> Result<(), CliError> {
        let path = self.path();
        let field = self.field();
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Open the repository backing this source.
    pub(crate) fn open(&self) -> Result<SourceRepository, CliError> {
        match self {
            Self::Database(path) => {
                let repository = SqlitePlaceRepository::open(path.as_std_path())?;
                debug!("opened place database at {path}");
                Ok(SourceRepository::Database(repository))
            }
            Self::PlacesJson(path) => {
                let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(
                    |source| CliError::OpenPlaceDump {
                        path: path.clone(),
                        source,
                    },
                )?;
                let repository = MemoryPlaceRepository::from_json_dump(BufReader::new(file))
                    .map_err(|source| CliError::ParsePlaceDump {
                        path: path.clone(),
                        source,
                    })?;
                debug!("loaded {} places from {path}", repository.len());
                Ok(SourceRepository::PlacesJson(repository))
            }
        }
    }
}

fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "path has no file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Repository over whichever source was configured.
pub(crate) enum SourceRepository {
    /// Read-only SQLite database.
    Database(SqlitePlaceRepository),
    /// In-memory records loaded from a JSON dump.
    PlacesJson(MemoryPlaceRepository),
}

impl PlaceRepository for SourceRepository {
    type Error = SqlitePlaceRepositoryError;

    fn fetch_by_filter(
        &self,
        filter: &PlaceFilter,
        window: FetchWindow,
    ) -> Result<Vec<RawPlace>, Self::Error> {
        match self {
            Self::Database(repository) => repository.fetch_by_filter(filter, window),
            Self::PlacesJson(repository) => repository
                .fetch_by_filter(filter, window)
                .map_err(|never| match never {}),
        }
    }

    fn fetch_images(&self, place_id: &str) -> Result<Vec<String>, Self::Error> {
        match self {
            Self::Database(repository) => repository.fetch_images(place_id),
            Self::PlacesJson(repository) => repository
                .fetch_images(place_id)
                .map_err(|never| match never {}),
        }
    }

    fn count_by_filter(&self, filter: &PlaceFilter) -> Result<usize, Self::Error> {
        match self {
            Self::Database(repository) => repository.count_by_filter(filter),
            Self::PlacesJson(repository) => repository
                .count_by_filter(filter)
                .map_err(|never| match never {}),
        }
    }
}
