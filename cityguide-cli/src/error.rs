//! Error types emitted by the cityguide CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use cityguide_core::{PlaceDumpError, SqlitePlaceRepositoryError};
use cityguide_ranker::RankError;
use thiserror::Error;

/// Errors emitted by the cityguide CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that could supply it.
        env: &'static str,
    },
    /// Neither `--database` nor `--places-json` was given.
    #[error("missing place source (set --database or --places-json)")]
    MissingSource,
    /// Both `--database` and `--places-json` were given.
    #[error("--database and --places-json are mutually exclusive")]
    ConflictingSources,
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// The missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// The offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// The path being inspected.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite place database failed.
    #[error(transparent)]
    OpenDatabase(#[from] SqlitePlaceRepositoryError),
    /// Opening the JSON place dump failed.
    #[error("failed to open place dump at {path:?}: {source}")]
    OpenPlaceDump {
        /// Path to the dump.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The JSON place dump could not be decoded.
    #[error("failed to load place dump at {path:?}: {source}")]
    ParsePlaceDump {
        /// Path to the dump.
        path: Utf8PathBuf,
        /// Decoding failure.
        #[source]
        source: PlaceDumpError,
    },
    /// The ranker rejected the request.
    #[error(transparent)]
    Rank(#[from] RankError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
