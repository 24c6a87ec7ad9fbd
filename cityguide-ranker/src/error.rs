//! Errors surfaced by the ranking orchestrator.

use cityguide_core::RequestValidationError;
use thiserror::Error;

/// Failure to rank a request.
///
/// Repository failures are not errors: they degrade to an empty candidate
/// pool so a ranking call always succeeds once the request is valid.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RankError {
    /// The request lacked or carried invalid inputs for its mode.
    #[error("invalid ranking request: {0}")]
    InvalidRequest(#[from] RequestValidationError),
}
