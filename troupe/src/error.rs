//! Error types for the troupe crate.

use thiserror::Error;

/// Errors from persona, world, and extraction operations.
#[derive(Debug, Error)]
pub enum TroupeError {
    #[error("Claude API error: {0}")]
    Model(#[from] claude::Error),

    #[error("Language model returned an empty response")]
    EmptyResponse,
}
