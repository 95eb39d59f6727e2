use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the hotswitch engine.
///
/// Lookup misses are not errors; only persistence and external services fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Loading or saving settings failed.
    #[error("Settings error: {0}")]
    Config(#[from] config::Error),

    /// The login item service refused a registration change.
    #[error("Login item update failed: {0}")]
    Login(String),
}
