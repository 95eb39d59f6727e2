//! Error types for settings loading, saving, and validation.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error, Clone)]
/// Errors produced while loading, saving, or validating settings.
pub enum Error {
    #[error("{message}")]
    /// I/O or filesystem read error.
    Read {
        /// Optional path associated with the read error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// The settings file is not valid JSON or has the wrong shape.
    Parse {
        /// Optional path associated with the parse error.
        path: Option<PathBuf>,
        /// 1-based line number.
        line: usize,
        /// 1-based column number.
        col: usize,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// Encoding or filesystem write error.
    Write {
        /// Optional path associated with the write error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// A value was well-formed but not acceptable (e.g. a bad modifier spec).
    Validation {
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Render a human-friendly error message including location when available.
    pub fn pretty(&self) -> String {
        match self {
            Self::Read { path, message } => match path {
                Some(p) => format!("Read error at {}: {}", p.display(), message),
                None => format!("Read error: {}", message),
            },
            Self::Parse {
                path,
                line,
                col,
                message,
            } => match path {
                Some(p) => format!(
                    "Settings parse error at {}:{}:{}\n{}",
                    p.display(),
                    line,
                    col,
                    message
                ),
                None => format!(
                    "Settings parse error at line {}, column {}\n{}",
                    line, col, message
                ),
            },
            Self::Write { path, message } => match path {
                Some(p) => format!("Write error at {}: {}", p.display(), message),
                None => format!("Write error: {}", message),
            },
            Self::Validation { message } => format!("Invalid setting: {}", message),
        }
    }

    /// Access the optional path attached to this error.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Write { path, .. } => {
                path.as_deref()
            }
            Self::Validation { .. } => None,
        }
    }

    /// Build a parse error from a serde_json failure.
    pub(crate) fn from_json(path: Option<&Path>, e: &serde_json::Error) -> Self {
        Self::Parse {
            path: path.map(Path::to_path_buf),
            line: e.line(),
            col: e.column(),
            message: e.to_string(),
        }
    }
}
