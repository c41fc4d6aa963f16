//! Every way a storage operation can fail.

use std::io;
use std::path::PathBuf;

/// Errors surfaced by [`Storage`](crate::Storage) and
/// [`Resource`](crate::Resource).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The OS refused to create, read or write something.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Nothing has been saved under this id.
    #[error("resource {id:?} not found")]
    NotFound { id: String },

    /// Something is on disk, but it can't be parsed.
    #[error("corrupt data at {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("invalid namespace {name:?}: {reason}")]
    InvalidNamespace { name: String, reason: &'static str },

    /// The folder was written by a newer version of this crate.
    #[error("storage at {} has version {found}, only {supported} is supported", .path.display())]
    IncompatibleVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
