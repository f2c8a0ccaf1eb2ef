//! Failure conditions surfaced by a top-level traversal.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a tree could not be produced for a root path.
///
/// Only the root listing can fail; unreadable subdirectories are skipped by
/// the walker and never show up here.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The root path does not exist.
    #[error("{}: path not found", .path.display())]
    PathNotFound { path: PathBuf },

    /// The root path exists but cannot be listed (not a directory,
    /// permission denied, I/O error).
    #[error("{}: cannot list directory: {source}", .path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TreeError {
    /// Path the failure refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            TreeError::PathNotFound { path } | TreeError::Inaccessible { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
