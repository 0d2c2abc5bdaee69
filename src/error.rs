//! Crate-wide error taxonomy.
//!
//! Every operation fails fast: the first error aborts the call and
//! propagates unchanged to the caller. The CLI collapses all of these to a
//! single message + non-zero exit; the variants exist so library callers
//! and tests can tell the failure modes apart.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::record::MAX_NAME_LEN;

#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Absolute input paths are rejected before any record is written.
    #[error("absolute paths are not allowed: {}", .0.display())]
    AbsolutePath(PathBuf),

    /// Existing files are never overwritten by build or compress.
    #[error("refusing to overwrite existing file: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// The name field is fixed-width; a longer name cannot be stored.
    #[error("entry name exceeds {MAX_NAME_LEN} bytes: {0}")]
    NameTooLong(String),

    #[error("failed to open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to stat {}: {source}", .path.display())]
    Stat { path: PathBuf, source: io::Error },

    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("seek failed in {}: {source}", .path.display())]
    Seek { path: PathBuf, source: io::Error },

    /// Short or invalid header read, or a declared payload size that runs
    /// past end-of-file.
    #[error("corrupt archive: {0}")]
    Corrupt(String),

    #[error("codec failure on {}: {source}", .path.display())]
    Codec { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
