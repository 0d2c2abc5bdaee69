//! Whole-file zstd adapter.
//!
//! Operates below the record layer: both directions stream an entire file
//! through the codec and make no assumptions about what the bytes are.
//! `compress` writes `<path>.zst` next to the source; `decompress` strips
//! the suffix back off. Neither touches its input file — deleting the
//! intermediate artifact is the caller's business.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{ArchiveError, Result};

/// Suffix appended to compressed archives.
pub const COMPRESSED_EXT: &str = "zst";
/// Fixed encoder level for every compression pass.
pub const COMPRESSION_LEVEL: i32 = 9;

/// Compress `path` into `<path>.zst` at [`COMPRESSION_LEVEL`].
///
/// Refuses to run if the target already exists. Returns the compressed
/// path.
pub fn compress(path: &Path) -> Result<PathBuf> {
    let target = compressed_name(path);

    let source = File::open(path)
        .map_err(|e| ArchiveError::Open { path: path.to_owned(), source: e })?;
    let dest = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
        .map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                ArchiveError::AlreadyExists(target.clone())
            } else {
                ArchiveError::Open { path: target.clone(), source: e }
            }
        })?;

    let mut writer = BufWriter::new(dest);
    zstd::stream::copy_encode(BufReader::new(source), &mut writer, COMPRESSION_LEVEL)
        .map_err(|e| ArchiveError::Codec { path: path.to_owned(), source: e })?;
    writer
        .flush()
        .map_err(|e| ArchiveError::Write { path: target.clone(), source: e })?;

    Ok(target)
}

/// Decompress `<path>.zst` into `<path>`.
///
/// The input must carry the `.zst` suffix. Returns the plain path.
pub fn decompress(path: &Path) -> Result<PathBuf> {
    let target = plain_name(path).ok_or_else(|| ArchiveError::Codec {
        path: path.to_owned(),
        source: io::Error::new(
            ErrorKind::InvalidInput,
            format!("missing .{COMPRESSED_EXT} suffix"),
        ),
    })?;

    let source = File::open(path)
        .map_err(|e| ArchiveError::Open { path: path.to_owned(), source: e })?;
    let dest = File::create(&target)
        .map_err(|e| ArchiveError::Open { path: target.clone(), source: e })?;

    let mut writer = BufWriter::new(dest);
    zstd::stream::copy_decode(BufReader::new(source), &mut writer)
        .map_err(|e| ArchiveError::Codec { path: path.to_owned(), source: e })?;
    writer
        .flush()
        .map_err(|e| ArchiveError::Write { path: target.clone(), source: e })?;

    Ok(target)
}

/// `archive.spk` → `archive.spk.zst` (suffix appended, never substituted).
fn compressed_name(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(COMPRESSED_EXT);
    PathBuf::from(name)
}

/// `archive.spk.zst` → `archive.spk`, or `None` without the suffix.
fn plain_name(path: &Path) -> Option<PathBuf> {
    let name = path.to_string_lossy();
    let stripped = name.strip_suffix(&format!(".{COMPRESSED_EXT}"))?;
    if stripped.is_empty() {
        return None;
    }
    Some(PathBuf::from(stripped))
}
