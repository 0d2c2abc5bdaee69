//! Path-level operations — the primary embedding surface.
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! // Pack
//! let report = seqpak::build("out.spk".as_ref(), &[PathBuf::from("docs")])?;
//! println!("{} record(s)", report.records);
//!
//! // Inspect without extracting
//! for name in seqpak::list("out.spk".as_ref())? {
//!     println!("{name}");
//! }
//!
//! // Restore
//! seqpak::unpack("out.spk".as_ref(), "restored".as_ref())?;
//! # Ok::<(), seqpak::ArchiveError>(())
//! ```
//!
//! Each operation opens the archive for its own duration only; nothing is
//! shared across calls. All three fail fast: the first error aborts the
//! remaining sequence.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ArchiveError, Result};
use crate::record::{RecordHeader, MAX_NAME_LEN};
use crate::stream::{ArchiveReader, ArchiveWriter};

// ── Outcome reports ──────────────────────────────────────────────────────────

/// Success outcome of [`build`].
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub archive:       PathBuf,
    pub records:       usize,
    pub payload_bytes: u64,
}

/// Success outcome of [`unpack`].
#[derive(Debug, Clone)]
pub struct UnpackReport {
    pub dest:    PathBuf,
    pub records: usize,
}

// ── Builder ──────────────────────────────────────────────────────────────────

/// Pack `inputs` (files, or directories walked recursively) into a new
/// archive at `archive`.
///
/// The target must not exist; an existing file fails with
/// [`ArchiveError::AlreadyExists`] and is left untouched. On any failure
/// after creation the partially written archive is removed before the
/// error propagates, so a failed build leaves no output behind.
pub fn build(archive: &Path, inputs: &[PathBuf]) -> Result<BuildReport> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(archive)
        .map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                ArchiveError::AlreadyExists(archive.to_owned())
            } else {
                ArchiveError::Open { path: archive.to_owned(), source: e }
            }
        })?;

    let mut writer = ArchiveWriter::new(BufWriter::new(file));
    let appended = append_inputs(&mut writer, archive, inputs);

    let finished = appended.and_then(|counts| {
        writer
            .finish()
            .map_err(|e| ArchiveError::Write { path: archive.to_owned(), source: e })?;
        Ok(counts)
    });

    match finished {
        Ok((records, payload_bytes)) => Ok(BuildReport {
            archive: archive.to_owned(),
            records,
            payload_bytes,
        }),
        Err(e) => {
            // Partial archives are never left on disk.
            let _ = fs::remove_file(archive);
            Err(e)
        }
    }
}

fn append_inputs<W: std::io::Write>(
    writer:  &mut ArchiveWriter<W>,
    archive: &Path,
    inputs:  &[PathBuf],
) -> Result<(usize, u64)> {
    for entry in inputs {
        if entry.is_absolute() {
            return Err(ArchiveError::AbsolutePath(entry.clone()));
        }
        let meta = fs::metadata(entry)
            .map_err(|e| ArchiveError::Stat { path: entry.clone(), source: e })?;

        if meta.is_dir() {
            // Iterative walk; directory entries themselves (the root
            // included) emit no record. Entry order is whatever the OS
            // yields — the format does not sort.
            for visited in WalkDir::new(entry) {
                let visited = visited.map_err(|e| ArchiveError::Stat {
                    path: e.path().map(Path::to_owned).unwrap_or_else(|| entry.clone()),
                    source: e.into(),
                })?;
                if visited.file_type().is_file() {
                    append_file(writer, archive, visited.path())?;
                }
            }
        } else {
            append_file(writer, archive, entry)?;
        }
    }
    Ok((writer.records(), writer.payload_bytes()))
}

fn append_file<W: std::io::Write>(
    writer:  &mut ArchiveWriter<W>,
    archive: &Path,
    path:    &Path,
) -> Result<()> {
    let name = path.to_string_lossy();
    if name.len() > MAX_NAME_LEN {
        return Err(ArchiveError::NameTooLong(name.into_owned()));
    }
    let payload = fs::read(path)
        .map_err(|e| ArchiveError::Read { path: path.to_owned(), source: e })?;
    writer
        .append(&name, &payload)
        .map_err(|e| ArchiveError::Write { path: archive.to_owned(), source: e })
}

// ── Scanner ──────────────────────────────────────────────────────────────────

/// List the stored names in record order without reading any payload.
///
/// Payloads are skipped by seeking; a declared size that runs past
/// end-of-file fails with [`ArchiveError::Corrupt`] rather than silently
/// truncating the listing. Re-running on the same file reproduces the
/// same sequence.
pub fn list(archive: &Path) -> Result<Vec<String>> {
    let mut reader = open_reader(archive)?;
    let mut names = Vec::new();

    while let Some(header) = next_header(&mut reader, archive, names.len())? {
        reader.skip_payload(header.size).map_err(|e| match e.kind() {
            ErrorKind::InvalidData => corrupt(names.len(), &e),
            _ => ArchiveError::Seek { path: archive.to_owned(), source: e },
        })?;
        names.push(header.name);
    }
    Ok(names)
}

// ── Unpacker ─────────────────────────────────────────────────────────────────

/// Extract every record under `dest` (empty = current location),
/// recreating intermediate directories and overwriting existing files.
///
/// Fail-fast: the first error aborts the remaining records, and files
/// already written stay on disk.
pub fn unpack(archive: &Path, dest: &Path) -> Result<UnpackReport> {
    let mut reader = open_reader(archive)?;
    let mut records = 0;

    while let Some(header) = next_header(&mut reader, archive, records)? {
        let payload = reader.read_payload(header.size).map_err(|e| match e.kind() {
            ErrorKind::InvalidData => corrupt(records, &e),
            _ => ArchiveError::Read { path: archive.to_owned(), source: e },
        })?;

        let target = dest.join(&header.name);
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ArchiveError::Write { path: parent.to_owned(), source: e })?;
            }
        }
        fs::write(&target, &payload)
            .map_err(|e| ArchiveError::Write { path: target.clone(), source: e })?;
        records += 1;
    }

    Ok(UnpackReport { dest: dest.to_owned(), records })
}

// ── Shared helpers ───────────────────────────────────────────────────────────

fn open_reader(archive: &Path) -> Result<ArchiveReader<BufReader<File>>> {
    let file = File::open(archive)
        .map_err(|e| ArchiveError::Open { path: archive.to_owned(), source: e })?;
    ArchiveReader::new(BufReader::new(file))
        .map_err(|e| ArchiveError::Seek { path: archive.to_owned(), source: e })
}

fn next_header<R: std::io::Read + std::io::Seek>(
    reader:  &mut ArchiveReader<R>,
    archive: &Path,
    index:   usize,
) -> Result<Option<RecordHeader>> {
    reader.next_header().map_err(|e| match e.kind() {
        ErrorKind::InvalidData => corrupt(index, &e),
        _ => ArchiveError::Read { path: archive.to_owned(), source: e },
    })
}

fn corrupt(index: usize, e: &std::io::Error) -> ArchiveError {
    ArchiveError::Corrupt(format!("record {index}: {e}"))
}
