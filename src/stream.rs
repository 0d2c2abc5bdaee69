//! Streaming archive engine — writer and reader.
//!
//! # Writer
//! [`ArchiveWriter`] accepts one record at a time and appends
//! `name‖size‖payload` to the underlying stream. Writes are sequential and
//! append-only; there is no random access and nothing to patch afterward.
//!
//! # Reader
//! [`ArchiveReader`] walks the record sequence front to back. The scanner
//! path reads headers and seeks over payloads; the unpacker path reads
//! payloads in full. Every skip and every payload read is bounded against
//! the stream length up front, so a declared size that runs past
//! end-of-file surfaces as `ErrorKind::InvalidData` instead of a silent
//! short result.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};

use crate::record::RecordHeader;

// ── Writer ───────────────────────────────────────────────────────────────────

pub struct ArchiveWriter<W: Write> {
    writer:        W,
    records:       usize,
    payload_bytes: u64,
}

impl<W: Write> ArchiveWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, records: 0, payload_bytes: 0 }
    }

    /// Append one record. The name is validated against the format
    /// invariants by [`RecordHeader::new`].
    pub fn append(&mut self, name: &str, payload: &[u8]) -> io::Result<()> {
        let header = RecordHeader::new(name, payload.len() as u64)?;
        header.write(&mut self.writer)?;
        self.writer.write_all(payload)?;
        self.records += 1;
        self.payload_bytes += payload.len() as u64;
        Ok(())
    }

    /// Records appended so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Payload bytes appended so far (header bytes excluded).
    pub fn payload_bytes(&self) -> u64 {
        self.payload_bytes
    }

    /// Flush and hand back the underlying writer. Must be called once;
    /// dropping without finishing may lose buffered bytes.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

// ── Reader ───────────────────────────────────────────────────────────────────

pub struct ArchiveReader<R: Read + Seek> {
    reader: R,
    len:    u64,
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Measures the stream length once, then rewinds to the first record.
    pub fn new(mut reader: R) -> io::Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self { reader, len })
    }

    /// Read the next record header, or `None` at a clean end of archive.
    pub fn next_header(&mut self) -> io::Result<Option<RecordHeader>> {
        RecordHeader::read(&mut self.reader)
    }

    /// Seek over a payload without reading it.
    pub fn skip_payload(&mut self, size: u64) -> io::Result<()> {
        self.check_remaining(size)?;
        self.reader.seek(SeekFrom::Current(size as i64))?;
        Ok(())
    }

    /// Read a payload in full.
    pub fn read_payload(&mut self, size: u64) -> io::Result<Vec<u8>> {
        self.check_remaining(size)?;
        let mut payload = vec![0u8; size as usize];
        self.reader.read_exact(&mut payload).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                io::Error::new(ErrorKind::InvalidData, "truncated payload")
            } else {
                e
            }
        })?;
        Ok(payload)
    }

    fn check_remaining(&mut self, size: u64) -> io::Result<()> {
        let pos = self.reader.stream_position()?;
        if size > self.len.saturating_sub(pos) {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!(
                    "declared payload size {size} overruns end of archive ({} bytes remain)",
                    self.len.saturating_sub(pos)
                ),
            ));
        }
        Ok(())
    }
}
