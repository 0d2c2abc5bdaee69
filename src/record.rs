//! Record header encode/decode — the on-disk contract.
//!
//! An archive is a flat concatenation of records with no superblock, no
//! index, and no trailing marker. Each record is:
//!
//! ```text
//! name:    256 bytes, zero-padded relative path
//! size:    8 bytes, u64 big-endian payload length
//! payload: `size` raw bytes
//! ```
//!
//! End-of-archive is a clean EOF while reading a name field. A short read
//! anywhere else is corruption.
//!
//! # Endianness
//! The size field is strictly big-endian. No runtime negotiation is ever
//! performed.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, ErrorKind, Read, Write};

/// Width of the fixed name field.
pub const NAME_FIELD_LEN: usize = 256;
/// Longest storable name. One byte shorter than the field so a stored name
/// always carries at least one zero pad byte.
pub const MAX_NAME_LEN: usize = 255;
/// Width of the size field.
pub const SIZE_FIELD_LEN: usize = 8;
/// Total header width preceding every payload.
pub const HEADER_LEN: usize = NAME_FIELD_LEN + SIZE_FIELD_LEN;

/// One record's header: the stored relative path and the payload length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    pub name: String,
    pub size: u64,
}

impl RecordHeader {
    /// Validates the name against the format invariants: at most
    /// [`MAX_NAME_LEN`] bytes, non-empty, and not starting with a path
    /// separator.
    pub fn new(name: &str, size: u64) -> io::Result<Self> {
        if name.is_empty() {
            return Err(io::Error::new(ErrorKind::InvalidInput, "empty record name"));
        }
        if name.starts_with('/') || name.starts_with('\\') {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("record name must be relative: {name}"),
            ));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("record name exceeds {MAX_NAME_LEN} bytes: {name}"),
            ));
        }
        Ok(Self { name: name.to_owned(), size })
    }

    /// Write the fixed-width header: the zero-padded name field followed by
    /// the big-endian size field.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let mut name_field = [0u8; NAME_FIELD_LEN];
        name_field[..self.name.len()].copy_from_slice(self.name.as_bytes());
        writer.write_all(&name_field)?;
        writer.write_u64::<BigEndian>(self.size)?;
        Ok(())
    }

    /// Read one header.
    ///
    /// Returns `Ok(None)` on a clean EOF at the start of the name field —
    /// the only valid end of an archive. A partial name field or a short
    /// size field yields `ErrorKind::InvalidData`.
    pub fn read<R: Read>(mut reader: R) -> io::Result<Option<Self>> {
        let name_field = match read_name_field(&mut reader)? {
            Some(field) => field,
            None => return Ok(None),
        };
        let size = reader.read_u64::<BigEndian>().map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                io::Error::new(ErrorKind::InvalidData, "truncated size field")
            } else {
                e
            }
        })?;
        Ok(Some(Self { name: trim_name(&name_field), size }))
    }
}

/// Fill a whole name field, distinguishing "no bytes at all" (end of
/// archive, `None`) from a partial field (`InvalidData`).
fn read_name_field<R: Read>(reader: &mut R) -> io::Result<Option<[u8; NAME_FIELD_LEN]>> {
    let mut field = [0u8; NAME_FIELD_LEN];
    let mut filled = 0;
    while filled < NAME_FIELD_LEN {
        match reader.read(&mut field[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("truncated name field ({filled} of {NAME_FIELD_LEN} bytes)"),
                ))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(Some(field))
}

/// Recover the stored path from a name field by trimming trailing zero
/// padding. Non-UTF-8 bytes are decoded lossily.
fn trim_name(field: &[u8; NAME_FIELD_LEN]) -> String {
    let end = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&field[..end]).into_owned()
}
