//! Wire protocol shared between the nled TCP server and any client.
//!
//! Every multi-byte integer on the wire is a signed 32-bit big-endian
//! (network byte order) value. Byte payloads (panel RGB data) are sent raw,
//! with no length prefix: their length is implicit from the panel
//! geometry a prior `GetConfig` call already reported.

use std::io::{self, Read, Write};

use thiserror::Error;

/// Command ids as they appear on the wire. Fixed, never renumbered.
pub mod command {
    pub const GET_CONFIG: i32 = 0;
    pub const DRAW_PANEL: i32 = 1;
    pub const DRAW_ALL: i32 = 2;
    pub const FLUSH: i32 = 3;
    pub const SET_DEBUG_MODE: i32 = 4;
}

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ProtoError>;

/// Reads a single big-endian `i32` from `reader`.
///
/// A clean EOF on the very first byte is reported as
/// `io::ErrorKind::UnexpectedEof`, same as `Read::read_exact`; callers that
/// need to distinguish "no more commands" from "error mid-command" should
/// match on that via [`is_clean_eof`].
pub fn read_i32<R: Read>(reader: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

/// Writes a single big-endian `i32` to `writer`.
pub fn write_i32<W: Write>(writer: &mut W, value: i32) -> Result<()> {
    writer.write_all(&value.to_be_bytes())?;
    Ok(())
}

/// Reads exactly `buf.len()` raw bytes with no framing.
pub fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf)?;
    Ok(())
}

/// Writes `buf` verbatim with no framing.
pub fn write_all<W: Write>(writer: &mut W, buf: &[u8]) -> Result<()> {
    writer.write_all(buf)?;
    Ok(())
}

/// True when `err` is the I/O error kind produced by a clean peer
/// disconnect at a command boundary.
pub fn is_clean_eof(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::UnexpectedEof
}

#[cfg(test)]
use quickcheck_macros::quickcheck;
