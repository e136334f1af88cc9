//! Byte-level I/O for the tablepack wire format.
//!
//! Two building blocks live here:
//!
//! - [`Writer`] — an auto-growing binary buffer the encoder writes into.
//! - [`Reader`] — a cursor over a borrowed byte slice with bounds-checked
//!   `try_*` accessors for the decoder.
//!
//! All multi-byte accessors are little-endian, matching the wire format.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Errors surfaced by the bounds-checked [`Reader`] accessors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("read past end of buffer")]
    EndOfBuffer,
    #[error("bytes are not valid utf-8")]
    InvalidUtf8,
}
