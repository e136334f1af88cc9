//! Error types for the compress and decompress paths.

use thiserror::Error;

use tablepack_buffers::BufferError;

/// Errors raised while compressing a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The input contains a value the format cannot carry, such as a nil
    /// array element, a nil/table key, or an integer outside the 52-bit
    /// wire range.
    #[error("unsupported value: {0}")]
    UnsupportedType(&'static str),
    /// The value tree is nested deeper than the configured limit.
    #[error("maximum recursion depth exceeded")]
    DepthExceeded,
    /// A string, buffer, or table part count does not fit in 32 bits.
    #[error("length exceeds format limit")]
    SizeLimit,
}

/// Errors raised while decompressing a payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended before the value did.
    #[error("unexpected end of input")]
    Truncated,
    /// An unknown or misplaced tag byte, or a record whose body violates
    /// the format (reserved bits set, invalid string bytes).
    #[error("bad tag byte 0x{0:02x}")]
    BadTag(u8),
    /// A pool reference points past the strings seen so far.
    #[error("string pool index {0} out of range")]
    BadPoolIndex(u64),
    /// The level-3 entropy stream failed its self-check.
    #[error("entropy stream failed to decode")]
    Entropy,
    /// The top-level value ended before the input did.
    #[error("trailing bytes after value")]
    TrailingGarbage,
    /// The payload is nested deeper than the configured limit.
    #[error("maximum recursion depth exceeded")]
    DepthExceeded,
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => DecodeError::Truncated,
            // String bodies are produced from Rust strings, so invalid
            // UTF-8 means the record was corrupted in transit.
            BufferError::InvalidUtf8 => DecodeError::BadTag(0x20),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_error_maps_to_truncated() {
        let err: DecodeError = BufferError::EndOfBuffer.into();
        assert_eq!(err, DecodeError::Truncated);
    }

    #[test]
    fn display_includes_tag_byte() {
        assert_eq!(format!("{}", DecodeError::BadTag(0x7f)), "bad tag byte 0x7f");
    }
}
