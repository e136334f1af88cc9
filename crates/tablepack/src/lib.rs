//! Compact self-describing binary codec for dynamically-typed script
//! values: booleans, numbers, strings, byte buffers, and tables with an
//! array part and a hash part.
//!
//! Three compression levels share one decode path:
//!
//! - **Level 1** — structural encoding with minimal-width scalars.
//! - **Level 2** — level 1 plus a string pool: repeated strings and keys
//!   become small back-references, with the pool reconstructed from the
//!   stream itself on decode.
//! - **Level 3** — the level-2 body wrapped in an LZSS entropy stage.
//!
//! [`decompress`] detects whichever level produced a payload from its
//! header byte.
//!
//! ```
//! use tablepack::{compress, decompress, Level, Table, Value};
//!
//! let mut t = Table::new();
//! t.push(Value::Int(42));
//! t.insert(Value::Str("name".into()), Value::Str("probe".into()));
//!
//! let payload = compress(&Value::Table(t.clone()), Level::Two).unwrap();
//! assert_eq!(decompress(&payload).unwrap(), Value::Table(t));
//! ```

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod export;
pub mod json;
pub mod lz;
mod pool;
pub mod random;
pub mod value;

pub use decoder::{Decoder, DecoderOptions};
pub use encoder::{Encoder, EncoderOptions};
pub use error::{DecodeError, EncodeError};
pub use value::{Table, Value};

/// Compression level, selected per [`compress`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Structural encoding only; every string inline.
    One,
    /// Structural encoding plus the string pool.
    Two,
    /// Level 2 wrapped in the entropy stage when that pays off.
    Three,
}

impl TryFrom<u8> for Level {
    type Error = EncodeError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Level::One),
            2 => Ok(Level::Two),
            3 => Ok(Level::Three),
            _ => Err(EncodeError::UnsupportedType("level must be 1, 2, or 3")),
        }
    }
}

/// Compresses `value` into a self-describing payload.
pub fn compress(value: &Value, level: Level) -> Result<Vec<u8>, EncodeError> {
    Encoder::new().encode(value, level)
}

/// Recovers the value a payload was compressed from.
pub fn decompress(bytes: &[u8]) -> Result<Value, DecodeError> {
    Decoder::new().decode(bytes)
}
