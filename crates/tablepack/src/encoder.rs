//! Value walker and wire emitters for all three compression levels.

use tablepack_buffers::Writer;

use crate::constants::{
    nint_width, uint_size, uint_width, Tag, ENTROPY_VARIANT_LZSS, INT_MAX, INT_MIN, MAX_LENGTH,
};
use crate::error::EncodeError;
use crate::lz;
use crate::pool::StringPool;
use crate::value::{Table, Value};
use crate::Level;

/// Encoder configuration.
#[derive(Debug, Clone, Copy)]
pub struct EncoderOptions {
    /// Maximum table nesting depth before the walker aborts.
    pub max_depth: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

/// Reusable compressor. One instance may serve many [`Encoder::encode`]
/// calls; pool and buffer state is reset per call.
pub struct Encoder {
    pub writer: Writer,
    options: EncoderOptions,
    pool: StringPool,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_options(EncoderOptions::default())
    }

    pub fn with_options(options: EncoderOptions) -> Self {
        Self {
            writer: Writer::new(),
            options,
            pool: StringPool::new(),
        }
    }

    /// Compresses `value` at `level` into a self-describing payload.
    pub fn encode(&mut self, value: &Value, level: Level) -> Result<Vec<u8>, EncodeError> {
        if matches!(value, Value::Nil) {
            return Err(EncodeError::UnsupportedType("nil is not a top-level value"));
        }
        self.pool.clear();
        self.writer.reset();
        match level {
            Level::One | Level::Two => {
                self.writer.u8(header_byte(level));
                if let Err(err) = self.write_value(value, level, 0) {
                    self.writer.flush();
                    return Err(err);
                }
                Ok(self.writer.flush())
            }
            Level::Three => {
                // Frame the level-2 body first, then try the entropy wrap.
                if let Err(err) = self.write_value(value, Level::Two, 0) {
                    self.writer.flush();
                    return Err(err);
                }
                let body = self.writer.flush();
                let packed = lz::compress(&body);
                let wrapped_len = 1 + uint_size(packed.len() as u64) + packed.len();
                if wrapped_len < 1 + body.len() {
                    self.writer.u8(header_byte(Level::Three));
                    self.write_uint(packed.len() as u64);
                    self.writer.buf(&packed);
                } else {
                    // The wrap does not pay for itself; ship the level-2
                    // payload so the output never grows past level 2.
                    self.writer.u8(header_byte(Level::Two));
                    self.writer.buf(&body);
                }
                Ok(self.writer.flush())
            }
        }
    }

    fn write_value(&mut self, value: &Value, level: Level, depth: usize) -> Result<(), EncodeError> {
        match value {
            Value::Nil => Err(EncodeError::UnsupportedType(
                "nil is only valid as a hash-part value",
            )),
            Value::Bool(b) => {
                self.writer
                    .u8(if *b { Tag::True as u8 } else { Tag::False as u8 });
                Ok(())
            }
            Value::Int(i) => self.write_int(*i),
            Value::Float(f) => {
                self.writer.u8f64(Tag::F64 as u8, *f);
                Ok(())
            }
            Value::Str(s) => self.write_str(s, level),
            Value::Bytes(b) => self.write_bytes(b),
            Value::Table(t) => self.write_table(t, level, depth),
        }
    }

    fn write_int(&mut self, int: i64) -> Result<(), EncodeError> {
        if !(INT_MIN..=INT_MAX).contains(&int) {
            return Err(EncodeError::UnsupportedType(
                "integer outside the 52-bit wire range",
            ));
        }
        if int >= 0 {
            self.write_uint(int as u64);
        } else {
            let magnitude = int.unsigned_abs();
            let width = nint_width(magnitude);
            self.writer.u8(Tag::N8 as u8 + (width - 1) as u8);
            self.writer.uint(magnitude, width);
        }
        Ok(())
    }

    /// Emits a tagged unsigned integer at minimal width. Also used for
    /// lengths, counts, and pool indices.
    fn write_uint(&mut self, val: u64) {
        let width = uint_width(val);
        self.writer.u8(Tag::U8 as u8 + (width - 1) as u8);
        self.writer.uint(val, width);
    }

    fn write_str(&mut self, s: &str, level: Level) -> Result<(), EncodeError> {
        let len = s.len() as u64;
        if len > MAX_LENGTH {
            return Err(EncodeError::SizeLimit);
        }
        if level != Level::One {
            if let Some(index) = self.pool.lookup(s) {
                let ref_cost = 1 + uint_size(index);
                let inline_cost = 1 + uint_size(len) + s.len();
                if ref_cost < inline_cost {
                    self.writer.u8(Tag::StrRef as u8);
                    self.write_uint(index);
                    return Ok(());
                }
            }
            self.pool.note_inline(s);
        }
        self.writer.u8(Tag::Str as u8);
        self.write_uint(len);
        self.writer.utf8(s);
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        let len = bytes.len() as u64;
        if len > MAX_LENGTH {
            return Err(EncodeError::SizeLimit);
        }
        self.writer.u8(Tag::Bytes as u8);
        self.write_uint(len);
        self.writer.buf(bytes);
        Ok(())
    }

    fn write_table(&mut self, table: &Table, level: Level, depth: usize) -> Result<(), EncodeError> {
        if depth >= self.options.max_depth {
            return Err(EncodeError::DepthExceeded);
        }
        let n = table.array().len();
        let m = table.hash().len();
        if n as u64 > MAX_LENGTH || m as u64 > MAX_LENGTH {
            return Err(EncodeError::SizeLimit);
        }
        self.writer.u8(Tag::Table as u8);
        self.write_uint(n as u64);
        self.write_uint(m as u64);
        for item in table.array() {
            if matches!(item, Value::Nil) {
                return Err(EncodeError::UnsupportedType(
                    "nil is not a valid array element",
                ));
            }
            self.write_value(item, level, depth + 1)?;
        }
        for (key, value) in table.hash() {
            self.write_key(key, level)?;
            if matches!(value, Value::Nil) {
                self.writer.u8(Tag::Nil as u8);
            } else {
                self.write_value(value, level, depth + 1)?;
            }
        }
        Ok(())
    }

    fn write_key(&mut self, key: &Value, level: Level) -> Result<(), EncodeError> {
        if !key.is_key() {
            return Err(EncodeError::UnsupportedType(
                "table key must be a non-nil scalar",
            ));
        }
        // Keys are scalars, so the depth argument is never consulted.
        self.write_value(key, level, 0)
    }
}

/// Header byte for a payload produced at `level`.
pub(crate) fn header_byte(level: Level) -> u8 {
    match level {
        Level::One => 1,
        Level::Two => 2,
        Level::Three => (ENTROPY_VARIANT_LZSS << 2) | 3,
    }
}
