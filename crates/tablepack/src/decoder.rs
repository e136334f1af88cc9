//! Single-path payload reader: detects the producing level from the header
//! byte and reconstructs the value tree.

use tablepack_buffers::Reader;

use crate::constants::{Tag, ENTROPY_VARIANT_LZSS, HEADER_FLAGS_SHIFT, HEADER_LEVEL_MASK};
use crate::error::DecodeError;
use crate::lz;
use crate::value::{Table, Value};

/// Decoder configuration.
#[derive(Debug, Clone, Copy)]
pub struct DecoderOptions {
    /// Maximum table nesting depth before the reader aborts.
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

/// Reusable decompressor. Holds no cross-call state beyond options.
#[derive(Default)]
pub struct Decoder {
    options: DecoderOptions,
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_options(DecoderOptions::default())
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    /// Decompresses a payload produced by any level. The whole input must
    /// be consumed; leftover bytes are an error.
    pub fn decode(&self, input: &[u8]) -> Result<Value, DecodeError> {
        let mut reader = Reader::new(input);
        let header = reader.try_u8()?;
        let level = header & HEADER_LEVEL_MASK;
        let flags = header >> HEADER_FLAGS_SHIFT;
        match level {
            1 | 2 => {
                if flags != 0 {
                    return Err(DecodeError::BadTag(header));
                }
                let value = self.read_body(&mut reader)?;
                if !reader.is_empty() {
                    return Err(DecodeError::TrailingGarbage);
                }
                Ok(value)
            }
            3 => {
                if flags != ENTROPY_VARIANT_LZSS {
                    return Err(DecodeError::BadTag(header));
                }
                let packed_len = read_length(&mut reader)?;
                let packed = reader.try_buf(packed_len)?;
                if !reader.is_empty() {
                    return Err(DecodeError::TrailingGarbage);
                }
                let body = lz::decompress(packed).map_err(|_| DecodeError::Entropy)?;
                let mut inner = Reader::new(&body);
                let value = self.read_body(&mut inner)?;
                if !inner.is_empty() {
                    return Err(DecodeError::TrailingGarbage);
                }
                Ok(value)
            }
            _ => Err(DecodeError::BadTag(header)),
        }
    }

    /// Reads one framed value, rebuilding the string pool from inline
    /// records as it goes.
    fn read_body(&self, reader: &mut Reader) -> Result<Value, DecodeError> {
        let mut pool: Vec<String> = Vec::new();
        self.read_value(reader, &mut pool, 0)
    }

    fn read_value(
        &self,
        reader: &mut Reader,
        pool: &mut Vec<String>,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let tag = reader.try_u8()?;
        match tag {
            t if t == Tag::False as u8 => Ok(Value::Bool(false)),
            t if t == Tag::True as u8 => Ok(Value::Bool(true)),
            t if t == Tag::F64 as u8 => Ok(Value::Float(reader.try_f64()?)),
            t if (Tag::U8 as u8..=Tag::U52 as u8).contains(&t) => {
                let width = (t - Tag::U8 as u8) as usize + 1;
                let magnitude = reader.try_uint(width)?;
                if width == 7 && magnitude >> 52 != 0 {
                    // Top four bits of the u52 body are reserved.
                    return Err(DecodeError::BadTag(t));
                }
                Ok(Value::Int(magnitude as i64))
            }
            t if (Tag::N8 as u8..=Tag::N52 as u8).contains(&t) => {
                let width = (t - Tag::N8 as u8) as usize + 1;
                let magnitude = reader.try_uint(width)?;
                if width == 7 && magnitude >> 52 != 0 {
                    return Err(DecodeError::BadTag(t));
                }
                Ok(Value::Int(-(magnitude as i64)))
            }
            t if t == Tag::Str as u8 => {
                let len = read_length(reader)?;
                let s = reader.try_utf8(len)?.to_owned();
                pool.push(s.clone());
                Ok(Value::Str(s))
            }
            t if t == Tag::StrRef as u8 => {
                let index = read_uint(reader)?;
                let s = pool
                    .get(index as usize)
                    .ok_or(DecodeError::BadPoolIndex(index))?;
                Ok(Value::Str(s.clone()))
            }
            t if t == Tag::Bytes as u8 => {
                let len = read_length(reader)?;
                Ok(Value::Bytes(reader.try_buf(len)?.to_vec()))
            }
            t if t == Tag::Table as u8 => self.read_table(reader, pool, depth),
            t => Err(DecodeError::BadTag(t)),
        }
    }

    fn read_table(
        &self,
        reader: &mut Reader,
        pool: &mut Vec<String>,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        if depth >= self.options.max_depth {
            return Err(DecodeError::DepthExceeded);
        }
        let n = read_length(reader)?;
        let m = read_length(reader)?;
        // Every record is at least one byte; a count beyond the remaining
        // input can only be corruption, so bail before allocating.
        if n > reader.remaining() || m > reader.remaining() {
            return Err(DecodeError::Truncated);
        }
        let mut array = Vec::with_capacity(n);
        for _ in 0..n {
            array.push(self.read_value(reader, pool, depth + 1)?);
        }
        let mut table = Table::from_array(array);
        for _ in 0..m {
            let key = self.read_key(reader, pool)?;
            let value = self.read_hash_value(reader, pool, depth + 1)?;
            table.insert(key, value);
        }
        Ok(Value::Table(table))
    }

    fn read_key(&self, reader: &mut Reader, pool: &mut Vec<String>) -> Result<Value, DecodeError> {
        let tag = reader.try_peek()?;
        if tag == Tag::Nil as u8 || tag == Tag::Table as u8 {
            return Err(DecodeError::BadTag(tag));
        }
        self.read_value(reader, pool, 0)
    }

    fn read_hash_value(
        &self,
        reader: &mut Reader,
        pool: &mut Vec<String>,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        if reader.try_peek()? == Tag::Nil as u8 {
            reader.try_u8()?;
            return Ok(Value::Nil);
        }
        self.read_value(reader, pool, depth)
    }
}

/// Reads a tagged unsigned integer used as a length, count, or index.
fn read_uint(reader: &mut Reader) -> Result<u64, DecodeError> {
    let tag = reader.try_u8()?;
    if !(Tag::U8 as u8..=Tag::U52 as u8).contains(&tag) {
        return Err(DecodeError::BadTag(tag));
    }
    let width = (tag - Tag::U8 as u8) as usize + 1;
    let val = reader.try_uint(width)?;
    if width == 7 && val >> 52 != 0 {
        return Err(DecodeError::BadTag(tag));
    }
    Ok(val)
}

/// [`read_uint`] narrowed to an in-memory size.
fn read_length(reader: &mut Reader) -> Result<usize, DecodeError> {
    Ok(read_uint(reader)? as usize)
}
