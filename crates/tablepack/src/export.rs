//! Save-as-text and load-from-text bindings for file-handling hosts.
//!
//! The exporter is an explicit value handed to each call site; there is no
//! process-wide handle. Text form maps each payload byte to the code point
//! of the same value, which survives any transport that preserves Unicode
//! text. Level 3 is refused here: its entropy-wrapped bodies are arbitrary
//! binary and belong in binary sinks.

use thiserror::Error;

use crate::decoder::{Decoder, DecoderOptions};
use crate::encoder::{Encoder, EncoderOptions};
use crate::error::{DecodeError, EncodeError};
use crate::value::Value;
use crate::Level;

/// Errors raised by the text import/export wrapper.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExportError {
    /// Level 3 output is binary and cannot be given to a text sink.
    #[error("level 3 payloads are binary and cannot be exported as text")]
    BinaryPayload,
    /// The imported text contains a code point no payload byte maps to.
    #[error("text contains non-byte code point {0:?}")]
    BadCodePoint(char),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Explicit handle for compress-and-save-as-text / load-and-decompress.
#[derive(Default)]
pub struct TextExporter {
    encoder_options: EncoderOptions,
    decoder_options: DecoderOptions,
}

impl TextExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(encoder_options: EncoderOptions, decoder_options: DecoderOptions) -> Self {
        Self {
            encoder_options,
            decoder_options,
        }
    }

    /// Compresses `value` and renders the payload as text.
    ///
    /// Levels 1 and 2 only; [`ExportError::BinaryPayload`] otherwise.
    pub fn export(&self, value: &Value, level: Level) -> Result<String, ExportError> {
        if level == Level::Three {
            return Err(ExportError::BinaryPayload);
        }
        let payload = Encoder::with_options(self.encoder_options).encode(value, level)?;
        Ok(payload.iter().map(|&b| b as char).collect())
    }

    /// Reverses [`TextExporter::export`].
    pub fn import(&self, text: &str) -> Result<Value, ExportError> {
        let mut payload = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let code = ch as u32;
            if code > 0xff {
                return Err(ExportError::BadCodePoint(ch));
            }
            payload.push(code as u8);
        }
        Ok(Decoder::with_options(self.decoder_options).decode(&payload)?)
    }
}
