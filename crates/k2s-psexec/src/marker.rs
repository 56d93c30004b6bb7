//! Structured output markers
//!
//! Scripts report results on stdout as a single line
//!
//! ```text
//! #pm#<messageType>#<base64(gzip(json))>
//! ```
//!
//! interleaved with their plain log output.

use crate::error::{PsError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};

/// Prefix identifying a structured output line
pub const MARKER_PREFIX: &str = "#pm#";

const MARKER_SEPARATOR: char = '#';
const MARKER_FIELDS: usize = 4;

/// A decoded structured result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredMessage {
    message_type: String,
    data: Vec<u8>,
}

impl StructuredMessage {
    pub fn new(message_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            message_type: message_type.into(),
            data,
        }
    }

    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    /// Raw JSON payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Deserialize the JSON payload
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.data).map_err(|source| PsError::Unmarshal {
            message_type: self.message_type.clone(),
            source,
        })
    }
}

/// True when the line carries a structured result
pub fn is_marker(line: &str) -> bool {
    line.starts_with(MARKER_PREFIX)
}

/// Decode a stdout line
///
/// Returns `Ok(None)` for plain log lines.
pub fn decode_line(line: &str) -> Result<Option<StructuredMessage>> {
    let line = line.trim_end_matches('\r');
    if !is_marker(line) {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(MARKER_SEPARATOR).collect();
    if fields.len() != MARKER_FIELDS {
        return Err(PsError::MalformedMarker {
            fields: fields.len(),
        });
    }

    let compressed = STANDARD.decode(fields[3])?;
    let mut data = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut data)
        .map_err(PsError::Gzip)?;

    Ok(Some(StructuredMessage::new(fields[2], data)))
}

/// Encode a JSON payload as a marker line
pub fn encode_message(message_type: &str, json: &[u8]) -> Result<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json).map_err(PsError::Gzip)?;
    let compressed = encoder.finish().map_err(PsError::Gzip)?;

    Ok(format!(
        "{}{}{}{}",
        MARKER_PREFIX,
        message_type,
        MARKER_SEPARATOR,
        STANDARD.encode(compressed)
    ))
}
