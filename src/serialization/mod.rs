//! CBOR serialization for engine snapshots.
//!
//! - Use CBOR via `ciborium` (NOT JSON or bincode)
//! - Every snapshot is wrapped in a versioned envelope
//! - Schema evolution with `#[serde(default)]` on new fields

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Envelope format written by this build.
pub const SNAPSHOT_FORMAT: u32 = 1;

/// Serialization result type.
pub type SerializationResult<T> = Result<T, SerializationError>;

/// Serialization errors.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// CBOR encoding failed.
    #[error("CBOR encoding failed: {0}")]
    Encode(String),

    /// CBOR decoding failed.
    #[error("CBOR decoding failed: {0}")]
    Decode(String),

    /// Snapshot written by an incompatible build.
    #[error("unsupported snapshot format {found}, expected {expected}")]
    UnsupportedFormat { found: u32, expected: u32 },
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    format: u32,
    body: T,
}

/// Serialize to CBOR bytes.
pub fn to_cbor<T: Serialize>(value: &T) -> SerializationResult<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes)
        .map_err(|e| SerializationError::Encode(format!("{:?}", e)))?;
    Ok(bytes)
}

/// Deserialize from CBOR bytes.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> SerializationResult<T> {
    ciborium::from_reader(bytes).map_err(|e| SerializationError::Decode(format!("{:?}", e)))
}

/// Encode `body` as a versioned snapshot.
pub fn encode_snapshot<T: Serialize>(body: &T) -> SerializationResult<Vec<u8>> {
    to_cbor(&Envelope {
        format: SNAPSHOT_FORMAT,
        body,
    })
}

/// Decode a versioned snapshot, rejecting other formats.
pub fn decode_snapshot<T: DeserializeOwned>(bytes: &[u8]) -> SerializationResult<T> {
    #[derive(Deserialize)]
    struct Header {
        format: u32,
    }

    let header: Header = from_cbor(bytes)?;
    if header.format != SNAPSHOT_FORMAT {
        return Err(SerializationError::UnsupportedFormat {
            found: header.format,
            expected: SNAPSHOT_FORMAT,
        });
    }
    let envelope: Envelope<T> = from_cbor(bytes)?;
    Ok(envelope.body)
}
