//! Engine state file.
//!
//! The whole engine (groups, proposals, ballots, notifications and local
//! settings) is one CBOR snapshot. Writes go to a sibling temp file that is
//! renamed over the target, so a crash never leaves a half-written state.
//!
//! There is no lock. Two processes that load the same file and both save
//! lose one side's changes; callers serialize access to a state file.

use super::settings::{LocalSettings, ServicePolicy};
use crate::engine::Engine;
use crate::serialization::{decode_snapshot, encode_snapshot, SerializationError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Store result type.
pub type StoreResult<T> = Result<T, StoreError>;

/// State file errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access state file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("state file '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: SerializationError,
    },

    #[error("failed to encode engine state: {0}")]
    Encode(#[from] SerializationError),
}

/// Load the engine from `path`; a missing file yields a fresh engine.
pub fn load_engine(path: &Path, policy: ServicePolicy) -> StoreResult<Engine<LocalSettings>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no state file, starting fresh");
        return Ok(Engine::new(LocalSettings::new(policy)));
    }

    let bytes = fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut engine: Engine<LocalSettings> =
        decode_snapshot(&bytes).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
    engine.service_mut().set_policy(policy);
    Ok(engine)
}

/// Persist the engine to `path`, replacing it atomically.
pub fn save_engine(path: &Path, engine: &Engine<LocalSettings>) -> StoreResult<()> {
    let bytes = encode_snapshot(engine)?;
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, &bytes).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "state saved");
    Ok(())
}
