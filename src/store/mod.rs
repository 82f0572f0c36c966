//! Local state for the operator CLI.
//!
//! - `LocalSettings`: the guarded parameter and flags themselves, applied
//!   by the engine through `ActionService`
//! - `state_file`: the engine and its settings persisted as one CBOR
//!   snapshot between CLI invocations

pub mod settings;
pub mod state_file;

pub use settings::{LocalSettings, ServicePolicy};
pub use state_file::{load_engine, save_engine, StoreError, StoreResult};
