//! Operator configuration file handling
//!
//! Configuration files are TOML and live under the user data directory by
//! default. When a config path is given but missing, a commented default is
//! written there and the state file is placed next to it.
//!
//! ## Operator vs Group Settings
//!
//! This file holds OPERATOR settings only: where state lives, logging, and
//! how the local service answers requests. Group membership and the guarded
//! values themselves change only by member vote and live in the state file.

use multisig_gate::group::DEFAULT_MEMBERSHIP_FLOOR;
use multisig_gate::store::ServicePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

const APP_DIR: &str = "multisig-gate";

/// Operator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// State file configuration
    pub state: StateConfig,

    /// Setup options
    #[serde(default)]
    pub engine: EngineConfig,

    /// Local service behavior
    #[serde(default)]
    pub service: ServiceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Path to the CBOR engine state
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Smallest group size a removal may leave; applied at `init`
    #[serde(default = "default_membership_floor")]
    pub membership_floor: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// When false, resolved actions are answered with REQUEST_DISABLED
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Largest numeric parameter the service accepts
    pub max_parameter: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

fn default_membership_floor() -> usize {
    DEFAULT_MEMBERSHIP_FLOOR
}

fn default_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            membership_floor: DEFAULT_MEMBERSHIP_FLOOR,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_parameter: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl GateConfig {
    /// Create a new configuration with the given state path
    #[cfg(test)]
    pub fn new(state_path: PathBuf) -> Self {
        Self {
            state: StateConfig { path: state_path },
            engine: EngineConfig::default(),
            service: ServiceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: GateConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        config.validate()?;
        Ok(config)
    }

    /// Load `path`, writing a default config there first if it is missing
    pub fn load_or_create(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            Self::create_default(path, &default_state_path_for(path))?;
        }
        Self::load(path)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.engine.membership_floor < DEFAULT_MEMBERSHIP_FLOOR {
            return Err(format!(
                "engine.membership_floor is {}, it may not go below {}",
                self.engine.membership_floor, DEFAULT_MEMBERSHIP_FLOOR
            )
            .into());
        }
        Ok(())
    }

    /// Policy handed to the local service
    pub fn service_policy(&self) -> ServicePolicy {
        ServicePolicy {
            enabled: self.service.enabled,
            max_parameter: self.service.max_parameter,
        }
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml(state_path: &Path) -> String {
        format!(
            r#"# Multisig Gate Configuration (Operator Settings)
#
# This file contains OPERATOR configuration only. Group membership and the
# guarded values change ONLY BY MEMBER VOTE and are kept in the state file.

[state]
# Path to the engine state (CBOR)
path = "{state_path}"

[engine]
# Smallest group size a removal may leave. Applied once, at `init`.
# May be raised, never lowered below {floor}.
membership_floor = {floor}

[service]
# When false, resolved actions are answered with REQUEST_DISABLED
enabled = true

# Largest numeric parameter accepted (optional, unbounded if not specified)
# max_parameter = 1000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (optional, logs to stderr if not specified)
# file = "/var/log/multisig-gate/gate.log"
"#,
            state_path = state_path.display(),
            floor = DEFAULT_MEMBERSHIP_FLOOR,
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(
        config_path: &Path,
        state_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml(state_path);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    data_dir().join("config.toml")
}

/// Get the state file path that sits next to `config_path`
///
/// - Config: /data/gate/config.toml
/// - State: /data/gate/state.cbor
pub fn default_state_path_for(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("state.cbor")
}
