use clap::{ArgAction, Parser, Subcommand};
use multisig_gate::gateway::Vertical;
use multisig_gate::identity::MemberId;
use multisig_gate::store::{self, LocalSettings};
use multisig_gate::Engine;
use std::error::Error;
use std::path::PathBuf;

pub mod config;
pub mod init;
pub mod logging;
pub mod status;
pub mod version;
pub mod vote;

use config::GateConfig;

#[derive(Parser)]
#[command(name = "multisig-gate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for the multisig voting gate", long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.local/share/multisig-gate/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Members are given as labels (hashed) or 64-character hex ids.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the one-time setup of both member groups
    Init {
        /// Initial members of the parameter group (comma separated)
        #[arg(long, value_delimiter = ',', required = true)]
        parameter_members: Vec<MemberId>,

        /// Initial members of the flags group (comma separated)
        #[arg(long, value_delimiter = ',', required = true)]
        flags_members: Vec<MemberId>,

        /// Identity reserved for upgrades; never votes
        #[arg(long)]
        admin: MemberId,
    },

    /// Vote to add a candidate to a group
    VoteAdd {
        /// Group to change: parameter or flags
        #[arg(long)]
        vertical: Vertical,

        /// Voting member
        #[arg(long)]
        voter: MemberId,

        /// Identity to add
        #[arg(long)]
        candidate: MemberId,
    },

    /// Vote to remove a member from a group
    VoteRemove {
        /// Group to change: parameter or flags
        #[arg(long)]
        vertical: Vertical,

        /// Voting member
        #[arg(long)]
        voter: MemberId,

        /// Identity to remove
        #[arg(long)]
        member: MemberId,
    },

    /// Vote for a new value of the guarded parameter
    VoteParameter {
        /// Voting member of the parameter group
        #[arg(long)]
        voter: MemberId,

        /// Proposed value
        #[arg(long)]
        value: u64,
    },

    /// Vote for a new guarded flag pair
    VoteFlags {
        /// Voting member of the flags group
        #[arg(long)]
        voter: MemberId,

        /// First flag: true or false
        #[arg(long, action = ArgAction::Set, required = true)]
        flag_a: bool,

        /// Second flag: true or false
        #[arg(long, action = ArgAction::Set, required = true)]
        flag_b: bool,
    },

    /// Show groups, thresholds, round versions and current settings
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List notifications
    Events {
        /// Only notifications after this sequence number
        #[arg(long, default_value_t = 0)]
        since: u64,

        /// Print as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

pub fn execute(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Commands::Version = cli.command {
        version::execute();
        return Ok(());
    }

    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let config = GateConfig::load_or_create(&config_path)?;
    logging::init(&config.logging)?;
    tracing::debug!(config = %config_path.display(), "configuration loaded");

    match cli.command {
        Commands::Init {
            parameter_members,
            flags_members,
            admin,
        } => init::execute(&config, parameter_members, flags_members, admin),
        Commands::VoteAdd {
            vertical,
            voter,
            candidate,
        } => vote::add(&config, vertical, voter, candidate),
        Commands::VoteRemove {
            vertical,
            voter,
            member,
        } => vote::remove(&config, vertical, voter, member),
        Commands::VoteParameter { voter, value } => vote::parameter(&config, voter, value),
        Commands::VoteFlags {
            voter,
            flag_a,
            flag_b,
        } => vote::flags(&config, voter, flag_a, flag_b),
        Commands::Status { json } => status::execute(&config, json),
        Commands::Events { since, json } => status::events(&config, since, json),
        Commands::Version => Ok(()),
    }
}

/// Load the engine from the configured state file.
///
/// The state file is not locked. Each command loads, mutates and saves the
/// whole snapshot, so invocations against one state file must be run one at
/// a time; concurrent commands race and the last save wins.
fn open_engine(config: &GateConfig) -> Result<Engine<LocalSettings>, Box<dyn Error>> {
    Ok(store::load_engine(
        &config.state.path,
        config.service_policy(),
    )?)
}

/// Persist the engine; only called after an operation succeeded.
fn persist(config: &GateConfig, engine: &Engine<LocalSettings>) -> Result<(), Box<dyn Error>> {
    Ok(store::save_engine(&config.state.path, engine)?)
}
