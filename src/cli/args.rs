//! CLI argument definitions using clap derive

use crate::config::Config;
use crate::error::{HvError, HvResult};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// hvctl - Hyper-V machines over SSH
///
/// Keeps a local inventory of the host's machines so they can be
/// addressed by a short index instead of their full name.
#[derive(Parser, Debug)]
#[command(name = "hvctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "HVCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Hyper-V host (overrides server.host)
    #[arg(short = 'm', long, global = true)]
    pub host: Option<String>,

    /// Login user (overrides server.user)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Windows domain of the user (overrides server.domain)
    #[arg(short, long, global = true)]
    pub domain: Option<String>,

    /// Inventory cache file (overrides cache.file)
    #[arg(long, global = true, env = "HVCTL_CACHE_FILE")]
    pub cache_file: Option<PathBuf>,
}

impl Cli {
    /// Let connection and cache flags take precedence over the config file
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = Some(host.clone());
        }
        if let Some(user) = &self.user {
            config.server.user = Some(user.clone());
        }
        if let Some(domain) = &self.domain {
            config.server.domain = Some(domain.clone());
        }
        if let Some(file) = &self.cache_file {
            config.cache.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List machines, syncing the inventory when it is stale
    List(ListArgs),

    /// Sync the inventory and list machines
    Ls(LsArgs),

    /// List snapshots of a machine
    Snaps(TargetArgs),

    /// Create a snapshot
    Create(SnapshotArgs),

    /// Restore a snapshot
    Restore(SnapshotArgs),

    /// Delete a snapshot
    Delete(DeleteArgs),

    /// Start a machine
    Start(TargetArgs),

    /// Shut a machine down
    Stop(StopArgs),

    /// Pause a running machine
    Pause(TargetArgs),

    /// Resume a paused machine
    Resume(TargetArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Sync with the host even if the inventory is fresh
    #[arg(short, long)]
    pub sync: bool,

    /// Only show machines whose name contains this text
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct LsArgs {
    /// Only show machines whose name contains this text
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

impl From<LsArgs> for ListArgs {
    fn from(args: LsArgs) -> Self {
        Self {
            sync: true,
            name: args.name,
            format: args.format,
        }
    }
}

/// A machine addressed by inventory index or by name
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Inventory index (see `hvctl list`)
    pub index: Option<usize>,

    /// Machine name
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct StopArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Turn the machine off if the guest does not shut down
    #[arg(short, long)]
    pub force: bool,
}

/// `[INDEX] SNAPSHOT [--name NAME]`
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Optional inventory index followed by the snapshot name
    #[arg(
        required = true,
        num_args = 1..=2,
        value_names = ["INDEX", "SNAPSHOT"]
    )]
    pub positional: Vec<String>,

    /// Machine name
    #[arg(short, long)]
    pub name: Option<String>,
}

impl SnapshotArgs {
    /// Split the positionals into (index, snapshot name)
    pub fn target(&self) -> HvResult<(Option<usize>, &str)> {
        match self.positional.as_slice() {
            [snapshot] => Ok((None, snapshot)),
            [index, snapshot] => {
                let index = index.parse().map_err(|_| {
                    HvError::InvalidArgument(format!("'{}' is not a machine index", index))
                })?;
                Ok((Some(index), snapshot))
            }
            _ => Err(HvError::InvalidArgument(
                "a snapshot name is required".to_string(),
            )),
        }
    }
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Also delete child snapshots
    #[arg(short, long)]
    pub recursive: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., server.host)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// One name per line
    Plain,
}
