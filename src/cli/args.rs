//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::capture::CaptureKind;
use crate::domain::config::Backend;

/// Vigil - personal safety evidence recorder
#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(version = "0.1.0")]
#[command(about = "Records time-boxed audio, video, and location evidence")]
#[command(long_about = None)]
pub struct Cli {
    /// Recording time limit (e.g., 30s, 2m, 2m30s)
    #[arg(short = 'l', long, value_name = "TIME")]
    pub limit: Option<String>,

    /// Show desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Evidence backend (local or remote)
    #[arg(short = 'b', long, value_name = "BACKEND")]
    pub backend: Option<BackendArg>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a panic session: camera, microphone, and location at once
    Panic,
    /// Record one capability for the configured time limit
    Record {
        /// What to capture
        kind: CaptureArg,
    },
    /// List persisted evidence, newest first
    List,
    /// Fetch one evidence record
    Download {
        /// Evidence id, as shown by `vigil list`
        id: String,
        /// Write to this path instead of the stored file name
        #[arg(short = 'o', long, value_name = "PATH")]
        output: Option<String>,
    },
    /// Remove one evidence record
    Delete {
        /// Evidence id, as shown by `vigil list`
        id: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Show all config values
    Show,
    /// Show config file path
    Path,
}

/// Recordable capability for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CaptureArg {
    Video,
    Audio,
    Location,
}

impl From<CaptureArg> for CaptureKind {
    fn from(arg: CaptureArg) -> Self {
        match arg {
            CaptureArg::Video => CaptureKind::Video,
            CaptureArg::Audio => CaptureKind::Audio,
            CaptureArg::Location => CaptureKind::Location,
        }
    }
}

/// Backend argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Local,
    Remote,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Local => Backend::Local,
            BackendArg::Remote => Backend::Remote,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "device_id",
    "time_limit",
    "backend",
    "remote_url",
    "api_token",
    "notify",
    "latitude",
    "longitude",
    "high_accuracy",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
