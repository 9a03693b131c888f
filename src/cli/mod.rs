//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, and the command
//! runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod evidence_cmd;
pub mod presenter;

// Re-export commonly used types
pub use app::{
    build_store, load_merged_config, run_session, EvidenceBackend, EXIT_ERROR, EXIT_SUCCESS,
    EXIT_USAGE_ERROR,
};
pub use args::{BackendArg, CaptureArg, Cli, Commands, ConfigAction};
pub use presenter::Presenter;
