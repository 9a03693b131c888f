//! Configuration storage port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for the persisted configuration layer.
/// Backs `vigil config` and the file layer of the startup merge.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the stored partial config; a missing file is an empty
    /// config, not an error
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist the given config, replacing what was stored
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Where the config lives on disk
    fn path(&self) -> PathBuf;

    /// Whether a config file has been written
    fn exists(&self) -> bool;

    /// Write a fresh config with default values.
    /// Refuses to clobber an existing file with `AlreadyExists`.
    async fn init(&self) -> Result<(), ConfigError>;
}
