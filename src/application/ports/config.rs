//! Config store port interface

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for configuration loading.
/// The config file is operator-managed; the service only reads it.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load configuration from the store
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Get the path to the config file
    fn path(&self) -> PathBuf;

    /// Check if the config file exists
    fn exists(&self) -> bool;
}
