//! Global CLI options shared across all commands
//!
//! Collects the global flags once so handlers take a single argument.

use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};
use crate::error::Result;
use crate::store::LocalStore;

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// For most options, the precedence is: CLI flag > environment variable > config file > default.
/// This struct captures the CLI/env layer; config file defaults are resolved later in
/// `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format override (pretty, table, json)
    pub format: Option<OutputFormat>,

    /// Custom config file path (defaults to ~/.clubsync/config.yaml)
    pub config: Option<String>,

    /// Custom API host for development/testing
    pub api_host: Option<String>,

    /// Local store directory override
    pub cache_dir: Option<String>,

    /// Start offline: serve cached data, make no requests
    pub offline: bool,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            api_host: cli.api_host.clone(),
            cache_dir: cli.cache_dir.clone(),
            offline: cli.offline,
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Output format for commands that don't read the config file
    pub fn format_or_default(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// Directory holding the local store
    pub fn store_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(LocalStore::default_dir()?),
        }
    }

    /// Open the local store at the resolved directory
    pub fn open_store(&self) -> Result<LocalStore> {
        Ok(LocalStore::open_at(&self.store_dir()?)?)
    }
}
