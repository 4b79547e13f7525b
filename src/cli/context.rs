//! Command execution context
//!
//! Wires config, local store, API client and the sync engine together so
//! command handlers start from a ready-to-use set of services.

use std::sync::Arc;

use clap::ValueEnum;
use log::debug;

use crate::cache::{Clock, StalenessPolicy, SystemClock};
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::ClubClient;
use crate::config::Config;
use crate::error::Result;
use crate::store::LocalStore;
use crate::sync::{ConnectivityObserver, ProgressivePaginator, SyncOrchestrator};

/// Context for command execution.
pub struct CommandContext {
    /// Loaded and validated configuration
    pub config: Config,
    /// Resolved output format
    pub format: OutputFormat,
    /// Durable local store shared by every sync component
    pub store: Arc<LocalStore>,
    /// Owner of the online flag
    pub connectivity: ConnectivityObserver,
    /// Cache-first sync for whole-collection views
    pub orchestrator: SyncOrchestrator<ClubClient>,
    api: Arc<ClubClient>,
    clock: Arc<dyn Clock>,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// Offline runs only read the local store, so they don't require an
    /// API token.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded, the token is missing while
    /// online, or the local store cannot be opened.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        if !opts.offline {
            config.validate_auth()?;
        }

        let format = resolve_format(opts.format, &config);
        let api_host = opts.api_host.clone().or_else(|| config.api_host.clone());
        let api = Arc::new(ClubClient::with_host(config.api_token.clone(), api_host)?);
        debug!("API base URL: {}", api.base_url());

        let store = Arc::new(opts.open_store()?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let connectivity = ConnectivityObserver::new(!opts.offline);

        let staleness = StalenessPolicy::new(Arc::clone(&store), Arc::clone(&clock));
        let orchestrator = SyncOrchestrator::new(
            Arc::clone(&api),
            Arc::clone(&store),
            staleness,
            connectivity.signal(),
            config.sync_config(),
        );

        Ok(Self {
            config,
            format,
            store,
            connectivity,
            orchestrator,
            api,
            clock,
        })
    }

    /// A fresh paginator for one browsing session
    pub fn paginator(&self) -> ProgressivePaginator<ClubClient> {
        ProgressivePaginator::new(
            Arc::clone(&self.api),
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
            self.connectivity.signal(),
            self.config.paginator_config(),
        )
    }
}

/// Flag/env wins, then `preferences.format`, then the default
fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.or_else(|| {
        config
            .preferences
            .format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
    })
    .unwrap_or_default()
}
