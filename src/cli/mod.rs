//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod cache;
pub mod context;
pub mod init;
pub mod posts;
pub mod race;
pub mod status;
pub mod workout;

pub use args::{OutputFormat, PostFilterArgs, PostTypeArg};
pub use context::CommandContext;

/// clubsync - offline-first client for the club workout forum
#[derive(Parser, Debug)]
#[command(name = "clubsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "CLUBSYNC_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "CLUBSYNC_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the API host
    #[arg(long, global = true, env = "CLUBSYNC_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Override the local store directory
    #[arg(long, global = true, env = "CLUBSYNC_CACHE_DIR", hide_env = true)]
    pub cache_dir: Option<String>,

    /// Serve cached data only; make no network requests
    #[arg(long, global = true, env = "CLUBSYNC_OFFLINE", hide_env = true)]
    pub offline: bool,

    /// Enable debug logging
    #[arg(long, global = true, env = "CLUBSYNC_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize clubsync configuration
    Init,

    /// Show configuration and local store status
    Status,

    /// Display version information
    Version,

    /// List and browse forum posts
    #[command(subcommand)]
    Posts(PostsCommands),

    /// Show workout details and rosters
    #[command(subcommand)]
    Workout(WorkoutCommands),

    /// View the race calendar
    #[command(subcommand)]
    Race(RaceCommands),

    /// Manage the local store
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   clubsync completion bash > /etc/bash_completion.d/clubsync
  zsh:    clubsync completion zsh > \"${fpath[1]}/_clubsync\"
  fish:   clubsync completion fish > ~/.config/fish/completions/clubsync.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Forum post subcommands
#[derive(Subcommand, Debug)]
pub enum PostsCommands {
    /// List all cached/synced posts, newest first
    List {
        /// Post kind (workout, event)
        #[arg(long = "type", short = 't', value_enum)]
        post_type: Option<PostTypeArg>,

        /// Maximum results to show
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Browse one filtered page of posts
    #[command(
        visible_alias = "b",
        after_help = "EXAMPLES:\n  \
            clubsync posts browse                         # Recent posts, page 1\n  \
            clubsync posts browse -c swim                 # Recent swims\n  \
            clubsync posts browse --time upcoming -c bike # Upcoming rides\n  \
            clubsync posts browse -s intervals -p 2       # Search, page 2"
    )]
    Browse {
        #[command(flatten)]
        filters: PostFilterArgs,

        /// Page number (1-indexed)
        #[arg(long, short = 'p', default_value_t = 1)]
        page: usize,

        /// Posts per page (overrides preferences.page_size)
        #[arg(long)]
        page_size: Option<usize>,
    },
}

/// Workout subcommands
#[derive(Subcommand, Debug)]
pub enum WorkoutCommands {
    /// Show a workout with its signups and waitlist
    Show {
        /// Workout post ID
        id: i64,
    },
}

/// Race subcommands
#[derive(Subcommand, Debug)]
pub enum RaceCommands {
    /// List races on the club calendar
    List,

    /// List members signed up for a race
    Signups {
        /// Race ID
        race_id: i64,
    },
}

/// Local store subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show local store statistics
    Status,
    /// Clear all cached records and sync metadata
    Clear,
    /// Print local store directory path
    Path,
}
