//! clubsync - offline-first client for the club workout forum

use std::io;

use clap::{CommandFactory, Parser};
use colored::Colorize;

mod cache;
mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod store;
mod sync;

use cli::args::GlobalOptions;
use cli::{CacheCommands, Cli, Commands, PostsCommands, RaceCommands, WorkoutCommands};
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        if err.is_term_expired() {
            eprintln!("{} {}", "Membership expired:".red().bold(), err);
            std::process::exit(2);
        }
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `RUST_LOG` is honored; `--debug` raises this crate to debug
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module(env!("CARGO_CRATE_NAME"), log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("clubsync version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Posts(cmd) => match cmd {
            PostsCommands::List { post_type, limit } => {
                cli::posts::list(&opts, post_type, limit).await
            }
            PostsCommands::Browse {
                filters,
                page,
                page_size,
            } => cli::posts::browse(&opts, &filters, page, page_size).await,
        },
        Commands::Workout(cmd) => match cmd {
            WorkoutCommands::Show { id } => cli::workout::show(&opts, id).await,
        },
        Commands::Race(cmd) => match cmd {
            RaceCommands::List => cli::race::list(&opts).await,
            RaceCommands::Signups { race_id } => cli::race::signups(&opts, race_id).await,
        },
        Commands::Cache(cmd) => match cmd {
            CacheCommands::Status => cli::cache::status(&opts),
            CacheCommands::Clear => cli::cache::clear(&opts),
            CacheCommands::Path => cli::cache::path(&opts),
        },
        Commands::Completion { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "clubsync", &mut io::stdout());
            Ok(())
        }
    }
}
