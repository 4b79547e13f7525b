//! Status command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::client::http::DEFAULT_API_HOST;
use crate::config::Config;
use crate::error::Result;
use crate::output::formatters::format_sync_ms;

/// Run the status command to display configuration and local store status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "Clubsync Status".bold());

    match Config::load_at(opts.config_ref()) {
        Ok(config) => {
            let config_path = Config::resolve_path(opts.config_ref())?;
            println!("Config file: {}", config_path.display().to_string().cyan());
            println!();

            if config.api_token.is_some() {
                println!("{} API token configured", "✓".green());
            } else {
                println!("{} API token not configured", "✗".red());
                println!("  → Run 'clubsync init' to configure");
            }

            match config.user_id {
                Some(id) => println!("{} Member ID: {}", "✓".green(), id),
                None => println!("{} Member ID not set", "○".dimmed()),
            }

            if config.eligible_sports.is_empty() {
                println!("{} Eligible sports: all", "○".dimmed());
            } else {
                println!(
                    "{} Eligible sports: {}",
                    "✓".green(),
                    config.eligible_sports.join(", ")
                );
            }

            let host = opts
                .api_host
                .as_deref()
                .or(config.api_host.as_deref())
                .unwrap_or(DEFAULT_API_HOST);
            if host != DEFAULT_API_HOST {
                println!("{} Custom API host: {}", "○".dimmed(), host.cyan());
            }

            println!(
                "{} Page size: {} (remote {})",
                "○".dimmed(),
                config.preferences.page_size,
                config.preferences.remote_page_size
            );
        }
        Err(_) => {
            println!("{} Configuration not found", "✗".red());
            println!();
            println!(
                "Run {} to create a configuration file.",
                "clubsync init".cyan()
            );
        }
    }

    println!();
    print_store_status(opts);
    if opts.offline {
        println!("{} Offline mode: cached data only", "⚠".yellow());
    }
    println!();

    Ok(())
}

fn print_store_status(opts: &GlobalOptions) {
    match opts.open_store().and_then(|store| Ok(store.stats()?)) {
        Ok(stats) => {
            println!(
                "{} Local store: {} records, last sync {}",
                "✓".green(),
                stats.total_records(),
                format_sync_ms(stats.newest_sync_ms)
            );
        }
        Err(err) => {
            println!("{} Local store unavailable: {}", "✗".red(), err);
        }
    }
}
