//! Init command implementation

use colored::Colorize;
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::client::{ClubClient, ForumApi};
use crate::config::Config;
use crate::error::Result;

/// Run the init command
///
/// Verifies the token against `/api/auth/me` and seeds the member ID and
/// eligible sports from the member's profile.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to clubsync!".bold().green());
    println!("Let's connect to your club.\n");

    let theme = ColorfulTheme::default();
    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();

    let api_token: String = Password::with_theme(&theme)
        .with_prompt("Enter your club API token")
        .interact()?;

    let api_host = match opts.api_host.clone() {
        Some(host) => Some(host),
        None => {
            let host: String = Input::with_theme(&theme)
                .with_prompt("API host (leave empty for the default)")
                .allow_empty(true)
                .interact_text()?;
            Some(host.trim().to_string()).filter(|h| !h.is_empty())
        }
    };

    println!("\n{}", "Verifying token...".cyan());
    let client = ClubClient::with_host(Some(api_token.clone()), api_host.clone())?;
    let me = client.me().await?;
    println!(
        "{} Signed in as {} ({})",
        "✓".green(),
        me.name.bold(),
        me.email
    );
    if let Some(term_end) = &me.term_end_date {
        println!("  Membership term ends {}", term_end);
    }

    // Cached so offline runs know who the member is
    opts.open_store()?.put(&me)?;

    config.api_token = Some(api_token);
    config.api_host = api_host;
    config.user_id = Some(me.id);

    if !me.sport_preferences.is_empty() {
        let limit = Confirm::with_theme(&theme)
            .with_prompt(format!(
                "Only show workouts for your sports ({})?",
                me.sport_preferences.join(", ")
            ))
            .default(true)
            .interact()?;
        config.eligible_sports = if limit {
            me.sport_preferences.clone()
        } else {
            Vec::new()
        };
    }

    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "clubsync status".cyan());
    println!("  {} - Browse recent workouts", "clubsync posts browse".cyan());

    Ok(())
}
