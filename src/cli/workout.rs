//! Workout detail command

use colored::Colorize;
use serde::Serialize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::{ForumPost, WaitlistEntry, WorkoutSignup};
use crate::error::{ApiError, Result};
use crate::models::{SignupDisplay, WaitlistDisplay, workout_detail};
use crate::output::formatters::provenance_banner;
use crate::output::json::JsonOutput;
use crate::output::{Provenance, table};

#[derive(Serialize)]
struct WorkoutView<'a> {
    workout: &'a ForumPost,
    signups: &'a [WorkoutSignup],
    waitlist: &'a [WaitlistEntry],
}

/// Run the `workout show` command: detail, signups and waitlist
pub async fn show(opts: &GlobalOptions, id: i64) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let (workout, signups, waitlist) = tokio::join!(
        ctx.orchestrator.fetch_workout(id),
        ctx.orchestrator.fetch_signups(id),
        ctx.orchestrator.fetch_waitlist(id),
    );
    let (workout, signups, waitlist) = (workout?, signups?, waitlist?);

    let provenance = Provenance::from(&workout);
    let Some(post) = workout.data else {
        ctx.orchestrator.settle().await;
        return Err(ApiError::NotFound(format!("workout {}", id)).into());
    };

    match ctx.format {
        OutputFormat::Json => {
            let view = WorkoutView {
                workout: &post,
                signups: &signups.data,
                waitlist: &waitlist.data,
            };
            println!("{}", JsonOutput::new(view).provenance(provenance).render()?);
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            if ctx.format == OutputFormat::Pretty {
                if let Some(banner) = provenance_banner(&provenance, chrono::Utc::now()) {
                    println!("{}", banner);
                }
            }

            println!("{}", table::format_detail(&workout_detail(&post)));

            let signup_rows: Vec<SignupDisplay> =
                signups.data.iter().map(SignupDisplay::from).collect();
            println!("\n{} ({})", "Signups".bold(), signup_rows.len());
            println!("{}", table::format_table(&signup_rows));

            if !waitlist.data.is_empty() {
                let waitlist_rows: Vec<WaitlistDisplay> =
                    waitlist.data.iter().map(WaitlistDisplay::from).collect();
                println!("\n{} ({})", "Waitlist".bold(), waitlist_rows.len());
                println!("{}", table::format_table(&waitlist_rows));
            }
        }
    }

    ctx.orchestrator.settle().await;
    Ok(())
}
