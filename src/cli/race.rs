//! Race calendar commands

use log::debug;

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::error::Result;
use crate::models::{RaceDisplay, RaceSignupDisplay};
use crate::output::{Formattable, Listing, Provenance};

/// Run the `race list` command
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let result = ctx.orchestrator.fetch_races().await?;
    debug!("Fetched {} races", result.data.len());

    let rows: Vec<RaceDisplay> = result.data.iter().map(RaceDisplay::from).collect();
    Listing::new(&rows)
        .provenance(Provenance::from(&result))
        .print(ctx.format)?;

    ctx.orchestrator.settle().await;
    Ok(())
}

/// Run the `race signups` command
pub async fn signups(opts: &GlobalOptions, race_id: i64) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let result = ctx.orchestrator.fetch_race_signups(race_id).await?;
    debug!("Fetched {} signups for race {}", result.data.len(), race_id);

    let rows: Vec<RaceSignupDisplay> = result.data.iter().map(RaceSignupDisplay::from).collect();
    Listing::new(&rows)
        .provenance(Provenance::from(&result))
        .print(ctx.format)?;

    ctx.orchestrator.settle().await;
    Ok(())
}
