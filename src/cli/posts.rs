//! Forum post commands

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use crate::cli::args::{GlobalOptions, PostFilterArgs, PostTypeArg};
use crate::cli::{CommandContext, OutputFormat};
use crate::client::PostKind;
use crate::error::Result;
use crate::models::PostDisplay;
use crate::output::{Formattable, Listing, Provenance};

/// Run the `posts list` command: whole-collection view, cache first
pub async fn list(
    opts: &GlobalOptions,
    post_type: Option<PostTypeArg>,
    limit: Option<usize>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let kind = post_type.map(PostKind::from);

    debug!("Listing posts (kind: {:?})", kind);
    let spinner = spinner(ctx.format, "Syncing posts...");
    let result = ctx.orchestrator.fetch_posts(kind).await;
    spinner.finish_and_clear();
    let result = result?;

    let rows: Vec<PostDisplay> = result
        .data
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(PostDisplay::from)
        .collect();

    Listing::new(&rows)
        .provenance(Provenance::from(&result))
        .print(ctx.format)?;

    ctx.orchestrator.settle().await;
    Ok(())
}

/// Run the `posts browse` command: one filtered page via progressive loading
pub async fn browse(
    opts: &GlobalOptions,
    filters: &PostFilterArgs,
    page: usize,
    page_size: Option<usize>,
) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;
    if let Some(size) = page_size {
        ctx.config.preferences.page_size = size.max(1);
    }

    let filter = filters.to_filter(ctx.config.eligibility());
    debug!("Browsing page {} with {:?}", page, filter);

    let mut paginator = ctx.paginator();
    let spinner = spinner(ctx.format, "Loading posts...");
    let result = paginator.load_page(&filter, page).await;
    spinner.finish_and_clear();
    let result = result?;

    debug!(
        "Page {} served ({} posts, stop: {:?})",
        result.pagination.current_page,
        result.posts.len(),
        result.stop_reason
    );

    let rows: Vec<PostDisplay> = result.posts.iter().map(PostDisplay::from).collect();
    Listing::new(&rows)
        .provenance(Provenance::from(&result))
        .pagination(result.pagination.clone())
        .print(ctx.format)
}

/// Steady spinner on stderr for pretty output; hidden otherwise
fn spinner(format: OutputFormat, message: &'static str) -> ProgressBar {
    if format != OutputFormat::Pretty {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
