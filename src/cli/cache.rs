//! Local store management commands

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::error::Result;
use crate::output::formatters::format_sync_ms;

/// Show local store status/statistics
pub fn status(opts: &GlobalOptions) -> Result<()> {
    let store = opts.open_store()?;
    let stats = store.stats()?;
    let path = store
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match opts.format_or_default() {
        OutputFormat::Json => {
            let collections: serde_json::Map<String, serde_json::Value> = stats
                .collections
                .iter()
                .map(|(c, n)| (c.to_string(), serde_json::json!(n)))
                .collect();
            let json = serde_json::json!({
                "path": path,
                "schema_version": stats.schema_version,
                "total_records": stats.total_records(),
                "collections": collections,
                "sync_entries": stats.sync_entries,
                "oldest_sync_ms": stats.oldest_sync_ms,
                "newest_sync_ms": stats.newest_sync_ms,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            println!("Local Store Status");
            println!("────────────────────────────────────────");
            println!("Location:       {}", path);
            println!("Schema:         v{}", stats.schema_version);
            for (collection, count) in &stats.collections {
                println!("{:<15} {}", format!("{}:", collection), count);
            }
            println!("Total records:  {}", stats.total_records());
            println!("Synced views:   {}", stats.sync_entries);
            println!("Oldest sync:    {}", format_sync_ms(stats.oldest_sync_ms));
            println!("Newest sync:    {}", format_sync_ms(stats.newest_sync_ms));
        }
    }

    Ok(())
}

/// Clear all records and sync metadata
pub fn clear(opts: &GlobalOptions) -> Result<()> {
    let store = opts.open_store()?;
    let stats = store.clear_all()?;

    match opts.format_or_default() {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "records_removed": stats.records_removed,
                "sync_entries_removed": stats.sync_entries_removed,
                "success": true,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            if stats.records_removed + stats.sync_entries_removed > 0 {
                println!(
                    "Cleared {} records and {} sync entries",
                    stats.records_removed, stats.sync_entries_removed
                );
            } else {
                println!("Local store was already empty");
            }
        }
    }

    Ok(())
}

/// Show local store directory
pub fn path(opts: &GlobalOptions) -> Result<()> {
    println!("{}", opts.store_dir()?.display());
    Ok(())
}
