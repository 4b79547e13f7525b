//! Output formatting for CLI results

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::{PageInfo, PageResult, SyncResult};

pub mod formatters;
pub mod json;
pub mod table;

/// Where a result came from
#[derive(Debug, Clone, Default, Serialize)]
pub struct Provenance {
    pub from_cache: bool,
    pub offline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<DateTime<Utc>>,
}

impl<T> From<&SyncResult<T>> for Provenance {
    fn from(result: &SyncResult<T>) -> Self {
        Self {
            from_cache: result.from_cache,
            offline: result.offline,
            error: result.error.clone(),
            synced_at: result.synced_at,
        }
    }
}

impl From<&PageResult> for Provenance {
    fn from(result: &PageResult) -> Self {
        Self {
            from_cache: result.from_cache,
            offline: result.offline,
            error: result.error.clone(),
            synced_at: None,
        }
    }
}

/// Trait for types that can be formatted for output
pub trait Formattable {
    /// Format the data according to the specified format
    fn format(&self, format: OutputFormat) -> Result<String>;

    /// Format and print to stdout
    fn print(&self, format: OutputFormat) -> Result<()> {
        println!("{}", self.format(format)?);
        Ok(())
    }
}

/// Rows plus the metadata shown around them
pub struct Listing<'a, T> {
    rows: &'a [T],
    provenance: Option<Provenance>,
    pagination: Option<PageInfo>,
}

impl<'a, T> Listing<'a, T> {
    pub fn new(rows: &'a [T]) -> Self {
        Self {
            rows,
            provenance: None,
            pagination: None,
        }
    }

    pub fn provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    pub fn pagination(mut self, pagination: PageInfo) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl<T: Tabled + Serialize> Formattable for Listing<'_, T> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => {
                let mut output = json::JsonOutput::new(self.rows);
                if let Some(p) = &self.provenance {
                    output = output.provenance(p.clone());
                }
                if let Some(info) = &self.pagination {
                    output = output.pagination(info.clone());
                }
                Ok(output.render()?)
            }
            OutputFormat::Table => Ok(table::format_table(self.rows)),
            OutputFormat::Pretty => {
                let mut sections = Vec::new();
                if let Some(banner) = self
                    .provenance
                    .as_ref()
                    .and_then(|p| formatters::provenance_banner(p, Utc::now()))
                {
                    sections.push(banner);
                }
                sections.push(table::format_table(self.rows));
                if let Some(info) = &self.pagination {
                    sections.push(page_footer(info));
                }
                Ok(sections.join("\n"))
            }
        }
    }
}

/// "Page 1 of 2 · 6 posts" with a hint when the remote holds more
pub fn page_footer(info: &PageInfo) -> String {
    let mut footer = format!(
        "Page {} of {} · {} posts",
        info.current_page,
        info.total_pages.max(1),
        info.total_posts
    );
    if info.has_more {
        footer.push_str(" · more available");
    }
    footer.dimmed().to_string()
}
