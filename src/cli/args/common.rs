//! Common CLI types shared across commands

use crate::client::{PostKind, TimeWindow};
use crate::sync::Category;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - provenance banner plus table (default)
    #[default]
    Pretty,
    /// Table format - table only, no decoration
    Table,
    /// JSON format - structured for scripts
    Json,
}

/// Post kind filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PostTypeArg {
    Workout,
    Event,
}

impl From<PostTypeArg> for PostKind {
    fn from(arg: PostTypeArg) -> Self {
        match arg {
            PostTypeArg::Workout => PostKind::Workout,
            PostTypeArg::Event => PostKind::Event,
        }
    }
}

/// Time window filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TimeArg {
    /// Dated before today, newest first
    #[default]
    Past,
    /// Today or later, soonest first
    Upcoming,
}

impl From<TimeArg> for TimeWindow {
    fn from(arg: TimeArg) -> Self {
        match arg {
            TimeArg::Past => TimeWindow::Past,
            TimeArg::Upcoming => TimeWindow::Upcoming,
        }
    }
}

/// Workout category filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CategoryArg {
    #[default]
    All,
    Swim,
    /// Bike, spin and indoor trainer
    Bike,
    Run,
    Strength,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::All => Category::All,
            CategoryArg::Swim => Category::Swim,
            CategoryArg::Bike => Category::Bike,
            CategoryArg::Run => Category::Run,
            CategoryArg::Strength => Category::Strength,
        }
    }
}
