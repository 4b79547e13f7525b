//! Filter argument types for CLI commands

use clap::Args;

use super::{CategoryArg, PostTypeArg, TimeArg};
use crate::sync::{PostFilter, SportEligibility};

/// Filter arguments for `posts browse`.
#[derive(Args, Debug, Default, Clone)]
pub struct PostFilterArgs {
    /// Post kind (workout, event)
    #[arg(long = "type", short = 't', value_enum)]
    pub post_type: Option<PostTypeArg>,

    /// Time window (past, upcoming)
    #[arg(long, value_enum, default_value = "past", hide_default_value = true)]
    pub time: TimeArg,

    /// Workout category (all, swim, bike, run, strength)
    #[arg(
        long,
        short = 'c',
        value_enum,
        default_value = "all",
        hide_default_value = true
    )]
    pub category: CategoryArg,

    /// Case-insensitive search over title and content
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Ignore the configured sport eligibility
    #[arg(long)]
    pub all_sports: bool,
}

impl PostFilterArgs {
    /// Build the post filter, applying `eligibility` unless `--all-sports`
    pub fn to_filter(&self, eligibility: SportEligibility) -> PostFilter {
        let mut filter = PostFilter::new(self.time.into()).category(self.category.into());

        if let Some(kind) = self.post_type {
            filter = filter.kind(kind.into());
        }
        if !self.all_sports {
            filter = filter.eligibility(eligibility);
        }
        if let Some(search) = &self.search {
            filter = filter.search(search.clone());
        }

        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::workout;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_default_args_match_past_posts() {
        let filter = PostFilterArgs::default().to_filter(SportEligibility::Any);

        assert!(filter.matches(&workout(1, "swim", "2025-06-01"), today()));
        assert!(!filter.matches(&workout(2, "swim", "2025-06-20"), today()));
    }

    #[test]
    fn test_category_and_eligibility_applied() {
        let args = PostFilterArgs {
            category: CategoryArg::Bike,
            ..PostFilterArgs::default()
        };
        let eligibility = SportEligibility::from_sports(["spin"]);
        let filter = args.to_filter(eligibility);

        assert!(filter.matches(&workout(1, "spin", "2025-06-01"), today()));
        assert!(!filter.matches(&workout(2, "bike", "2025-06-01"), today()));
        assert!(!filter.matches(&workout(3, "run", "2025-06-01"), today()));
    }

    #[test]
    fn test_all_sports_skips_eligibility() {
        let args = PostFilterArgs {
            all_sports: true,
            ..PostFilterArgs::default()
        };
        let filter = args.to_filter(SportEligibility::from_sports(["swim"]));

        assert!(filter.matches(&workout(1, "run", "2025-06-01"), today()));
    }
}
