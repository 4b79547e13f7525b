//! Client-side post filter and ordering
//!
//! The remote only filters by kind, time window, a single workout subtype and
//! search. Category groups and sport eligibility are applied here.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::client::{ForumPost, ListQuery, PostKind, TimeWindow};

/// Workout category shown to members
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    All,
    Swim,
    Bike,
    Run,
    Strength,
}

impl Category {
    /// Underlying `workout_type` values; empty for `All`
    pub fn subtypes(&self) -> &'static [&'static str] {
        match self {
            Category::All => &[],
            Category::Swim => &["swim"],
            Category::Bike => &["bike", "spin", "indoor-trainer"],
            Category::Run => &["run"],
            Category::Strength => &["strength"],
        }
    }

    /// Subtype the server can filter on natively, when there is exactly one
    pub fn native_workout_type(&self) -> Option<&'static str> {
        match self.subtypes() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn matches(&self, workout_type: Option<&str>) -> bool {
        if *self == Category::All {
            return true;
        }
        workout_type.is_some_and(|wt| {
            let wt = wt.to_ascii_lowercase();
            self.subtypes().contains(&wt.as_str())
        })
    }
}

/// Which workout subtypes the member may see
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SportEligibility {
    #[default]
    Any,
    AllowList(BTreeSet<String>),
}

impl SportEligibility {
    /// Allow-list from the member's sports; an empty list allows everything
    pub fn from_sports<I, S>(sports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed: BTreeSet<String> = sports
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        if allowed.is_empty() {
            SportEligibility::Any
        } else {
            SportEligibility::AllowList(allowed)
        }
    }

    /// Posts without a subtype (events) are always eligible
    pub fn allows(&self, workout_type: Option<&str>) -> bool {
        match (self, workout_type) {
            (SportEligibility::Any, _) | (_, None) => true,
            (SportEligibility::AllowList(allowed), Some(wt)) => {
                allowed.contains(&wt.to_ascii_lowercase())
            }
        }
    }
}

/// Full filter tuple for a paged post view
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostFilter {
    pub kind: Option<PostKind>,
    pub time: TimeWindow,
    pub category: Category,
    pub eligibility: SportEligibility,
    pub search: Option<String>,
}

impl PostFilter {
    pub fn new(time: TimeWindow) -> Self {
        Self {
            kind: None,
            time,
            category: Category::All,
            eligibility: SportEligibility::Any,
            search: None,
        }
    }

    pub fn kind(mut self, kind: PostKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn eligibility(mut self, eligibility: SportEligibility) -> Self {
        self.eligibility = eligibility;
        self
    }

    /// Blank terms are ignored
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = Some(search.trim().to_string()).filter(|s| !s.is_empty());
        self
    }

    /// Apply the client filter: eligibility, category, time window, search
    pub fn matches(&self, post: &ForumPost, today: NaiveDate) -> bool {
        let workout_type = post.workout_type.as_deref();

        self.kind.is_none_or(|k| post.kind() == Some(k))
            && self.eligibility.allows(workout_type)
            && self.category.matches(workout_type)
            && self.in_window(post, today)
            && self.matches_search(post)
    }

    fn in_window(&self, post: &ForumPost, today: NaiveDate) -> bool {
        match (self.time, post.effective_date()) {
            (TimeWindow::Past, Some(day)) => day < today,
            (TimeWindow::Upcoming, Some(day)) => day >= today,
            (_, None) => false,
        }
    }

    fn matches_search(&self, post: &ForumPost) -> bool {
        let Some(ref term) = self.search else {
            return true;
        };
        let term = term.to_lowercase();
        post.title.to_lowercase().contains(&term) || post.content.to_lowercase().contains(&term)
    }

    /// Past: newest first. Upcoming: soonest first. Ties by time, then id.
    pub fn compare(&self, a: &ForumPost, b: &ForumPost) -> Ordering {
        let ord = a
            .effective_date()
            .cmp(&b.effective_date())
            .then_with(|| a.time.cmp(&b.time))
            .then_with(|| a.id.cmp(&b.id));

        match self.time {
            TimeWindow::Past => ord.reverse(),
            TimeWindow::Upcoming => ord,
        }
    }

    /// Filter and sort `posts` for this view
    pub fn apply(&self, posts: &[ForumPost], today: NaiveDate) -> Vec<ForumPost> {
        let mut matched: Vec<ForumPost> = posts
            .iter()
            .filter(|p| self.matches(p, today))
            .cloned()
            .collect();
        matched.sort_by(|a, b| self.compare(a, b));
        matched
    }

    /// Remote query for one page, carrying every criterion the server
    /// understands
    pub fn remote_query(&self, page: usize, limit: usize) -> ListQuery {
        let mut query = ListQuery::new().time(self.time).page(page).limit(limit);
        if let Some(kind) = self.kind {
            query = query.kind(kind);
        }
        if let Some(wt) = self.category.native_workout_type() {
            query = query.workout_type(wt);
        }
        if let Some(ref search) = self.search {
            query = query.search(search.clone());
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{ForumPostBuilder, workout};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_category_mapping() {
        assert!(Category::Bike.matches(Some("spin")));
        assert!(Category::Bike.matches(Some("Indoor-Trainer")));
        assert!(!Category::Bike.matches(Some("run")));
        assert!(!Category::Swim.matches(None));
        assert!(Category::All.matches(None));

        assert_eq!(Category::Swim.native_workout_type(), Some("swim"));
        assert_eq!(Category::Bike.native_workout_type(), None);
        assert_eq!(Category::All.native_workout_type(), None);
    }

    #[test]
    fn test_eligibility() {
        let elig = SportEligibility::from_sports(["Swim", "run", " "]);
        assert!(elig.allows(Some("swim")));
        assert!(!elig.allows(Some("spin")));
        assert!(elig.allows(None));

        assert_eq!(SportEligibility::from_sports(Vec::<String>::new()), SportEligibility::Any);
    }

    #[test]
    fn test_time_window_boundary() {
        let past = PostFilter::new(TimeWindow::Past);
        let upcoming = PostFilter::new(TimeWindow::Upcoming);

        let yesterday = workout(1, "run", "2025-06-14");
        let on_today = workout(2, "run", "2025-06-15");

        assert!(past.matches(&yesterday, today()));
        assert!(!past.matches(&on_today, today()));
        assert!(upcoming.matches(&on_today, today()));
        assert!(!upcoming.matches(&yesterday, today()));
    }

    #[test]
    fn test_undated_post_uses_created_at() {
        let post = ForumPostBuilder::new(1)
            .created_at("2025-06-01T10:00:00Z")
            .build();
        assert!(PostFilter::new(TimeWindow::Past).matches(&post, today()));

        let mut undated = post.clone();
        undated.created_at = None;
        assert!(!PostFilter::new(TimeWindow::Past).matches(&undated, today()));
        assert!(!PostFilter::new(TimeWindow::Upcoming).matches(&undated, today()));
    }

    #[test]
    fn test_search_covers_title_and_content() {
        let filter = PostFilter::new(TimeWindow::Past).search("FINS");
        let in_content = ForumPostBuilder::new(1)
            .date("2025-06-01")
            .content("bring fins")
            .build();
        let miss = ForumPostBuilder::new(2).date("2025-06-01").build();

        assert!(filter.matches(&in_content, today()));
        assert!(!filter.matches(&miss, today()));
    }

    #[test]
    fn test_ordering() {
        let posts = vec![
            workout(1, "run", "2025-06-10"),
            ForumPostBuilder::new(2).date("2025-06-12").time("18:00").build(),
            ForumPostBuilder::new(3).date("2025-06-12").time("06:00").build(),
            workout(4, "run", "2025-06-01"),
        ];

        let past = PostFilter::new(TimeWindow::Past).apply(&posts, today());
        assert_eq!(past.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 3, 1, 4]);

        let later = today();
        let upcoming_posts: Vec<ForumPost> = vec![
            workout(5, "run", "2025-06-20"),
            ForumPostBuilder::new(6).on(later).time("07:00").build(),
            ForumPostBuilder::new(7).on(later).time("06:00").build(),
        ];
        let upcoming = PostFilter::new(TimeWindow::Upcoming).apply(&upcoming_posts, today());
        assert_eq!(upcoming.iter().map(|p| p.id).collect::<Vec<_>>(), vec![7, 6, 5]);
    }

    #[test]
    fn test_remote_query_only_sends_single_subtype() {
        let swim = PostFilter::new(TimeWindow::Past).category(Category::Swim);
        assert_eq!(swim.remote_query(2, 20).workout_type.as_deref(), Some("swim"));

        let bike = PostFilter::new(TimeWindow::Past).category(Category::Bike);
        let query = bike.remote_query(1, 20);
        assert!(query.workout_type.is_none());
        assert_eq!(query.time, Some(TimeWindow::Past));
        assert_eq!(query.limit, 20);
    }
}
