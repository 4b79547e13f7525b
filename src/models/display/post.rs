//! Forum post display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{EMPTY, format_day, truncate_string};
use crate::client::ForumPost;

/// Title column width in list views
const TITLE_WIDTH: usize = 40;

/// Forum post display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct PostDisplay {
    /// Post ID
    #[tabled(rename = "ID")]
    pub id: i64,

    /// Kind and subtype, e.g. "workout/swim"
    #[tabled(rename = "TYPE")]
    #[serde(rename = "type")]
    pub kind: String,

    /// Scheduled date (or creation date)
    #[tabled(rename = "DATE")]
    pub date: String,

    #[tabled(rename = "TIME")]
    pub time: String,

    #[tabled(rename = "TITLE")]
    pub title: String,

    /// Signups, with capacity when capped
    #[tabled(rename = "SPOTS")]
    pub spots: String,
}

impl From<&ForumPost> for PostDisplay {
    fn from(post: &ForumPost) -> Self {
        let kind = match &post.workout_type {
            Some(subtype) => format!("{}/{}", post.post_type, subtype),
            None => post.post_type.clone(),
        };

        Self {
            id: post.id,
            kind,
            date: post
                .effective_date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| EMPTY.to_string()),
            time: post.time.clone().unwrap_or_else(|| EMPTY.to_string()),
            title: truncate_string(&post.title, TITLE_WIDTH),
            spots: format_spots(post),
        }
    }
}

fn format_spots(post: &ForumPost) -> String {
    match post.capacity {
        Some(cap) => format!("{}/{}", post.signup_count, cap),
        None => post.signup_count.to_string(),
    }
}

/// Key/value rows describing a single workout
pub fn workout_detail(post: &ForumPost) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("ID", post.id.to_string()),
        ("Title", post.title.clone()),
        (
            "Type",
            post.workout_type
                .clone()
                .unwrap_or_else(|| post.post_type.clone()),
        ),
        ("Date", format_day(post.date.as_deref())),
        ("Time", post.time.clone().unwrap_or_else(|| EMPTY.to_string())),
        ("Spots", format_spots(post)),
    ];

    if let Some(author) = &post.author_name {
        rows.push(("Author", author.clone()));
    }
    if !post.content.is_empty() {
        rows.push(("Details", post.content.clone()));
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::ForumPostBuilder;

    #[test]
    fn test_post_display_workout() {
        let mut post = ForumPostBuilder::new(12)
            .workout_type("swim")
            .date("2025-06-01")
            .time("06:30")
            .title("Masters swim")
            .build();
        post.capacity = Some(10);
        post.signup_count = 4;

        let display = PostDisplay::from(&post);

        assert_eq!(display.id, 12);
        assert_eq!(display.kind, "workout/swim");
        assert_eq!(display.date, "2025-06-01");
        assert_eq!(display.time, "06:30");
        assert_eq!(display.spots, "4/10");
    }

    #[test]
    fn test_post_display_event_falls_back_to_created_date() {
        let post = ForumPostBuilder::new(3)
            .event()
            .created_at("2025-02-03T10:00:00Z")
            .build();

        let display = PostDisplay::from(&post);

        assert_eq!(display.kind, "event");
        assert_eq!(display.date, "2025-02-03");
        assert_eq!(display.time, "-");
        assert_eq!(display.spots, "0");
    }

    #[test]
    fn test_post_display_truncates_title() {
        let post = ForumPostBuilder::new(1)
            .title("An extremely long workout title that keeps going and going")
            .build();

        let display = PostDisplay::from(&post);
        assert_eq!(display.title.chars().count(), TITLE_WIDTH);
        assert!(display.title.ends_with("..."));
    }

    #[test]
    fn test_workout_detail_rows() {
        let mut post = ForumPostBuilder::new(5)
            .workout_type("run")
            .date("2025-06-20")
            .content("Track session")
            .build();
        post.author_name = Some("Coach".to_string());

        let rows = workout_detail(&post);

        assert!(rows.contains(&("Type", "run".to_string())));
        assert!(rows.contains(&("Date", "2025-06-20".to_string())));
        assert!(rows.contains(&("Author", "Coach".to_string())));
        assert!(rows.contains(&("Details", "Track session".to_string())));
    }
}
