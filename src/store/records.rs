//! Collections, secondary indexes and the `Record` trait

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::models::parse_day;
use crate::client::{ForumPost, Race, RaceSignup, User, WaitlistEntry, WorkoutSignup};

/// A table in the local store, one per resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    ForumPosts,
    WorkoutSignups,
    WorkoutWaitlists,
    Races,
    RaceSignups,
    Users,
}

impl Collection {
    /// Every collection, in schema order
    pub const ALL: [Collection; 6] = [
        Collection::ForumPosts,
        Collection::WorkoutSignups,
        Collection::WorkoutWaitlists,
        Collection::Races,
        Collection::RaceSignups,
        Collection::Users,
    ];

    /// SQLite table name
    pub fn table(&self) -> &'static str {
        match self {
            Collection::ForumPosts => "forum_posts",
            Collection::WorkoutSignups => "workout_signups",
            Collection::WorkoutWaitlists => "workout_waitlists",
            Collection::Races => "races",
            Collection::RaceSignups => "race_signups",
            Collection::Users => "users",
        }
    }

    /// Declared secondary indexes
    pub fn indexes(&self) -> &'static [IndexField] {
        match self {
            Collection::ForumPosts => &[
                IndexField::Type,
                IndexField::WorkoutType,
                IndexField::Date,
                IndexField::UserId,
                IndexField::CreatedAt,
            ],
            Collection::WorkoutSignups | Collection::WorkoutWaitlists => {
                &[IndexField::WorkoutId, IndexField::UserId]
            }
            Collection::Races => &[IndexField::Date, IndexField::CreatedAt],
            Collection::RaceSignups => &[IndexField::RaceId, IndexField::UserId],
            Collection::Users => &[IndexField::Role],
        }
    }

    /// Whether `field` is a declared index of this collection
    pub fn has_index(&self, field: IndexField) -> bool {
        self.indexes().contains(&field)
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// Secondary index column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexField {
    Type,
    WorkoutType,
    Date,
    UserId,
    CreatedAt,
    WorkoutId,
    RaceId,
    Role,
}

impl IndexField {
    /// Column name in the collection table
    pub fn column(&self) -> &'static str {
        match self {
            IndexField::Type => "type",
            IndexField::WorkoutType => "workout_type",
            IndexField::Date => "date",
            IndexField::UserId => "user_id",
            IndexField::CreatedAt => "created_at",
            IndexField::WorkoutId => "workout_id",
            IndexField::RaceId => "race_id",
            IndexField::Role => "role",
        }
    }
}

/// A resource that can be persisted in the local store.
///
/// Records are stored verbatim as JSON next to their index columns.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Table this record lives in
    const COLLECTION: Collection;

    /// Server-assigned primary key
    fn id(&self) -> String;

    /// Value of a secondary index column, `None` when absent or undeclared
    fn index_value(&self, field: IndexField) -> Option<String>;
}

/// Normalize a date or datetime to `YYYY-MM-DD` so range lookups compare
/// lexicographically.
fn day_key(value: &str) -> String {
    parse_day(value)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| value.to_string())
}

impl Record for ForumPost {
    const COLLECTION: Collection = Collection::ForumPosts;

    fn id(&self) -> String {
        self.id.to_string()
    }

    fn index_value(&self, field: IndexField) -> Option<String> {
        match field {
            IndexField::Type => self
                .kind()
                .map(|k| k.as_str().to_string())
                .or_else(|| Some(self.post_type.to_ascii_lowercase()).filter(|s| !s.is_empty())),
            IndexField::WorkoutType => self.workout_type.clone(),
            IndexField::Date => self.date.as_deref().map(day_key),
            IndexField::UserId => self.user_id.map(|id| id.to_string()),
            IndexField::CreatedAt => self.created_at.clone(),
            _ => None,
        }
    }
}

impl Record for WorkoutSignup {
    const COLLECTION: Collection = Collection::WorkoutSignups;

    fn id(&self) -> String {
        self.id.to_string()
    }

    fn index_value(&self, field: IndexField) -> Option<String> {
        match field {
            IndexField::WorkoutId => Some(self.workout_id.to_string()),
            IndexField::UserId => Some(self.user_id.to_string()),
            _ => None,
        }
    }
}

impl Record for WaitlistEntry {
    const COLLECTION: Collection = Collection::WorkoutWaitlists;

    fn id(&self) -> String {
        self.id.to_string()
    }

    fn index_value(&self, field: IndexField) -> Option<String> {
        match field {
            IndexField::WorkoutId => Some(self.workout_id.to_string()),
            IndexField::UserId => Some(self.user_id.to_string()),
            _ => None,
        }
    }
}

impl Record for Race {
    const COLLECTION: Collection = Collection::Races;

    fn id(&self) -> String {
        self.id.to_string()
    }

    fn index_value(&self, field: IndexField) -> Option<String> {
        match field {
            IndexField::Date => self.date.as_deref().map(day_key),
            IndexField::CreatedAt => self.created_at.clone(),
            _ => None,
        }
    }
}

impl Record for RaceSignup {
    const COLLECTION: Collection = Collection::RaceSignups;

    fn id(&self) -> String {
        self.id.to_string()
    }

    fn index_value(&self, field: IndexField) -> Option<String> {
        match field {
            IndexField::RaceId => Some(self.race_id.to_string()),
            IndexField::UserId => Some(self.user_id.to_string()),
            _ => None,
        }
    }
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> String {
        self.id.to_string()
    }

    fn index_value(&self, field: IndexField) -> Option<String> {
        match field {
            IndexField::Role => self.role.clone(),
            _ => None,
        }
    }
}
