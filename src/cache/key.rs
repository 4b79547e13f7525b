//! Structured cache keys with canonical rendering

use std::collections::BTreeMap;
use std::fmt;

/// Resource family a cache key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    ForumPosts,
    Workout,
    WorkoutSignups,
    WorkoutWaitlist,
    Races,
    RaceSignups,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::ForumPosts => "forumPosts",
            ResourceKind::Workout => "workout",
            ResourceKind::WorkoutSignups => "workoutSignups",
            ResourceKind::WorkoutWaitlist => "workoutWaitlist",
            ResourceKind::Races => "races",
            ResourceKind::RaceSignups => "raceSignups",
        }
    }
}

/// Identity of a cached query result.
///
/// Parameters are kept sorted, so two keys built from the same parameters in
/// a different order are equal and render identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    resource: ResourceKind,
    params: BTreeMap<String, String>,
}

impl CacheKey {
    /// Key for a resource with no parameters
    pub fn new(resource: ResourceKind) -> Self {
        Self {
            resource,
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }
}

impl fmt::Display for CacheKey {
    /// Renders as `forumPosts_{type:event}` / `races_{}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{{", self.resource.as_str())?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", k, v)?;
        }
        f.write_str("}")
    }
}
