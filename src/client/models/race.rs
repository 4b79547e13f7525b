//! Race models

use serde::{Deserialize, Serialize};

/// A race on the club calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    /// Race ID
    pub id: i64,

    /// Race name
    #[serde(default)]
    pub name: String,

    /// Race date (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Venue or city
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Distance label ("sprint", "olympic", "70.3", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,

    /// Creation timestamp (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
