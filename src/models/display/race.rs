//! Race display model

use serde::Serialize;
use tabled::Tabled;

use super::common::{EMPTY, format_day};
use crate::client::Race;

/// Race display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RaceDisplay {
    #[tabled(rename = "RACE ID")]
    pub id: i64,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "DATE")]
    pub date: String,

    #[tabled(rename = "LOCATION")]
    pub location: String,

    #[tabled(rename = "DISTANCE")]
    pub distance: String,
}

impl From<&Race> for RaceDisplay {
    fn from(race: &Race) -> Self {
        Self {
            id: race.id,
            name: race.name.clone(),
            date: format_day(race.date.as_deref()),
            location: race.location.clone().unwrap_or_else(|| EMPTY.to_string()),
            distance: race.distance.clone().unwrap_or_else(|| EMPTY.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::race;

    #[test]
    fn test_race_display_from_race() {
        let mut r = race(9, "Lake Tri", "2025-08-02");
        r.location = Some("Lake Placid".to_string());

        let display = RaceDisplay::from(&r);

        assert_eq!(display.id, 9);
        assert_eq!(display.name, "Lake Tri");
        assert_eq!(display.date, "2025-08-02");
        assert_eq!(display.location, "Lake Placid");
        assert_eq!(display.distance, "olympic");
    }

    #[test]
    fn test_race_display_missing_fields() {
        let mut r = race(1, "Sprint", "2025-05-01");
        r.date = None;
        r.distance = None;

        let display = RaceDisplay::from(&r);
        assert_eq!(display.date, "-");
        assert_eq!(display.distance, "-");
        assert_eq!(display.location, "-");
    }
}
