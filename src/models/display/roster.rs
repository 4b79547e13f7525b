//! Signup and waitlist display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{EMPTY, format_day, member_name};
use crate::client::{RaceSignup, WaitlistEntry, WorkoutSignup};

/// Workout signup display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SignupDisplay {
    #[tabled(rename = "MEMBER")]
    pub member: String,

    #[tabled(rename = "SIGNED UP")]
    pub signed_up: String,
}

impl From<&WorkoutSignup> for SignupDisplay {
    fn from(signup: &WorkoutSignup) -> Self {
        Self {
            member: member_name(signup.user_name.as_deref(), signup.user_id),
            signed_up: format_day(signup.signed_up_at.as_deref()),
        }
    }
}

/// Waitlist display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct WaitlistDisplay {
    #[tabled(rename = "POS")]
    pub position: String,

    #[tabled(rename = "MEMBER")]
    pub member: String,

    #[tabled(rename = "JOINED")]
    pub joined: String,
}

impl From<&WaitlistEntry> for WaitlistDisplay {
    fn from(entry: &WaitlistEntry) -> Self {
        Self {
            position: entry
                .position
                .map(|p| p.to_string())
                .unwrap_or_else(|| EMPTY.to_string()),
            member: member_name(entry.user_name.as_deref(), entry.user_id),
            joined: format_day(entry.joined_at.as_deref()),
        }
    }
}

/// Race signup display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RaceSignupDisplay {
    #[tabled(rename = "MEMBER")]
    pub member: String,

    #[tabled(rename = "SIGNED UP")]
    pub signed_up: String,
}

impl From<&RaceSignup> for RaceSignupDisplay {
    fn from(signup: &RaceSignup) -> Self {
        Self {
            member: member_name(signup.user_name.as_deref(), signup.user_id),
            signed_up: format_day(signup.created_at.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{race_signup, signup, waitlist_entry};

    #[test]
    fn test_signup_display() {
        let mut s = signup(1, 10, 7);
        s.signed_up_at = Some("2025-06-01T08:00:00Z".to_string());

        let display = SignupDisplay::from(&s);
        assert_eq!(display.member, "Member 7");
        assert_eq!(display.signed_up, "2025-06-01");
    }

    #[test]
    fn test_waitlist_display_position() {
        let display = WaitlistDisplay::from(&waitlist_entry(2, 10, 8, 3));
        assert_eq!(display.position, "3");
        assert_eq!(display.member, "Member 8");
        assert_eq!(display.joined, "-");
    }

    #[test]
    fn test_race_signup_display_without_name() {
        let display = RaceSignupDisplay::from(&race_signup(1, 4, 21));
        assert_eq!(display.member, "member #21");
    }
}
