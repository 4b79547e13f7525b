//! Club API data models
//!
//! Domain types returned by the club forum API, organized by resource type.
//! They double as the records persisted in the local store.

mod post;
mod race;
mod roster;
mod user;

pub use post::{ForumPost, PostKind, parse_day};
pub use race::Race;
pub use roster::{RaceSignup, WaitlistEntry, WorkoutSignup};
pub use user::User;
