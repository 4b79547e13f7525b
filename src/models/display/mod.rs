//! Display model implementations for table and JSON output
//!
//! Display models transform club API types into CLI-friendly formats
//! with appropriate column names and serialization.

mod common;
mod post;
mod race;
mod roster;

pub use post::{PostDisplay, workout_detail};
pub use race::RaceDisplay;
pub use roster::{RaceSignupDisplay, SignupDisplay, WaitlistDisplay};
