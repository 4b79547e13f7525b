//! Display models for CLI output
//!
//! This module provides shared display model abstractions for converting
//! club API types into CLI-friendly display formats.

pub mod display;

pub use display::{
    PostDisplay, RaceDisplay, RaceSignupDisplay, SignupDisplay, WaitlistDisplay, workout_detail,
};
