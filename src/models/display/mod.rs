//! Display model implementations for table and JSON output
//!
//! Display models transform API response types into CLI-friendly formats
//! with appropriate column names and serialization.

mod athlete;
mod common;
mod user;

pub use athlete::{AthleteDisplay, FollowDisplay};
pub use user::UserDisplay;
