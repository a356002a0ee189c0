//! API trait definitions split by responsibility
//!
//! - [`AuthApi`] - Sign-in, registration and password recovery
//! - [`AccountApi`] - The signed-in user's own account
//! - [`AthleteApi`] - Athlete directory and follows

mod account;
mod athlete;
mod auth;

pub use account::AccountApi;
pub use athlete::AthleteApi;
pub use auth::AuthApi;
