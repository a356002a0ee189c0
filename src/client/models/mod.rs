//! SponsorsClub API data models
//!
//! Models are organized by resource type. Every response model keeps the
//! fields it does not know about in an `extra` map so nothing the backend
//! sends is lost when re-emitted as JSON.

mod athlete;
mod auth;
mod common;
mod user;

pub use athlete::{Athlete, Follow, FollowRequest};
pub use auth::{
    ChangePasswordRequest, LoginRequest, RefreshResponse, RegisterRequest, TokenPair,
    check_password_strength,
};
pub use common::{Acknowledgement, ResourceId};
pub use user::{Preferences, User};
