//! SponsorsClub API client
//!
//! [`SponsorsClubClient`] owns the transport and the refresh-and-retry logic.
//! The resource endpoints are exposed through the traits in [`api`], which
//! the CLI handlers program against.

pub mod api;
mod endpoints;
pub mod models;
pub mod pagination;
pub mod sponsorsclub;

pub use api::{AccountApi, AthleteApi, AuthApi};
pub use pagination::{Page, PageParams};
pub use sponsorsclub::SponsorsClubClient;
