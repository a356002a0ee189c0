//! Athlete directory API trait

use async_trait::async_trait;

use crate::client::models::{Athlete, Follow, ResourceId};
use crate::client::pagination::{Page, PageParams};
use crate::error::Result;

/// Athlete directory and follow operations
#[async_trait]
pub trait AthleteApi: Send + Sync {
    /// One page of the public athlete directory.
    ///
    /// Sends the bearer token when signed in so `is_followed` is filled.
    async fn list_athletes(&self, params: PageParams) -> Result<Page<Athlete>>;

    /// One athlete profile, by id or by profile slug.
    ///
    /// Public like the directory. `None` when no athlete matches.
    async fn athlete(&self, id: &str) -> Result<Option<Athlete>>;

    /// Follow an athlete
    async fn follow(&self, athlete: &ResourceId) -> Result<Follow>;

    /// Stop following an athlete
    async fn unfollow(&self, athlete: &ResourceId) -> Result<()>;

    /// Athletes the current user follows
    async fn followed_athletes(&self) -> Result<Vec<Athlete>>;
}
