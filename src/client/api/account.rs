//! Account API trait

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::client::models::{Acknowledgement, Preferences, ResourceId, User};
use crate::error::Result;

/// Operations on the signed-in user's account
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Fetch the current user profile
    async fn me(&self) -> Result<User>;

    /// Change the password; `confirm` defaults to `new_password`
    async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirm: Option<&str>,
    ) -> Result<Acknowledgement>;

    /// Update language, currency and timezone preferences
    async fn update_preferences(&self, preferences: &Preferences) -> Result<Preferences>;

    /// Partially update a user (PATCH)
    async fn update_user(&self, id: &ResourceId, patch: &Map<String, Value>) -> Result<User>;

    /// Replace a user (PUT)
    async fn replace_user(&self, id: &ResourceId, user: &Value) -> Result<User>;

    /// Patch the current user's profile, resolving their id first
    async fn update_profile(&self, patch: &Map<String, Value>) -> Result<User>;

    /// Erase the account and end the session
    async fn erase_account(&self) -> Result<Acknowledgement>;
}
