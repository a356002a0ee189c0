//! Authentication API trait

use async_trait::async_trait;

use crate::client::models::{Acknowledgement, RegisterRequest, User};
use crate::error::Result;

/// Public authentication endpoints; none of these need a session
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Sign in and store the issued token pair
    async fn login(&self, email: &str, password: &str) -> Result<()>;

    /// Create an account; a verification email follows
    async fn register(&self, request: &RegisterRequest) -> Result<User>;

    /// Confirm the email address with the emailed token
    async fn verify_email(&self, token: &str) -> Result<Acknowledgement>;

    /// Ask for a password reset email
    async fn request_password_reset(&self, email: &str) -> Result<Acknowledgement>;

    /// Set a new password with the emailed reset token
    async fn confirm_password_reset(&self, token: &str, new_password: &str)
    -> Result<Acknowledgement>;
}
