//! Authentication models

use serde::{Deserialize, Serialize};

/// Credentials posted to the login endpoint
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair issued on login
#[derive(Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Body of a successful refresh.
///
/// `refresh` is only present when the backend rotates refresh tokens.
#[derive(Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// New account fields for the register endpoint
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Check a new password against the account password rules.
///
/// Returns the first rule the password breaks.
pub fn check_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number");
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return Err("Password must contain at least one special character (@$!%*?&)");
    }
    Ok(())
}

impl RegisterRequest {
    /// Client-side validation run before the request is sent
    pub fn validate(&self) -> Result<(), String> {
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(format!("Invalid email format: {}", self.email)),
        }
        for (label, value) in [("First name", &self.first_name), ("Last name", &self.last_name)] {
            if let Some(v) = value {
                if v.trim().chars().count() < 2 {
                    return Err(format!("{} is required", label));
                }
            }
        }
        if let Some(phone) = &self.phone_number {
            if phone.chars().filter(|c| c.is_ascii_digit()).count() < 8 {
                return Err("Invalid phone number".to_string());
            }
        }
        check_password_strength(&self.password).map_err(str::to_string)
    }
}

/// Body of the change-password endpoint
#[derive(Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}
