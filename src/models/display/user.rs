//! Account display models

use serde::Serialize;
use tabled::Tabled;

use crate::client::models::User;
use crate::output::formatters::or_dash;

/// Current user display model for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct UserDisplay {
    #[tabled(rename = "USER ID")]
    pub id: String,

    #[tabled(rename = "EMAIL")]
    pub email: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "COUNTRY")]
    pub country: String,

    #[tabled(rename = "PLAN")]
    pub plan: String,

    #[tabled(rename = "VERIFIED")]
    pub verified: String,
}

impl From<&User> for UserDisplay {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.display_name(),
            country: or_dash(user.country.as_deref()),
            plan: or_dash(user.subscription_plan.as_deref()),
            verified: if user.is_verified { "yes" } else { "no" }.to_string(),
        }
    }
}

impl UserDisplay {
    /// Label/value pairs for the pretty record view
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("ID", self.id.as_str()),
            ("Email", self.email.as_str()),
            ("Name", self.name.as_str()),
            ("Country", self.country.as_str()),
            ("Plan", self.plan.as_str()),
            ("Verified", self.verified.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_display() {
        let user: User = serde_json::from_str(
            r#"{"id": "u-1", "email": "coach@example.com", "first_name": "Léa",
                "subscription_plan": "premium", "is_verified": true}"#,
        )
        .unwrap();

        let display = UserDisplay::from(&user);
        assert_eq!(display.name, "Léa");
        assert_eq!(display.plan, "premium");
        assert_eq!(display.country, "--");
        assert_eq!(display.fields()[5], ("Verified", "yes"));
    }
}
