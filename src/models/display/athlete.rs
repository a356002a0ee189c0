//! Athlete directory display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{truncate_string, yes_no};
use crate::client::models::{Athlete, Follow};
use crate::output::formatters::{format_iso_local, or_dash};

/// Athlete display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct AthleteDisplay {
    #[tabled(rename = "ATHLETE ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "SPORT")]
    pub sport: String,

    #[tabled(rename = "COUNTRY")]
    pub country: String,

    #[tabled(rename = "FOLLOWERS")]
    pub followers: String,

    /// Only known for signed-in requests
    #[tabled(rename = "FOLLOWING")]
    pub following: String,
}

impl From<Athlete> for AthleteDisplay {
    fn from(athlete: Athlete) -> Self {
        Self {
            id: athlete.id.to_string(),
            name: truncate_string(&or_dash(athlete.name.as_deref()), 32),
            sport: or_dash(athlete.sport.as_deref()),
            country: or_dash(athlete.country.as_deref()),
            followers: athlete
                .followers_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "--".to_string()),
            following: yes_no(athlete.is_followed),
        }
    }
}

impl AthleteDisplay {
    /// Label/value pairs for the pretty record view
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("ID", self.id.as_str()),
            ("Sport", self.sport.as_str()),
            ("Country", self.country.as_str()),
            ("Followers", self.followers.as_str()),
            ("Following", self.following.as_str()),
        ]
    }
}

/// Follow record display model.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct FollowDisplay {
    #[tabled(rename = "ATHLETE ID")]
    pub athlete: String,

    #[tabled(rename = "FOLLOW ID")]
    pub id: String,

    #[tabled(rename = "SINCE")]
    pub since: String,
}

impl From<Follow> for FollowDisplay {
    fn from(follow: Follow) -> Self {
        Self {
            athlete: follow.athlete.to_string(),
            id: follow
                .id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "--".to_string()),
            since: follow
                .created_at
                .as_deref()
                .map(format_iso_local)
                .unwrap_or_else(|| "--".to_string()),
        }
    }
}
