//! Athlete directory and follow models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ResourceId;

/// Athlete profile from the public directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    pub id: ResourceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<u64>,

    /// Only filled when the request carried a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_followed: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Follow relation between the current user and an athlete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,

    pub athlete: ResourceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of the follow endpoint
#[derive(Debug, Clone, Serialize)]
pub struct FollowRequest {
    pub athlete: ResourceId,
}
