//! Types shared across resources

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Resource identifier.
///
/// The backend uses UUIDs for most resources but some older endpoints still
/// return integer primary keys; both are kept as their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(pub String);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => ResourceId(n.to_string()),
            Raw::Str(s) => ResourceId(s),
        })
    }
}

/// Body of endpoints that only acknowledge the request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_accepts_int_and_string() {
        let int: ResourceId = serde_json::from_str("17").unwrap();
        let uuid: ResourceId =
            serde_json::from_str("\"0b8e8a57-5d55-4a37-9df4-0e4f3f2b6c11\"").unwrap();

        assert_eq!(int.as_str(), "17");
        assert_eq!(uuid.to_string(), "0b8e8a57-5d55-4a37-9df4-0e4f3f2b6c11");
        assert_eq!(serde_json::to_string(&int).unwrap(), "\"17\"");
    }
}
