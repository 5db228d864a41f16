use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEV_ANON_ID: &str = "dev_anon";

/// Decoded token payload. Kept as an open map since the identity provider
/// decides which claims are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(pub Map<String, Value>);

impl Claims {
    /// Fixed identity used while the development bypass is active.
    pub fn dev_anonymous() -> Self {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(DEV_ANON_ID.to_string()));
        map.insert("email".to_string(), Value::Null);
        Self(map)
    }

    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    /// `sub` for provider tokens, `id` for the development identity.
    pub fn subject(&self) -> Option<&str> {
        self.get("sub")
            .or_else(|| self.get("id"))
            .and_then(Value::as_str)
    }

    pub fn email(&self) -> Option<&str> {
        self.get("email").and_then(Value::as_str)
    }
}
