use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// One record of the in-memory usage log.
#[derive(Clone, Debug, Serialize)]
pub struct UsageEntry {
    pub id: String,
    pub tool: String,
    pub timestamp: DateTime<Utc>,
    /// Raw `Authorization` header the request carried, if any.
    pub user: Option<String>,
    pub input: Value,
    pub result: Value,
}

impl UsageEntry {
    pub fn new(
        position: usize,
        tool: &str,
        user: Option<String>,
        input: Value,
        result: Value,
    ) -> Self {
        Self {
            id: format!("{}-{}", tool, position),
            tool: tool.to_string(),
            timestamp: Utc::now(),
            user,
            input,
            result,
        }
    }
}
