use serde_json::Value;
use tokio::sync::RwLock;

use crate::models::domain::UsageEntry;

/// Process-wide, append-only record of tool invocations.
#[derive(Default)]
pub struct UsageLog {
    entries: RwLock<Vec<UsageEntry>>,
}

impl UsageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. Never fails; the id is numbered by position in the log.
    pub async fn record(&self, tool: &str, user: Option<String>, input: Value, result: Value) {
        let mut entries = self.entries.write().await;
        let entry = UsageEntry::new(entries.len() + 1, tool, user, input, result);
        log::debug!("Recorded usage entry {}", entry.id);
        entries.push(entry);
    }

    pub async fn entries(&self) -> Vec<UsageEntry> {
        self.entries.read().await.clone()
    }
}
