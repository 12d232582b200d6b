//! Wire types for the status endpoint.
//!
//! Field names follow the endpoint's camelCase JSON. Only the task lists are
//! optional; any other missing field makes the body malformed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Point-in-time view of token, memory, and task state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// When the backend produced the snapshot
    pub timestamp: String,
    pub memory: MemoryStats,
    pub tokens: TokenStats,
    pub system: SystemActivity,
}

/// Memory-store statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    /// Number of active memories
    pub total: u64,
    /// Count per priority tier (`URGENT`, `DAILY`, ...)
    pub by_priority: BTreeMap<String, u64>,
    /// Most recent memories
    pub recent: Vec<MemoryItem>,
}

/// A single memory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryItem {
    pub id: String,
    pub content: String,
    pub priority: String,
    pub created: String,
}

/// Token spend for the current day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStats {
    /// Dollars spent today
    pub spent: f64,
    /// Daily budget in dollars
    pub budget: f64,
    /// Percent of budget used, as reported (may exceed 100)
    pub percent: f64,
    /// Status tier label (`OK`, `WARNING`, `CRITICAL`, `NO DATA`)
    pub status: String,
    /// Requests made today
    pub requests: u64,
    /// Spend per model
    pub by_model: BTreeMap<String, ModelUsage>,
}

/// Spend for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelUsage {
    pub cost: f64,
    pub requests: u64,
}

/// Bot activity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemActivity {
    /// Last time the bot did anything, if known
    #[serde(default)]
    pub last_active: Option<String>,
    #[serde(default)]
    pub active_tasks: Vec<String>,
    #[serde(default)]
    pub recent_completed_tasks: Vec<String>,
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_sample() {
        let snapshot = fixtures::sample();
        assert_eq!(snapshot.memory.total, 12);
        assert_eq!(snapshot.memory.by_priority.get("URGENT"), Some(&3));
        assert_eq!(snapshot.memory.recent[0].priority, "URGENT");
        assert_eq!(snapshot.tokens.requests, 42);
        assert_eq!(snapshot.tokens.by_model["claude-opus"].requests, 42);
        assert_eq!(
            snapshot.system.last_active.as_deref(),
            Some("2026-01-15T09:29:00Z")
        );
        assert_eq!(snapshot.system.active_tasks, vec!["Scrape listings"]);
    }

    #[test]
    fn test_task_lists_default_when_absent() {
        let json = r#"{
            "timestamp": "t",
            "memory": {"total": 0, "byPriority": {}, "recent": []},
            "tokens": {"spent": 0, "budget": 5, "percent": 0, "status": "NO DATA", "requests": 0, "byModel": {}},
            "system": {"lastActive": null}
        }"#;
        let snapshot: StatusSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.system.active_tasks.is_empty());
        assert!(snapshot.system.recent_completed_tasks.is_empty());
        assert!(snapshot.system.last_active.is_none());
    }

    #[test]
    fn test_missing_section_is_error() {
        let json = r#"{"timestamp": "t", "memory": {"total": 0, "byPriority": {}, "recent": []}}"#;
        assert!(serde_json::from_str::<StatusSnapshot>(json).is_err());
    }
}
