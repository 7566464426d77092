// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// Acknowledgement from `POST /tasks/scrape`.
///
/// The scrape itself runs on the backend's worker queue; `task_id`
/// identifies the queued job.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeTask {
    pub status: String,
    pub task_id: Option<String>,
    pub operator: Option<String>,
}

/// System counters from `GET /stats`, shown in the status line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStats {
    pub total_models: i64,
    pub total_price_records: i64,
    pub db_status: String,
    #[serde(default)]
    pub active_platforms: Vec<String>,
    pub server_time: Option<String>,
}

impl SystemStats {
    pub fn platforms_display(&self) -> String {
        if self.active_platforms.is_empty() {
            "none".to_string()
        } else {
            self.active_platforms.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stats() {
        let json = r#"{
            "total_models": 42,
            "total_price_records": 15321,
            "db_status": "stable",
            "active_platforms": ["Momo", "PChome"],
            "server_time": "2026-08-07T10:00:00"
        }"#;
        let stats: SystemStats = serde_json::from_str(json).expect("parse stats");
        assert_eq!(stats.total_models, 42);
        assert_eq!(stats.platforms_display(), "Momo, PChome");
    }

    #[test]
    fn test_parse_scrape_ack() {
        let json = r#"{"status": "accepted", "task_id": "d6b7c1e2", "operator": "admin"}"#;
        let task: ScrapeTask = serde_json::from_str(json).expect("parse task");
        assert_eq!(task.status, "accepted");
        assert_eq!(task.task_id.as_deref(), Some("d6b7c1e2"));
    }
}
