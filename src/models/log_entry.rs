use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of a project's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LogEntry {
    pub id: i64,
    pub user_id: i64,
    pub project_id: i64,
    pub action: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub user_id: i64,
    pub project_id: i64,
    pub action: String,
    pub details: Option<String>,
}

impl NewLogEntry {
    pub fn new(user_id: i64, project_id: i64, action: &str, details: impl Into<String>) -> Self {
        NewLogEntry {
            user_id,
            project_id,
            action: action.to_string(),
            details: Some(details.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogChanges {
    pub action: Option<String>,
    pub details: Option<String>,
}
