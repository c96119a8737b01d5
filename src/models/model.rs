use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A trained model artifact registered by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Model {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewModel {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub file_path: String,
}

#[derive(Debug, Clone, Default)]
pub struct ModelChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub file_path: Option<String>,
}
