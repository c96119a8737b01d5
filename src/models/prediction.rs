use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Prediction {
    pub id: i64,
    pub user_id: i64,
    pub dataset_id: i64,
    pub model_id: i64,
    pub project_id: i64,
    pub result_file_path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub user_id: i64,
    pub dataset_id: i64,
    pub model_id: i64,
    pub project_id: i64,
    pub result_file_path: String,
}
