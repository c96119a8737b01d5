use serde::{Deserialize, Serialize};

use crate::models::{DatasetSummary, Model, Project, User};

// Dashboard response
#[derive(Serialize)]
pub struct DashboardResponse {
    pub user: User,
    pub datasets: Vec<DatasetSummary>,
    pub models: Vec<Model>,
    pub projects: Vec<Project>,
}

// Profile update; absent fields are left alone
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}
