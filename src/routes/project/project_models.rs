use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::models::{DatasetSummary, Model, NewProject, Project, ProjectChanges};
use crate::routes::validation;

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
}

impl CreateProjectRequest {
    pub fn into_new(self, owner_user_id: i64) -> AppResult<NewProject> {
        Ok(NewProject {
            owner_user_id,
            name: validation::required("name", &self.name)?,
            description: validation::optional(self.description),
        })
    }
}

#[derive(Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateProjectRequest {
    pub fn into_changes(self) -> AppResult<ProjectChanges> {
        Ok(ProjectChanges {
            name: self
                .name
                .map(|name| validation::required("name", &name))
                .transpose()?,
            description: validation::optional(self.description),
        })
    }
}

// Project with everything attached to it
#[derive(Serialize)]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub project: Project,
    pub datasets: Vec<DatasetSummary>,
    pub models: Vec<Model>,
}

// Attach/detach response
#[derive(Serialize)]
pub struct MembershipResponse {
    pub success: bool,
    pub message: String,
}
