use serde::Deserialize;

use crate::errors::AppResult;
use crate::models::{ModelChanges, NewModel};
use crate::routes::validation;

#[derive(Deserialize)]
pub struct CreateModelRequest {
    pub name: String,
    pub description: Option<String>,
    pub file_path: String,
}

impl CreateModelRequest {
    pub fn into_new(self, user_id: i64) -> AppResult<NewModel> {
        Ok(NewModel {
            user_id,
            name: validation::required("name", &self.name)?,
            description: validation::optional(self.description),
            file_path: validation::required("file_path", &self.file_path)?,
        })
    }
}

#[derive(Deserialize)]
pub struct UpdateModelRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub file_path: Option<String>,
}

impl UpdateModelRequest {
    pub fn into_changes(self) -> AppResult<ModelChanges> {
        Ok(ModelChanges {
            name: self
                .name
                .map(|name| validation::required("name", &name))
                .transpose()?,
            description: validation::optional(self.description),
            file_path: self
                .file_path
                .map(|path| validation::required("file_path", &path))
                .transpose()?,
        })
    }
}
