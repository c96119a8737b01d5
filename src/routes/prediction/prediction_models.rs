use serde::Deserialize;

use crate::errors::AppResult;
use crate::models::NewPrediction;
use crate::routes::validation;

#[derive(Deserialize)]
pub struct CreatePredictionRequest {
    pub project_id: i64,
    pub dataset_id: i64,
    pub model_id: i64,
    pub result_file_path: String,
}

impl CreatePredictionRequest {
    pub fn into_new(self, user_id: i64) -> AppResult<NewPrediction> {
        Ok(NewPrediction {
            user_id,
            dataset_id: self.dataset_id,
            model_id: self.model_id,
            project_id: self.project_id,
            result_file_path: validation::required("result_file_path", &self.result_file_path)?,
        })
    }
}

#[derive(Deserialize)]
pub struct UpdatePredictionRequest {
    pub result_file_path: String,
}

impl UpdatePredictionRequest {
    pub fn result_file_path(&self) -> AppResult<String> {
        validation::required("result_file_path", &self.result_file_path)
    }
}
