use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::models::{DatasetChanges, DatasetContent, NewDataset};
use crate::routes::validation;

/// Exactly one of `content` (inline text, e.g. CSV) or `file_path` is required.
#[derive(Deserialize)]
pub struct CreateDatasetRequest {
    pub name: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub file_path: Option<String>,
}

impl CreateDatasetRequest {
    pub fn into_new(self, user_id: i64) -> AppResult<NewDataset> {
        let content = content_from(self.content, self.file_path)?
            .ok_or_else(|| AppError::validation("either content or file_path is required"))?;
        Ok(NewDataset {
            user_id,
            name: validation::required("name", &self.name)?,
            description: validation::optional(self.description),
            content,
        })
    }
}

#[derive(Deserialize)]
pub struct UpdateDatasetRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub file_path: Option<String>,
}

impl UpdateDatasetRequest {
    pub fn into_changes(self) -> AppResult<DatasetChanges> {
        let name = match self.name {
            Some(name) => Some(validation::required("name", &name)?),
            None => None,
        };
        Ok(DatasetChanges {
            name,
            description: validation::optional(self.description),
            content: content_from(self.content, self.file_path)?,
        })
    }
}

fn content_from(
    content: Option<String>,
    file_path: Option<String>,
) -> AppResult<Option<DatasetContent>> {
    match (content, validation::optional(file_path)) {
        (Some(_), Some(_)) => Err(AppError::validation(
            "content and file_path are mutually exclusive",
        )),
        (Some(text), None) => Ok(Some(DatasetContent::Inline(text.into_bytes()))),
        (None, Some(path)) => Ok(Some(DatasetContent::FilePath(path))),
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(content: Option<&str>, file_path: Option<&str>) -> CreateDatasetRequest {
        CreateDatasetRequest {
            name: "iris".into(),
            description: None,
            content: content.map(str::to_string),
            file_path: file_path.map(str::to_string),
        }
    }

    #[test]
    fn content_source_must_be_unique() {
        assert!(create(None, None).into_new(1).is_err());
        assert!(create(Some("a,b"), Some("/x.csv")).into_new(1).is_err());

        let inline = create(Some("a,b"), None).into_new(1).unwrap();
        assert_eq!(inline.content, DatasetContent::Inline(b"a,b".to_vec()));
        let path = create(None, Some("/x.csv")).into_new(1).unwrap();
        assert_eq!(path.content, DatasetContent::FilePath("/x.csv".into()));
    }

    #[test]
    fn blank_name_is_rejected() {
        let req = CreateDatasetRequest {
            name: "  ".into(),
            ..create(Some("a"), None)
        };
        assert!(matches!(req.into_new(1), Err(AppError::Validation(_))));
    }
}
