use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, FromRow, Row};

/// Where a dataset's rows live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetContent {
    Inline(Vec<u8>),
    FilePath(String),
}

impl DatasetContent {
    pub fn inline_bytes(&self) -> Option<&[u8]> {
        match self {
            DatasetContent::Inline(bytes) => Some(bytes),
            DatasetContent::FilePath(_) => None,
        }
    }

    pub fn file_path(&self) -> Option<&str> {
        match self {
            DatasetContent::Inline(_) => None,
            DatasetContent::FilePath(path) => Some(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub content: DatasetContent,
    pub uploaded_at: DateTime<Utc>,
}

// Stored as two nullable columns, exactly one of which is set.
impl<'r> FromRow<'r, SqliteRow> for Dataset {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let inline: Option<Vec<u8>> = row.try_get("content")?;
        let file_path: Option<String> = row.try_get("file_path")?;
        let content = match (inline, file_path) {
            (Some(bytes), None) => DatasetContent::Inline(bytes),
            (None, Some(path)) => DatasetContent::FilePath(path),
            _ => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "content".into(),
                    source: "dataset must have exactly one of content or file_path".into(),
                })
            }
        };

        Ok(Dataset {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            content,
            uploaded_at: row.try_get("uploaded_at")?,
        })
    }
}

/// Dataset as returned over the API; inline bytes are summarised by size.
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub content_size: Option<usize>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Dataset> for DatasetSummary {
    fn from(dataset: Dataset) -> Self {
        DatasetSummary {
            id: dataset.id,
            user_id: dataset.user_id,
            name: dataset.name,
            description: dataset.description,
            file_path: dataset.content.file_path().map(str::to_string),
            content_size: dataset.content.inline_bytes().map(<[u8]>::len),
            uploaded_at: dataset.uploaded_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewDataset {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub content: DatasetContent,
}

#[derive(Debug, Clone, Default)]
pub struct DatasetChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<DatasetContent>,
}
