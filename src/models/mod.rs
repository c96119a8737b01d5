// src/models/mod.rs

pub mod dataset;
pub mod log_entry;
pub mod model;
pub mod prediction;
pub mod project;
pub mod user;

pub use dataset::{Dataset, DatasetChanges, DatasetContent, DatasetSummary, NewDataset};
pub use log_entry::{LogChanges, LogEntry, NewLogEntry};
pub use model::{Model, ModelChanges, NewModel};
pub use prediction::{NewPrediction, Prediction};
pub use project::{NewProject, Project, ProjectChanges};
pub use user::{NewUser, User, UserChanges};

/// Limit/offset window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(limit: i64, offset: i64) -> Self {
        Page { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::new(Page::DEFAULT_LIMIT, 0)
    }
}
