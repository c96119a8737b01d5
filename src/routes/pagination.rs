use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::models::Page;

/// `?limit=&offset=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn page(&self) -> AppResult<Page> {
        let limit = self.limit.unwrap_or(Page::DEFAULT_LIMIT);
        let offset = self.offset.unwrap_or(0);
        if !(1..=Page::MAX_LIMIT).contains(&limit) {
            return Err(AppError::validation(format!(
                "limit must be between 1 and {}",
                Page::MAX_LIMIT
            )));
        }
        if offset < 0 {
            return Err(AppError::validation("offset must not be negative"));
        }
        Ok(Page::new(limit, offset))
    }
}
