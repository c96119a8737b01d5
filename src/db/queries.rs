//! Parameterized statements, one module per table.
//!
//! Every function takes a `&mut SqliteConnection` so the same operation runs
//! against a pooled connection (`Store::run`) or inside a transaction
//! (`Store::run_in_transaction`).

pub mod dataset;
pub mod log_entry;
pub mod model;
pub mod prediction;
pub mod project;
pub mod user;

use sqlx::sqlite::SqliteQueryResult;

use crate::errors::{AppError, AppResult};

/// Maps a statement that touched no rows to `NotFound`.
fn expect_affected(
    result: SqliteQueryResult,
    entity: &'static str,
    id: impl ToString,
) -> AppResult<()> {
    if result.rows_affected() == 0 {
        return Err(AppError::not_found(entity, id));
    }
    Ok(())
}
