use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid or expired token, or bad credentials
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Uniqueness, foreign-key or check constraint rejected the write
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("database error: {0}")]
    Persistence(#[source] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("failed to hash password: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("background task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),

    #[error("failed to sign token: {0}")]
    Token(#[source] jsonwebtoken::errors::Error),

    #[error("database operation timed out")]
    Timeout,

    /// A unit of work failed and the rollback that followed failed too
    #[error("transaction error: {cause}, rollback error: {rollback}")]
    Rollback {
        cause: Box<AppError>,
        rollback: sqlx::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation()
                    || db_err.is_foreign_key_violation()
                    || db_err.is_check_violation() =>
            {
                Self::ConstraintViolation(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if is_busy(db_err.code().as_deref()) => Self::Timeout,
            sqlx::Error::PoolTimedOut => Self::Timeout,
            _ => Self::Persistence(e),
        }
    }
}

// SQLITE_BUSY and its extended codes: the lock stayed held past the busy timeout.
fn is_busy(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .map_or(false, |c| c & 0xff == 5)
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::ConstraintViolation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Internal detail stays in the server log.
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            match self {
                AppError::Timeout => "Service temporarily unavailable".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(ErrorResponse { error: message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            AppError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ConstraintViolation("dup".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("Invalid token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::not_found("dataset", 7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Persistence(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::Timeout.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn busy_codes_are_timeouts() {
        assert!(is_busy(Some("5")));
        assert!(is_busy(Some("517")));
        assert!(!is_busy(Some("2067")));
        assert!(!is_busy(None));
    }

    #[test]
    fn rollback_error_reports_both_causes() {
        let err = AppError::Rollback {
            cause: Box::new(AppError::not_found("project", 3)),
            rollback: sqlx::Error::PoolClosed,
        };
        let message = err.to_string();
        assert!(message.contains("project not found: 3"));
        assert!(message.contains("rollback error"));
    }

    #[actix_web::test]
    async fn server_errors_hide_details() {
        let err = AppError::Persistence(sqlx::Error::Protocol("secret detail".into()));
        let body = actix_web::body::to_bytes(err.error_response().into_body())
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("secret detail"));
        assert!(body.contains("Internal server error"));
    }
}
