use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Message returned to clients for every 500. The cause is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";
/// Message returned for every rejected identity, whatever the cause.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
/// Message returned for a failed login, whether the email or the password was wrong.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";

/// Startup configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Credential service failures (hashing and bearer tokens).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    ExpiredToken,
}

/// Repository failures. `NotFound` is kept distinct from every other storage error.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepoError::Conflict(db_err.message().to_string())
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                RepoError::Constraint(db_err.message().to_string())
            }
            other => RepoError::Database(other),
        }
    }
}

/// Errors surfaced by use cases. They carry the raw underlying error; translation
/// to a status code happens only in the handlers.
#[derive(Debug, Error)]
pub enum UsecaseError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid page: page_id={page_id}, page_size={page_size}")]
    InvalidPage { page_id: i64, page_size: i64 },
}

impl UsecaseError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UsecaseError::Repo(RepoError::NotFound))
    }
}

/// ApiError
///
/// The client-visible failure: a status code and a message string serialized as the
/// JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS_MESSAGE)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    /// Translates a use case failure after authorization. A rejected page window is
    /// the caller's fault (400); everything else collapses into a 500 whose cause is
    /// only logged under `op`.
    pub fn from_usecase(op: &str, err: UsecaseError) -> Self {
        match err {
            UsecaseError::InvalidPage { .. } => Self::bad_request(err.to_string()),
            other => {
                tracing::error!("{} error: {:?}", op, other);
                Self::internal()
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::bad_request(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.message)).into_response()
    }
}
