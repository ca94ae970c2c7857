// errors.rs
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, permissions, workflow rules) or downstream layers (DB, xlsx, storage).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Not Found: {0}")]
    NotFoundMsg(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Too many requests, please try again later")]
    RateLimited,

    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),

    #[error("Storage Error: {0}")]
    StorageError(String),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound | ServerError::NotFoundMsg(_) => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::Forbidden(_) => 403,
            ServerError::Conflict(_) => 409,
            ServerError::RateLimited => 429,
            ServerError::DbError(_)
            | ServerError::XlsxError(_)
            | ServerError::StorageError(_)
            | ServerError::ConfigError(_)
            | ServerError::InternalError => 500,
        }
    }

    /// Value of the `err` field in the JSON envelope. Zero means success,
    /// so every error is the negated HTTP status (rate limiting is `-429`).
    pub fn code(&self) -> i32 {
        -i32::from(self.status())
    }

    /// Server-side failures are logged by the router; client errors are not.
    pub fn is_server_fault(&self) -> bool {
        self.status() >= 500
    }
}
