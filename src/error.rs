use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TodoError>;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Todo body is required")]
    EmptyBody,

    #[error("Invalid todo ID")]
    InvalidId(String),

    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    #[error("Todo not found")]
    NotFound,

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TodoError {
    pub fn internal(msg: impl Into<String>) -> Self {
        TodoError::Internal(msg.into())
    }
}

/// JSON envelope for client-facing failures.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

impl ResponseError for TodoError {
    fn status_code(&self) -> StatusCode {
        match self {
            TodoError::EmptyBody | TodoError::InvalidId(_) | TodoError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            TodoError::NotFound => StatusCode::NOT_FOUND,
            TodoError::Mongo(_) | TodoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            return HttpResponse::build(status).finish();
        }
        if let TodoError::InvalidId(raw) = self {
            tracing::debug!(id = %raw, "rejected malformed todo id");
        }
        HttpResponse::build(status).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
