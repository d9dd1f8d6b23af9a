use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use people_store::repository::person::RepositoryError;
use thiserror::Error;

/// Request failures. Only the status code reaches the client, the message is logged.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).finish()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // A malformed id can never name a stored person, clients get the same 404
            RepositoryError::InvalidId(e) => {
                log::debug!("{}", e);
                ApiError::NotFound(e.to_string())
            }
            RepositoryError::NotFound(id) => ApiError::NotFound(id.to_string()),
            RepositoryError::Store(e) => {
                log::error!("Document store failure: {}", e);
                ApiError::Internal(e.to_string())
            }
        }
    }
}
