//! Error types for ledgerweb-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ledgerweb_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerweb_core::StoreError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::bad_request("id").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound { resource: "/x".to_string() }.status(),
            StatusCode::NOT_FOUND
        );
        let core: ApiError = CoreError::from(StoreError::Poisoned).into();
        assert_eq!(core.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(core.to_string(), "Store lock poisoned");
    }
}
