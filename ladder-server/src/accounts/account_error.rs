use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    InvalidCredentials(&'static str),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Invalid username or password")]
    WrongPassword,

    #[error("User not found")]
    UnknownUser,

    #[error("Failed to save user data")]
    Storage(#[from] std::io::Error),

    #[error("Failed to encode user data")]
    Encoding(#[from] serde_json::Error),
}

impl AccountError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials(_) | Self::UsernameTaken => StatusCode::BAD_REQUEST,
            Self::WrongPassword => StatusCode::UNAUTHORIZED,
            Self::UnknownUser => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors go out as `{"detail": "..."}` with the matching status code.
impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
