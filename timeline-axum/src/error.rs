use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use thiserror::Error;
use timeline_core::{
    Error,
    error::{AuthError, SessionError, StorageError},
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] Error),

    /// Body or path that could not be decoded into the expected shape.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, String, String, Map<String, Value>) {
        let mut extra = Map::new();

        let (status, message, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "Bad request".to_string()),
            ApiError::Core(Error::Auth(AuthError::InvalidCredentials {
                failed_attempts,
                account_locked,
            })) => {
                if let Some(failed_attempts) = failed_attempts {
                    extra.insert("failedLoginAttempts".into(), json!(failed_attempts));
                    extra.insert("accountLocked".into(), json!(account_locked));
                }
                (
                    StatusCode::UNAUTHORIZED,
                    "Invalid credentials".to_string(),
                    "Invalid credentials".to_string(),
                )
            }
            ApiError::Core(Error::Auth(AuthError::AccountLocked { lock_until })) => {
                extra.insert("lockUntil".into(), json!(lock_until));
                (
                    StatusCode::LOCKED,
                    "Account is locked due to too many failed login attempts".to_string(),
                    "Account locked".to_string(),
                )
            }
            ApiError::Core(Error::Auth(AuthError::DuplicateEmail)) => (
                StatusCode::BAD_REQUEST,
                "Email already in use".to_string(),
                "Duplicate email".to_string(),
            ),
            ApiError::Core(Error::Session(session_error)) => {
                let message = match session_error {
                    SessionError::Unauthenticated => "No token provided",
                    SessionError::UnknownAccount => "User not found",
                    SessionError::Expired | SessionError::InvalidToken(_) => "Invalid token",
                };
                (
                    StatusCode::UNAUTHORIZED,
                    message.to_string(),
                    "Unauthorized".to_string(),
                )
            }
            ApiError::Core(Error::Storage(StorageError::NotFound(entity))) => {
                let message = format!("{entity} not found");
                (StatusCode::NOT_FOUND, message.clone(), message)
            }
            ApiError::Core(Error::Validation(e)) => {
                (StatusCode::BAD_REQUEST, e.to_string(), "Bad request".to_string())
            }
            ApiError::Core(e) => {
                tracing::error!(error = %e, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message, error, extra)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, error, extra) = self.parts();

        let mut body = Map::new();
        body.insert("message".into(), Value::String(message));
        body.insert("error".into(), Value::String(error));
        body.extend(extra);

        (status, Json(Value::Object(body))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
