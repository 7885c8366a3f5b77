use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt::Debug;
use thiserror::Error as ThisError;

use crate::planner::{Cause, RouteError};

#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("{message} (code {code})")]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::reqwest_error(err)
    }
}

impl From<RouteError> for Error {
    fn from(err: RouteError) -> Self {
        let message = err.to_string();

        if err.is_not_configured() {
            return Error::route_not_configured_error(message);
        }

        match err.cause {
            Cause::NoStops => Error::validation_error(message),
            Cause::Resolution(_) => Error::address_not_found_error(message),
            Cause::Directions(_) => Error::directions_error(message),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            104 => (StatusCode::NOT_FOUND, self.message.as_str()),
            110 => (StatusCode::SERVICE_UNAVAILABLE, self.message.as_str()),
            111 => (StatusCode::UNPROCESSABLE_ENTITY, self.message.as_str()),
            112 => (StatusCode::BAD_GATEWAY, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl Error {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(102, message)
    }

    pub fn missing_session_error() -> Self {
        Self::new(103, "missing or malformed x-session-id header")
    }

    pub fn not_found_error(message: impl Into<String>) -> Self {
        Self::new(104, message)
    }

    pub fn route_not_configured_error(message: impl Into<String>) -> Self {
        Self::new(110, message)
    }

    pub fn address_not_found_error(message: impl Into<String>) -> Self {
        Self::new(111, message)
    }

    pub fn directions_error(message: impl Into<String>) -> Self {
        Self::new(112, message)
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == 104
    }

    pub fn database_error<T: Debug>(err: T) -> Self {
        tracing::error!("database error: {:?}", err);
        Self::new(2, "database error")
    }

    pub fn reqwest_error(err: reqwest::Error) -> Self {
        tracing::error!("reqwest error: {}", err);
        Self::new(3, "reqwest error")
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn server_error<T: Debug>(err: T) -> Self {
        tracing::error!("server error: {:?}", err);
        Self::new(5, "server error")
    }
}
