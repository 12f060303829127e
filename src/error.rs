//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It is the single error boundary: every domain failure is
//! classified here and translated into a uniform JSON response
//! `{"success": false, "message": ...}` with the matching HTTP status.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can
//! simply return `Result<_, AppError>`. `From` implementations for
//! `sqlx::Error`, `validator::ValidationErrors`, `jsonwebtoken::errors::Error`,
//! and `bcrypt::BcryptError` allow conversion with the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all classified failures that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or invalid client input (HTTP 400).
    InvalidInput(String),
    /// Missing/invalid/expired token, or bad login credentials (HTTP 401).
    Unauthorized(String),
    /// Authenticated caller is not the owner of the resource (HTTP 403).
    Forbidden(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// Duplicate resource, e.g. an already-registered email (HTTP 409).
    Conflict(String),
    /// An unexpected server-side fault (HTTP 500).
    InternalServerError(String),
    /// A store-access failure (HTTP 500). Wraps errors from `sqlx`.
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid Input: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

/// True when the process is explicitly running in development mode.
/// Internal error detail is only ever exposed to clients in that mode.
fn development_mode() -> bool {
    std::env::var("APP_ENV").map(|v| v == "development").unwrap_or(false)
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Internal faults get a generic client message; the real cause is
        // logged server-side and only included in the body in development.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            let detail = match self {
                AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => msg,
                _ => unreachable!(),
            };
            log::error!("internal error: {}", detail);
            let mut body = json!({
                "success": false,
                "message": "Internal server error"
            });
            if development_mode() {
                body["detail"] = json!(detail);
            }
            return HttpResponse::build(status).json(body);
        }

        let message = match self {
            AppError::InvalidInput(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg,
            _ => unreachable!(),
        };
        HttpResponse::build(status).json(json!({
            "success": false,
            "message": message
        }))
    }
}

/// `sqlx::Error::RowNotFound` maps to `NotFound`; everything else is a
/// store fault presented as a generic 500.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::InvalidInput(error.to_string())
    }
}

/// Token processing failures are deliberately collapsed to a single
/// unauthenticated outcome so clients learn nothing about which check failed.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized("Invalid or expired token".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
