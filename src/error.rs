use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::service::pagination::PaginationError;

#[derive(Debug, ThisError)]
pub enum FleetError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] figment::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid page: {0}")]
    InvalidPage(#[from] PaginationError),
}

impl IntoResponse for FleetError {
    fn into_response(self) -> axum::response::Response {
        let (status, title, message) = match &self {
            FleetError::NotFound(_) | FleetError::InvalidPage(_) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                "The requested resource was not found on this server.",
            ),
            FleetError::DatabaseError(_)
            | FleetError::TemplateError(_)
            | FleetError::ConfigError(_)
            | FleetError::IoError(_)
            | FleetError::PasswordHash(_)
            | FleetError::TaskJoin(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server Error",
                    "An internal server error occurred.",
                )
            }
        };
        let body = format!(
            "<!doctype html><html><head><title>{title}</title></head>\
             <body><h1>{title}</h1><p>{message}</p></body></html>"
        );
        (status, Html(body)).into_response()
    }
}
