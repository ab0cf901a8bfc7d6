use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use common::prelude::VaultError;

use crate::ServiceState;

mod filename;
mod home;
mod login;
mod logout;
mod register;
mod retrieve;
pub mod session;
mod upload;

pub use filename::secure_filename;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/", get(home::handler))
        .route("/register", get(register::page).post(register::handler))
        .route("/login", get(login::page).post(login::handler))
        .route("/logout", get(logout::handler))
        .route("/upload", get(upload::page).post(upload::handler))
        .route("/retrieve", get(retrieve::page).post(retrieve::handler))
}

/// Row in the per-account document listing
#[derive(Debug, Clone)]
pub struct DocumentRow {
    pub name: String,
    pub original_filename: String,
    pub size: String,
    pub updated: String,
}

impl From<crate::database::DocumentSummary> for DocumentRow {
    fn from(summary: crate::database::DocumentSummary) -> Self {
        let updated = summary
            .updated_at
            .format(&time::format_description::well_known::Rfc2822)
            .unwrap_or_else(|_| summary.updated_at.to_string());
        Self {
            name: summary.name,
            original_filename: summary.original_filename,
            size: human_size(summary.size),
            updated,
        }
    }
}

fn human_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}

/// Failures a page handler cannot turn into a flash message
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("malformed upload: {0}")]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::Multipart(e) => {
                tracing::warn!(error = %e, "rejected multipart body");
                (e.status(), e.body_text()).into_response()
            }
            err => {
                tracing::error!(error = %err, "page handler failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected error").into_response()
            }
        }
    }
}
