use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::Response;
use axum::Form;
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use common::prelude::decrypt_document;

use super::session::{log_out, redirect_with, take_flash, SessionUser, LOGIN_REQUIRED};
use super::{DocumentRow, PageError};
use crate::database::{Account, Document};
use crate::ServiceState;

pub const DOCUMENT_NOT_FOUND: &str = "Document not found.";
pub const DECRYPTION_FAILED: &str = "Error decrypting file.";

#[derive(Template)]
#[template(path = "pages/retrieve.html")]
pub struct RetrieveTemplate {
    pub flash: Option<String>,
    pub username: String,
    pub documents: Vec<DocumentRow>,
}

#[tracing::instrument(skip_all, fields(username = %user.username()))]
pub async fn page(
    State(state): State<ServiceState>,
    user: SessionUser,
    jar: SignedCookieJar,
) -> Result<Response, PageError> {
    let documents = Document::list(user.username(), state.database())
        .await?
        .into_iter()
        .map(DocumentRow::from)
        .collect();

    let (jar, flash) = take_flash(jar);
    let template = RetrieveTemplate {
        flash,
        username: user.0,
        documents,
    };
    Ok((jar, template).into_response())
}

#[derive(Deserialize)]
pub struct RetrieveForm {
    #[serde(default)]
    file_name: String,
}

/// Plaintext goes straight from memory into the response body
fn attachment(filename: &str, body: Vec<u8>) -> Response {
    let mime = mime_guess::from_path(filename).first_or_octet_stream();
    let disposition = format!("attachment; filename=\"{}\"", filename);
    (
        [
            (CONTENT_TYPE, mime.to_string()),
            (CONTENT_DISPOSITION, disposition),
            (CACHE_CONTROL, "no-store".to_string()),
        ],
        body,
    )
        .into_response()
}

#[tracing::instrument(skip_all, fields(username = %user.username()))]
pub async fn handler(
    State(state): State<ServiceState>,
    user: SessionUser,
    jar: SignedCookieJar,
    Form(form): Form<RetrieveForm>,
) -> Result<Response, PageError> {
    let name = form.file_name.trim();
    if name.is_empty() {
        return Ok(redirect_with(jar, DOCUMENT_NOT_FOUND, "/retrieve"));
    }

    let db = state.database();
    let Some(account) = Account::get(user.username(), db).await? else {
        return Ok(redirect_with(log_out(jar), LOGIN_REQUIRED, "/login"));
    };
    let Some(document) = Document::get(user.username(), name, db).await? else {
        return Ok(redirect_with(jar, DOCUMENT_NOT_FOUND, "/retrieve"));
    };

    let key = account.key().clone();
    let ciphertext = document.ciphertext;
    let opened = tokio::task::spawn_blocking(move || decrypt_document(&key, &ciphertext)).await?;

    match opened {
        Ok(plaintext) => {
            tracing::info!(document = %name, "document retrieved");
            Ok(attachment(&document.original_filename, plaintext))
        }
        Err(e) => {
            tracing::warn!(document = %name, error = %e, "document failed to decrypt");
            Ok(redirect_with(jar, DECRYPTION_FAILED, "/retrieve"))
        }
    }
}
