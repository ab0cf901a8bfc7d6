use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::{Multipart, State};
use axum::response::Response;
use axum_extra::extract::cookie::SignedCookieJar;

use common::prelude::encrypt_document;
use common::vault::MAX_DOCUMENT_SIZE;

use super::session::{log_out, redirect_with, take_flash, SessionUser, LOGIN_REQUIRED};
use super::{secure_filename, DocumentRow, PageError};
use crate::database::{Account, Document};
use crate::ServiceState;

pub const MISSING_UPLOAD: &str = "Please provide both a file and a file name.";
pub const EMPTY_UPLOAD: &str = "The selected file is empty.";
pub const UPLOAD_TOO_LARGE: &str = "The selected file is too large.";
pub const UPLOADED: &str = "Document uploaded and encrypted successfully.";

/// Stored filename when the client's name sanitizes to nothing
const FALLBACK_FILENAME: &str = "document";

#[derive(Template)]
#[template(path = "pages/upload.html")]
pub struct UploadTemplate {
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
    let template = UploadTemplate {
        flash,
        username: user.0,
        documents,
    };
    Ok((jar, template).into_response())
}

/// The parts of the upload form we care about
#[derive(Default)]
struct UploadForm {
    name: Option<String>,
    filename: Option<String>,
    data: Option<Vec<u8>>,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, PageError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("file_name") => form.name = Some(field.text().await?),
            Some("file") => {
                form.filename = field.file_name().map(str::to_owned);
                form.data = Some(field.bytes().await?.to_vec());
            }
            _ => {}
        }
    }
    Ok(form)
}

#[tracing::instrument(skip_all, fields(username = %user.username()))]
pub async fn handler(
    State(state): State<ServiceState>,
    user: SessionUser,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let form = read_form(multipart).await?;

    let name = form.name.as_deref().map(str::trim).unwrap_or_default();
    let client_filename = form.filename.as_deref().unwrap_or_default();
    let data = match form.data {
        Some(data) if !name.is_empty() && !client_filename.is_empty() => data,
        _ => return Ok(redirect_with(jar, MISSING_UPLOAD, "/upload")),
    };
    if data.is_empty() {
        return Ok(redirect_with(jar, EMPTY_UPLOAD, "/upload"));
    }
    if data.len() > state.max_upload_bytes().min(MAX_DOCUMENT_SIZE) {
        return Ok(redirect_with(jar, UPLOAD_TOO_LARGE, "/upload"));
    }

    let db = state.database();
    let Some(account) = Account::get(user.username(), db).await? else {
        return Ok(redirect_with(log_out(jar), LOGIN_REQUIRED, "/login"));
    };

    let mut original_filename = secure_filename(client_filename);
    if original_filename.is_empty() {
        original_filename = FALLBACK_FILENAME.to_string();
    }

    let size = data.len();
    let key = account.key().clone();
    let sealed = tokio::task::spawn_blocking(move || encrypt_document(&key, &data)).await??;
    Document::upsert(user.username(), name, &original_filename, &sealed, size, db).await?;
    tracing::info!(document = %name, size, "document stored");

    Ok(redirect_with(jar, UPLOADED, "/upload"))
}
