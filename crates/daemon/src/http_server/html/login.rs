use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use axum::response::{Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use common::prelude::{verify_password, PasswordHash};

use super::session::{log_in, redirect_with, take_flash};
use super::PageError;
use crate::database::Account;
use crate::ServiceState;

pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub flash: Option<String>,
}

pub async fn page(jar: SignedCookieJar) -> Response {
    let (jar, flash) = take_flash(jar);
    (jar, LoginTemplate { flash }).into_response()
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[tracing::instrument(skip_all)]
pub async fn handler(
    State(state): State<ServiceState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let username = form.username.trim().to_string();

    let account = Account::get(&username, state.database()).await?;
    let (stored, known) = stored_hash(account, state.placeholder_hash());
    let password = form.password;
    let matched =
        tokio::task::spawn_blocking(move || verify_password(&password, &stored)).await?;
    let verified = known && matched;

    if !verified {
        tracing::info!(%username, "login rejected");
        return Ok(redirect_with(jar, INVALID_CREDENTIALS, "/login"));
    }

    tracing::info!(%username, "login succeeded");
    Ok((log_in(jar, &username), Redirect::to("/upload")).into_response())
}

/// The hash a login attempt is checked against, and whether the account
///  exists. Unknown usernames are checked against the placeholder.
fn stored_hash(account: Option<Account>, placeholder: &PasswordHash) -> (PasswordHash, bool) {
    match account {
        Some(account) => (account.password_hash().clone(), true),
        None => (placeholder.clone(), false),
    }
}
