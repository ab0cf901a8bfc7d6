use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use axum::response::Response;
use axum::Form;
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use common::prelude::{generate_account_key, hash_password};

use super::session::{redirect_with, take_flash};
use super::PageError;
use crate::database::Account;
use crate::notifier::dispatch_confirmation;
use crate::ServiceState;

pub const USER_EXISTS: &str = "User already exists. Please login.";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match. Please try again.";
pub const MISSING_FIELDS: &str = "Please provide a username, an email address and a password.";
pub const INVALID_EMAIL: &str = "Please provide a valid email address.";
pub const REGISTERED: &str = "Registration successful. Please login.";

const MAX_USERNAME_LEN: usize = 64;

#[derive(Template)]
#[template(path = "pages/register.html")]
pub struct RegisterTemplate {
    pub flash: Option<String>,
}

pub async fn page(jar: SignedCookieJar) -> Response {
    let (jar, flash) = take_flash(jar);
    (jar, RegisterTemplate { flash }).into_response()
}

#[derive(Deserialize)]
pub struct RegisterForm {
    username: String,
    email: String,
    password: String,
    confirm_password: String,
}

/// Shape check only; deliverability is the notifier's problem
fn plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[tracing::instrument(skip_all)]
pub async fn handler(
    State(state): State<ServiceState>,
    jar: SignedCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, PageError> {
    let username = form.username.trim().to_string();
    let email = form.email.trim().to_string();

    if username.is_empty() || username.len() > MAX_USERNAME_LEN || form.password.is_empty() {
        return Ok(redirect_with(jar, MISSING_FIELDS, "/register"));
    }
    if !plausible_email(&email) {
        return Ok(redirect_with(jar, INVALID_EMAIL, "/register"));
    }

    let db = state.database();
    if Account::get(&username, db).await?.is_some() {
        return Ok(redirect_with(jar, USER_EXISTS, "/login"));
    }
    if form.password != form.confirm_password {
        return Ok(redirect_with(jar, PASSWORD_MISMATCH, "/register"));
    }

    let key = generate_account_key()?;
    let params = *state.password_params();
    let password = form.password;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password, &params)).await??;

    // a concurrent registration may have claimed the name since the check above
    if Account::create(&username, &email, &hash, &key, db).await?.is_none() {
        return Ok(redirect_with(jar, USER_EXISTS, "/login"));
    }
    tracing::info!(%username, "account registered");

    dispatch_confirmation(state.notifier(), email, username);

    Ok(redirect_with(jar, REGISTERED, "/login"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plausible_email() {
        assert!(plausible_email("alice@example.com"));
        assert!(plausible_email("a@b"));
        assert!(!plausible_email("alice"));
        assert!(!plausible_email("@example.com"));
        assert!(!plausible_email("alice@"));
        assert!(!plausible_email("alice@.com"));
        assert!(!plausible_email("al ice@example.com"));
    }
}
