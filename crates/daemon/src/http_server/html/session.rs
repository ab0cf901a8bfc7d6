//! Signed-cookie sessions and one-shot flash messages

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use http::request::Parts;

/// Holds the logged-in username
pub const SESSION_COOKIE: &str = "docvault_session";
/// Holds a message for the next rendered page
pub const FLASH_COOKIE: &str = "docvault_flash";

pub const LOGIN_REQUIRED: &str = "Please log in first.";

fn cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

/// Start a session for `username`
pub fn log_in(jar: SignedCookieJar, username: &str) -> SignedCookieJar {
    jar.add(cookie(SESSION_COOKIE, username.to_string()))
}

/// End the current session, if any
pub fn log_out(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(removal(SESSION_COOKIE))
}

/// Queue a message for the next page rendered to this client
pub fn flash(jar: SignedCookieJar, message: impl Into<String>) -> SignedCookieJar {
    jar.add(cookie(FLASH_COOKIE, message.into()))
}

/// Consume the pending flash message
pub fn take_flash(jar: SignedCookieJar) -> (SignedCookieJar, Option<String>) {
    match jar.get(FLASH_COOKIE) {
        Some(c) => {
            let message = c.value().to_string();
            (jar.remove(removal(FLASH_COOKIE)), Some(message))
        }
        None => (jar, None),
    }
}

/// Flash `message` and send the client to `to`
pub fn redirect_with(jar: SignedCookieJar, message: impl Into<String>, to: &str) -> Response {
    (flash(jar, message), Redirect::to(to)).into_response()
}

/// The authenticated account for a request. Rejects with a redirect
///  to the login page when no valid session cookie is present.
#[derive(Debug, Clone)]
pub struct SessionUser(pub String);

impl SessionUser {
    pub fn username(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    Key: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|e: Infallible| match e {});

        match jar.get(SESSION_COOKIE) {
            Some(c) if !c.value().is_empty() => Ok(SessionUser(c.value().to_string())),
            _ => Err(redirect_with(jar, LOGIN_REQUIRED, "/login")),
        }
    }
}
