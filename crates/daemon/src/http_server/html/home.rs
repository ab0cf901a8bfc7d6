use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;

use super::login;
use super::session::SESSION_COOKIE;

pub async fn handler(jar: SignedCookieJar) -> Response {
    if jar.get(SESSION_COOKIE).is_some() {
        return Redirect::to("/upload").into_response();
    }
    login::page(jar).await
}
