use axum::response::Response;
use axum_extra::extract::cookie::SignedCookieJar;

use super::session::{log_out, redirect_with};

pub const LOGGED_OUT: &str = "You have been logged out.";

pub async fn handler(jar: SignedCookieJar) -> Response {
    redirect_with(log_out(jar), LOGGED_OUT, "/login")
}
