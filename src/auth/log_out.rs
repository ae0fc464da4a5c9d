//! Log-out route handler that invalidates authentication cookies and redirects users.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    auth::invalidate_auth_cookie,
    endpoints,
    flash::{Flash, set_flash},
};

pub const LOGGED_OUT_MSG: &str = "You have been logged out.";

/// Invalidate the auth cookie and redirect the client to the home page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_auth_cookie(jar);
    let jar = set_flash(jar, &Flash::info(LOGGED_OUT_MSG));

    (jar, Redirect::to(endpoints::ROOT)).into_response()
}
