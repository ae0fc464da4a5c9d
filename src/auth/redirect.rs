//! Helpers for redirect URLs during authentication flows.

use axum::{
    extract::Request,
    http::{Method, Uri},
};
use tracing::{error, warn};

use crate::endpoints;

fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(redirect_url);

    path != endpoints::LOG_IN_VIEW && path != endpoints::LOG_OUT
}

/// Return the path and query of `raw_url` if it is a same-origin relative
/// URL that is safe to redirect to after logging in.
///
/// URLs with a scheme or authority, protocol-relative URLs (e.g., "//evil.com")
/// and the log-in page itself are rejected.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

fn normalize_hx_current_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Build the URL of the log-in page that will send the user back to the
/// page they were trying to reach.
///
/// For htmx requests the page is taken from the `HX-Current-URL` header, for
/// other GET requests from the request URI. Plain form submissions and
/// unsafe URLs fall back to the dashboard.
pub fn build_log_in_redirect_url(request: &Request) -> String {
    let redirect_target = redirect_target_from_hx_request(request)
        .or_else(|| redirect_target_from_request_uri(request))
        .unwrap_or_else(|| endpoints::DASHBOARD_VIEW.to_owned());

    build_log_in_redirect_url_from_target(&redirect_target)
        .unwrap_or_else(|| endpoints::LOG_IN_VIEW.to_owned())
}

pub(super) fn build_log_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(param) => Some(format!("{}?{}", endpoints::LOG_IN_VIEW, param)),
        Err(error) => {
            error!("Could not encode redirect URL {redirect_target}: {error}");
            None
        }
    }
}

fn redirect_target_from_request_uri(request: &Request) -> Option<String> {
    if request.method() != Method::GET {
        return None;
    }

    let path_and_query = request.uri().path_and_query()?.as_str();
    normalize_redirect_url(path_and_query)
}

fn redirect_target_from_hx_request(request: &Request) -> Option<String> {
    let headers = request.headers();
    let hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .map(|header| header.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if !hx_request {
        return None;
    }

    let current_url = match headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())
    {
        Some(value) => value,
        None => {
            warn!("Missing HX-Current-URL header for htmx request.");
            return None;
        }
    };

    let redirect_url = normalize_hx_current_url(current_url);
    if redirect_url.is_none() {
        warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    redirect_url
}

#[cfg(test)]
mod normalize_redirect_url_tests {
    use super::normalize_redirect_url;

    #[test]
    fn accepts_relative_paths() {
        assert_eq!(
            normalize_redirect_url("/expenses"),
            Some("/expenses".to_owned())
        );
        assert_eq!(
            normalize_redirect_url("/expense/edit/3?foo=bar"),
            Some("/expense/edit/3?foo=bar".to_owned())
        );
    }

    #[test]
    fn rejects_absolute_urls() {
        assert_eq!(normalize_redirect_url("https://evil.example/steal"), None);
        assert_eq!(normalize_redirect_url("//evil.example/steal"), None);
    }

    #[test]
    fn rejects_paths_without_leading_slash() {
        assert_eq!(normalize_redirect_url("expenses"), None);
        assert_eq!(normalize_redirect_url(""), None);
    }

    #[test]
    fn rejects_log_in_and_log_out_pages() {
        assert_eq!(normalize_redirect_url("/login"), None);
        assert_eq!(normalize_redirect_url("/login?redirect_url=%2F"), None);
        assert_eq!(normalize_redirect_url("/logout"), None);
    }
}
