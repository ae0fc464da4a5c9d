//! The page shown when a user tries to access another user's records.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub fn get_403_forbidden_response() -> Response {
    (
        StatusCode::FORBIDDEN,
        Html(
            error_view(
                "Forbidden",
                "403",
                "You do not have access to this page.",
                "The record you requested belongs to another account.",
            )
            .into_string(),
        ),
    )
        .into_response()
}
