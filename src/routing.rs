//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_htmx::HxRedirect;
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, get_log_in_page, get_log_out, get_register_page, post_log_in, register_user,
    },
    dashboard::get_dashboard_page,
    endpoints,
    export::export_csv_endpoint,
    home::get_home_page,
    manage::get_manage_page,
    not_found::get_404_not_found,
    record::{
        Expense, Income, create_record_endpoint, delete_record_endpoint, edit_record_endpoint,
        get_create_record_page, get_edit_record_page, get_records_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_home_page))
        .route(
            endpoints::LOG_IN_VIEW,
            get(get_log_in_page).post(post_log_in),
        )
        .route(
            endpoints::REGISTER_VIEW,
            get(get_register_page).post(register_user),
        );

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::MANAGE_VIEW, get(get_manage_page))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::EXPENSES_VIEW, get(get_records_page::<Expense>))
        .route(
            endpoints::NEW_EXPENSE_VIEW,
            get(get_create_record_page::<Expense>).post(create_record_endpoint::<Expense>),
        )
        .route(
            endpoints::EDIT_EXPENSE_VIEW,
            get(get_edit_record_page::<Expense>).post(edit_record_endpoint::<Expense>),
        )
        .route(
            endpoints::DELETE_EXPENSE,
            post(delete_record_endpoint::<Expense>),
        )
        .route(endpoints::INCOMES_VIEW, get(get_records_page::<Income>))
        .route(
            endpoints::NEW_INCOME_VIEW,
            get(get_create_record_page::<Income>).post(create_record_endpoint::<Income>),
        )
        .route(
            endpoints::EDIT_INCOME_VIEW,
            get(get_edit_record_page::<Income>).post(edit_record_endpoint::<Income>),
        )
        .route(
            endpoints::DELETE_INCOME,
            post(delete_record_endpoint::<Income>),
        )
        .route(endpoints::EXPORT_CSV, get(export_csv_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Redirect the client to `url` after a form submission.
///
/// htmx requests are answered with the `HX-Redirect` header so that the
/// browser navigates to the new page instead of swapping it into the form.
/// Other requests get a `303 See Other`.
pub fn redirect_to(is_hx_request: bool, url: &str) -> Response {
    if is_hx_request {
        (HxRedirect(url.to_owned()), StatusCode::SEE_OTHER).into_response()
    } else {
        Redirect::to(url).into_response()
    }
}
