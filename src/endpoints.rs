//! The endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/expense/edit/{record_id}', use [format_endpoint].

/// The public home page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page with links for adding records and downloading reports.
pub const MANAGE_VIEW: &str = "/manage";
/// The route for the registration page and form.
pub const REGISTER_VIEW: &str = "/register";
/// The route for the log in page and form.
pub const LOG_IN_VIEW: &str = "/login";
/// The route for logging out the current user.
pub const LOG_OUT: &str = "/logout";
/// The page listing a user's expenses.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page and form for adding an expense.
pub const NEW_EXPENSE_VIEW: &str = "/expense/add";
/// The page and form for editing an expense.
pub const EDIT_EXPENSE_VIEW: &str = "/expense/edit/{record_id}";
/// The route for deleting an expense.
pub const DELETE_EXPENSE: &str = "/expense/delete/{record_id}";
/// The page listing a user's incomes.
pub const INCOMES_VIEW: &str = "/incomes";
/// The page and form for adding an income.
pub const NEW_INCOME_VIEW: &str = "/income/add";
/// The page and form for editing an income.
pub const EDIT_INCOME_VIEW: &str = "/income/edit/{record_id}";
/// The route for deleting an income.
pub const DELETE_INCOME: &str = "/income/delete/{record_id}";
/// The route for downloading a monthly CSV report.
pub const EXPORT_CSV: &str = "/export/csv/{year}/{month}";
/// The route for static files.
pub const STATIC: &str = "/static";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/expense/edit/{record_id}', '{record_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// The URL for the CSV report of `month` (1-12) in `year`.
pub fn format_export_endpoint(year: i32, month: u8) -> String {
    EXPORT_CSV
        .replace("{year}", &year.to_string())
        .replace("{month}", &month.to_string())
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::{format_endpoint, format_export_endpoint};

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::MANAGE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_EXPENSE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_EXPENSE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DELETE_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::INCOMES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_INCOME_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_INCOME_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DELETE_INCOME);
        assert_endpoint_is_valid_uri(endpoints::EXPORT_CSV);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
    }

    #[test]
    fn formats_record_endpoints() {
        assert_eq!(
            format_endpoint(endpoints::EDIT_EXPENSE_VIEW, 42),
            "/expense/edit/42"
        );
        assert_eq!(
            format_endpoint(endpoints::DELETE_INCOME, 7),
            "/income/delete/7"
        );
    }

    #[test]
    fn formats_export_endpoint() {
        let formatted_path = format_export_endpoint(2024, 3);

        assert_eq!(formatted_path, "/export/csv/2024/3");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
