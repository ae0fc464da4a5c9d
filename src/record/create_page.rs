//! Defines the page for adding an expense or income.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::Markup;

use crate::{
    Error,
    record::{
        RecordKind,
        form::{RecordForm, record_form_page, record_form_view},
        state::RecordState,
    },
    timezone::local_today,
    validation::FieldErrors,
};

/// Renders the page for adding a record, with the date set to today.
pub async fn get_create_record_page<K: RecordKind>(
    State(state): State<RecordState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    Ok(create_record_view::<K>(&RecordForm::new(today), &FieldErrors::new()).into_response())
}

pub(super) fn create_record_view<K: RecordKind>(form: &RecordForm, errors: &FieldErrors) -> Markup {
    let title = format!("Add {}", K::NAME);

    record_form_page::<K>(
        &title,
        record_form_view::<K>(K::NEW_VIEW, form, errors, &title),
    )
}

#[cfg(test)]
mod tests {
    use axum::extract::State;

    use crate::{
        record::{Expense, Income, state::RecordState},
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_select_options, assert_status_ok, assert_valid_html,
            get_shared_test_connection, must_get_form, parse_html_document,
        },
        timezone::local_today,
    };

    use super::get_create_record_page;

    #[tokio::test]
    async fn renders_expense_form() {
        let state = RecordState::for_test(get_shared_test_connection());
        let today = local_today(&state.local_timezone).unwrap();

        let response = get_create_record_page::<Expense>(State(state))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html, "record-form");
        assert_hx_endpoint(&form, "/expense/add", "hx-post");
        assert_hx_endpoint(&form, "/expense/add", "action");
        assert_select_options(
            &form,
            "category",
            &["food", "household", "internet", "transport"],
        );
        assert_form_input(&form, "amount", "number");
        assert_form_input_with_value(&form, "date", "date", &today.to_string());
        assert_form_input_with_value(&form, "description", "text", "");
        assert_form_submit_button_with_text(&form, "Add Expense");
    }

    #[tokio::test]
    async fn renders_income_form() {
        let state = RecordState::for_test(get_shared_test_connection());

        let response = get_create_record_page::<Income>(State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let form = must_get_form(&html, "record-form");
        assert_hx_endpoint(&form, "/income/add", "hx-post");
        assert_select_options(&form, "source", &["salary", "commission", "bonus", "profit"]);
        assert_form_submit_button_with_text(&form, "Add Income");
    }
}
