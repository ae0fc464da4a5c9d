//! Defines the page for editing an expense or income.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::Markup;

use crate::{
    Error,
    auth::UserID,
    endpoints::format_endpoint,
    record::{
        RecordId, RecordKind,
        form::{RecordForm, record_form_page, record_form_view},
        get_owned_record,
        state::RecordState,
    },
    validation::FieldErrors,
};

/// Renders the page for editing a record owned by the logged in user.
///
/// Responds with 404 if the record does not exist and 403 if another user owns it.
pub async fn get_edit_record_page<K: RecordKind>(
    State(state): State<RecordState>,
    Extension(user_id): Extension<UserID>,
    Path(record_id): Path<RecordId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let record = get_owned_record::<K>(record_id, user_id, &connection)?;

    Ok(edit_record_view::<K>(
        record_id,
        &RecordForm::from_record(&record),
        &FieldErrors::new(),
    )
    .into_response())
}

pub(super) fn edit_record_view<K: RecordKind>(
    record_id: RecordId,
    form: &RecordForm,
    errors: &FieldErrors,
) -> Markup {
    let edit_url = format_endpoint(K::EDIT_VIEW, record_id);

    record_form_page::<K>(
        &format!("Edit {}", K::NAME),
        record_form_view::<K>(&edit_url, form, errors, "Save"),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::date;

    use crate::{
        Error,
        record::{Expense, ExpenseCategory, RecordFields, create_record, state::RecordState},
        test_utils::{
            assert_form_input_with_value, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_status_ok, assert_valid_html, create_test_user,
            get_selected_option, get_shared_test_connection, must_get_form, parse_html_document,
        },
    };

    use super::get_edit_record_page;

    #[tokio::test]
    async fn renders_form_with_record_values() {
        let connection = get_shared_test_connection();
        let (user, record) = {
            let connection = connection.lock().unwrap();
            let user = create_test_user("foo@bar.baz", &connection);
            let record = create_record(
                &RecordFields::<Expense> {
                    label: ExpenseCategory::Household,
                    description: Some("soap".to_owned()),
                    amount: 4.5,
                    date: date!(2024 - 03 - 15),
                },
                user.id,
                &connection,
            )
            .unwrap();
            (user, record)
        };
        let state = RecordState::for_test(connection);

        let response =
            get_edit_record_page::<Expense>(State(state), Extension(user.id), Path(record.id))
                .await
                .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html, "record-form");
        let edit_url = format!("/expense/edit/{}", record.id);
        assert_hx_endpoint(&form, &edit_url, "hx-post");
        assert_eq!(get_selected_option(&form, "category"), Some("household"));
        assert_form_input_with_value(&form, "amount", "number", "4.50");
        assert_form_input_with_value(&form, "date", "date", "2024-03-15");
        assert_form_input_with_value(&form, "description", "text", "soap");
        assert_form_submit_button_with_text(&form, "Save");
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let connection = get_shared_test_connection();
        let user = create_test_user("foo@bar.baz", &connection.lock().unwrap());
        let state = RecordState::for_test(connection);

        let result =
            get_edit_record_page::<Expense>(State(state), Extension(user.id), Path(42)).await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn other_users_record_is_forbidden() {
        let connection = get_shared_test_connection();
        let (other_user, record) = {
            let connection = connection.lock().unwrap();
            let owner = create_test_user("owner@bar.baz", &connection);
            let other_user = create_test_user("other@bar.baz", &connection);
            let record = create_record(
                &RecordFields::<Expense> {
                    label: ExpenseCategory::Food,
                    description: None,
                    amount: 1.0,
                    date: date!(2024 - 03 - 15),
                },
                owner.id,
                &connection,
            )
            .unwrap();
            (other_user, record)
        };
        let state = RecordState::for_test(connection);

        let result =
            get_edit_record_page::<Expense>(State(state), Extension(other_user.id), Path(record.id))
                .await;

        let error = result.unwrap_err();
        assert_eq!(error, Error::Forbidden);
        assert_eq!(error.into_response().status(), StatusCode::FORBIDDEN);
    }
}
