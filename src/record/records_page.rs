//! Defines the pages listing a user's expenses and incomes.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};

use crate::{
    Error,
    auth::UserID,
    endpoints::format_endpoint,
    flash::{Flash, take_flash},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
    record::{Record, RecordKind, get_records, state::RecordState},
    validation::Choice,
};

/// Renders the records of the logged in user, newest first.
pub async fn get_records_page<K: RecordKind>(
    State(state): State<RecordState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let records = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_records::<K>(user_id, &connection)?
    };

    let (jar, flash) = take_flash(jar);

    Ok((jar, records_view::<K>(&records, flash.as_ref())).into_response())
}

fn records_view<K: RecordKind>(records: &[Record<K>], flash: Option<&Flash>) -> Markup {
    let nav_bar = NavBar::new(K::LIST_VIEW).into_html();
    let name = K::NAME.to_lowercase();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl space-y-4"
            {
                @if let Some(flash) = flash {
                    (flash.into_html())
                }

                div class="flex justify-between items-center"
                {
                    h1 class="text-xl font-bold" { (K::PLURAL) }
                    (link(K::NEW_VIEW, &format!("Add {name}")))
                }

                @if records.is_empty() {
                    p id="empty-records"
                    {
                        "Nothing here yet. "
                        (link(K::NEW_VIEW, &format!("Add your first {name}")))
                        "."
                    }
                } @else {
                    div class="relative overflow-x-auto shadow-md rounded-lg"
                    {
                        table id="records" class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { (K::LABEL_TITLE) }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                    th scope="col" class="px-6 py-4 text-right" { "Amount" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                                }
                            }

                            tbody
                            {
                                @for record in records {
                                    (record_row(record))
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base(K::PLURAL, &content)
}

fn record_row<K: RecordKind>(record: &Record<K>) -> Markup {
    let edit_url = format_endpoint(K::EDIT_VIEW, record.id);
    let delete_url = format_endpoint(K::DELETE, record.id);
    let confirm_message = format!(
        "Are you sure you want to delete this {}?",
        K::NAME.to_lowercase()
    );

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (record.date) }
            td class=(TABLE_CELL_STYLE) { (record.label.label()) }
            td class=(TABLE_CELL_STYLE) { (record.description.as_deref().unwrap_or_default()) }
            td class="px-6 py-4 text-right" { (format_currency(record.amount)) }
            td class="px-6 py-4 flex gap-4"
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                form
                    method="post"
                    action=(delete_url)
                    hx-post=(delete_url)
                    hx-confirm=(confirm_message)
                {
                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Extension, extract::State};
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        flash::{Flash, set_flash},
        record::{
            Expense, Income, IncomeSource, RecordFields, create_record, state::RecordState,
        },
        test_utils::{
            assert_status_ok, assert_valid_html, create_test_user, get_shared_test_connection,
            get_test_jar, parse_html_document,
        },
    };

    use super::get_records_page;

    fn income(amount: f64, date: time::Date) -> RecordFields<Income> {
        RecordFields {
            label: IncomeSource::Commission,
            description: Some(format!("sale {amount}")),
            amount,
            date,
        }
    }

    #[tokio::test]
    async fn lists_records_newest_first() {
        let connection = get_shared_test_connection();
        let (user, oldest, newest) = {
            let connection = connection.lock().unwrap();
            let user = create_test_user("foo@bar.baz", &connection);
            let other_user = create_test_user("other@bar.baz", &connection);
            let oldest =
                create_record(&income(10.0, date!(2024 - 01 - 05)), user.id, &connection).unwrap();
            let newest =
                create_record(&income(30.0, date!(2024 - 03 - 05)), user.id, &connection).unwrap();
            create_record(&income(20.0, date!(2024 - 02 - 05)), user.id, &connection).unwrap();
            create_record(&income(99.0, date!(2024 - 02 - 05)), other_user.id, &connection)
                .unwrap();
            (user, oldest, newest)
        };
        let state = RecordState::for_test(connection);

        let response = get_records_page::<Income>(State(state), Extension(user.id), get_test_jar())
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let row_selector = Selector::parse("#records tbody tr").unwrap();
        let rows: Vec<String> = html
            .select(&row_selector)
            .map(|row| row.text().collect::<Vec<_>>().join(" "))
            .collect();
        assert_eq!(rows.len(), 3, "want only the user's three incomes");
        assert!(rows[0].contains("2024-03-05") && rows[0].contains("$30.00"));
        assert!(rows[1].contains("2024-02-05") && rows[1].contains("$20.00"));
        assert!(rows[2].contains("2024-01-05") && rows[2].contains("Commission"));

        let edit_link = Selector::parse(&format!("a[href=\"/income/edit/{}\"]", newest.id)).unwrap();
        assert!(html.select(&edit_link).next().is_some());
        let delete_form =
            Selector::parse(&format!("form[hx-post=\"/income/delete/{}\"]", oldest.id)).unwrap();
        let delete_form = html.select(&delete_form).next().expect("no delete form");
        assert!(delete_form.value().attr("hx-confirm").is_some());
    }

    #[tokio::test]
    async fn empty_list_links_to_add_form() {
        let connection = get_shared_test_connection();
        let user = create_test_user("foo@bar.baz", &connection.lock().unwrap());
        let state = RecordState::for_test(connection);

        let response =
            get_records_page::<Expense>(State(state), Extension(user.id), get_test_jar())
                .await
                .unwrap();

        let html = parse_html_document(response).await;
        let prompt = Selector::parse("#empty-records a[href=\"/expense/add\"]").unwrap();
        assert!(html.select(&prompt).next().is_some());
        assert!(html.select(&Selector::parse("#records").unwrap()).next().is_none());
    }

    #[tokio::test]
    async fn shows_flash_message() {
        let connection = get_shared_test_connection();
        let user = create_test_user("foo@bar.baz", &connection.lock().unwrap());
        let state = RecordState::for_test(connection);
        let jar = set_flash(get_test_jar(), &Flash::success("Expense deleted."));

        let response = get_records_page::<Expense>(State(state), Extension(user.id), jar)
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let flash = html
            .select(&Selector::parse("#flash").unwrap())
            .next()
            .expect("no flash message");
        assert_eq!(flash.text().collect::<String>().trim(), "Expense deleted.");
    }
}
