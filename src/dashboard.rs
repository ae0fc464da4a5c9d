//! The dashboard summarising a user's income and expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::{UserID, get_user_by_id},
    endpoints,
    flash::{Flash, take_flash},
    html::{PAGE_CONTAINER_STYLE, base, format_currency, link},
    month::MonthRange,
    navigation::NavBar,
    record::{Expense, Income, count_records, sum_amounts},
    timezone::local_today,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The key for the flash message cookie.
    pub cookie_key: Key,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            cookie_key: state.cookie_key.clone(),
        }
    }
}

impl FromRef<DashboardState> for Key {
    fn from_ref(state: &DashboardState) -> Self {
        state.cookie_key.clone()
    }
}

/// Totals over a user's records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    /// Income dated within the current calendar month.
    pub monthly_income: f64,
    /// Expenses dated within the current calendar month.
    pub monthly_expense: f64,
    /// The number of incomes plus the number of expenses.
    pub transaction_count: u64,
}

impl Summary {
    /// Total income minus total expenses.
    pub fn net_balance(&self) -> f64 {
        self.total_income - self.total_expense
    }

    /// This month's income minus this month's expenses.
    pub fn monthly_net(&self) -> f64 {
        self.monthly_income - self.monthly_expense
    }
}

/// Compute the summary of the records owned by `user_id`, where the current
/// month is the month containing `today`.
///
/// # Errors
/// Returns an [Error::SqlError] if a query failed, or [Error::InvalidMonth] if
/// `today` is in the last month that can be represented.
pub fn get_summary(user_id: UserID, today: Date, connection: &Connection) -> Result<Summary, Error> {
    let this_month = MonthRange::containing(today)?;

    Ok(Summary {
        total_income: sum_amounts::<Income>(user_id, None, connection)?,
        total_expense: sum_amounts::<Expense>(user_id, None, connection)?,
        monthly_income: sum_amounts::<Income>(user_id, Some(this_month), connection)?,
        monthly_expense: sum_amounts::<Expense>(user_id, Some(this_month), connection)?,
        transaction_count: count_records::<Income>(user_id, connection)?
            + count_records::<Expense>(user_id, connection)?,
    })
}

/// Display the dashboard for the logged in user.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let (user, summary) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        (
            get_user_by_id(user_id, &connection)?,
            get_summary(user_id, today, &connection)?,
        )
    };

    let (jar, flash) = take_flash(jar);

    Ok((jar, dashboard_view(&user.name, &summary, flash.as_ref())).into_response())
}

fn summary_card(id: &str, title: &str, amount: f64) -> Markup {
    let amount_style = if amount < 0.0 {
        "text-2xl font-bold text-red-600 dark:text-red-400"
    } else {
        "text-2xl font-bold"
    };

    html! {
        div
            id=(id)
            class="bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700
                rounded-lg p-4 shadow-md"
        {
            h2 class="text-sm text-gray-600 dark:text-gray-400" { (title) }
            p class=(amount_style) { (format_currency(amount)) }
        }
    }
}

fn dashboard_view(user_name: &str, summary: &Summary, flash: Option<&Flash>) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl space-y-6"
            {
                @if let Some(flash) = flash {
                    (flash.into_html())
                }

                h1 class="text-xl font-bold" { "Welcome, " (user_name) }

                @if summary.transaction_count == 0 {
                    p id="no-records"
                    {
                        "You haven't recorded anything yet. Start by "
                        (link(endpoints::NEW_INCOME_VIEW, "adding an income"))
                        " or "
                        (link(endpoints::NEW_EXPENSE_VIEW, "adding an expense"))
                        "."
                    }
                }

                section class="space-y-2"
                {
                    h2 class="text-lg font-semibold" { "All time" }

                    div class="grid grid-cols-1 sm:grid-cols-3 gap-4"
                    {
                        (summary_card("total-income", "Total income", summary.total_income))
                        (summary_card("total-expense", "Total expenses", summary.total_expense))
                        (summary_card("net-balance", "Net balance", summary.net_balance()))
                    }
                }

                section class="space-y-2"
                {
                    h2 class="text-lg font-semibold" { "This month" }

                    div class="grid grid-cols-1 sm:grid-cols-3 gap-4"
                    {
                        (summary_card("monthly-income", "Income", summary.monthly_income))
                        (summary_card("monthly-expense", "Expenses", summary.monthly_expense))
                        (summary_card("monthly-net", "Net", summary.monthly_net()))
                    }
                }

                p id="transaction-count" class="text-sm text-gray-600 dark:text-gray-400"
                {
                    (summary.transaction_count) " transactions recorded."
                }
            }
        }
    };

    base("Dashboard", &content)
}

#[cfg(test)]
mod summary_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        auth::UserID,
        month::MonthRange,
        record::{
            Expense, ExpenseCategory, Income, IncomeSource, RecordFields, RecordKind,
            create_record, update_record,
        },
        test_utils::{create_test_user, get_test_connection},
    };

    use super::{Summary, get_summary};

    fn add<K: RecordKind>(
        label: K::Label,
        amount: f64,
        date: Date,
        user_id: UserID,
        connection: &Connection,
    ) -> i64 {
        create_record(
            &RecordFields::<K> {
                label,
                description: None,
                amount,
                date,
            },
            user_id,
            connection,
        )
        .unwrap()
        .id
    }

    #[test]
    fn summary_is_zero_without_records() {
        let connection = get_test_connection();
        let user = create_test_user("foo@bar.baz", &connection);

        let summary = get_summary(user.id, date!(2024 - 03 - 15), &connection).unwrap();

        assert_eq!(
            summary,
            Summary {
                total_income: 0.0,
                total_expense: 0.0,
                monthly_income: 0.0,
                monthly_expense: 0.0,
                transaction_count: 0,
            }
        );
    }

    #[test]
    fn totals_and_transaction_count() {
        let connection = get_test_connection();
        let user = create_test_user("foo@bar.baz", &connection);
        let day = date!(2024 - 03 - 15);
        add::<Income>(IncomeSource::Salary, 100.0, day, user.id, &connection);
        add::<Income>(IncomeSource::Bonus, 50.0, day, user.id, &connection);
        add::<Expense>(ExpenseCategory::Food, 30.0, day, user.id, &connection);

        let summary = get_summary(user.id, day, &connection).unwrap();

        assert_eq!(summary.total_income, 150.0);
        assert_eq!(summary.total_expense, 30.0);
        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.net_balance(), 120.0);
    }

    #[test]
    fn monthly_totals_follow_record_dates() {
        let connection = get_test_connection();
        let user = create_test_user("foo@bar.baz", &connection);
        let today = date!(2024 - 03 - 15);
        let this_month = MonthRange::containing(today).unwrap();
        let id = add::<Expense>(
            ExpenseCategory::Transport,
            20.0,
            this_month.start,
            user.id,
            &connection,
        );

        let summary = get_summary(user.id, today, &connection).unwrap();
        assert_eq!(summary.monthly_expense, 20.0);

        update_record(
            id,
            user.id,
            &RecordFields::<Expense> {
                label: ExpenseCategory::Transport,
                description: None,
                amount: 20.0,
                date: this_month.previous().unwrap().start,
            },
            &connection,
        )
        .unwrap();

        let summary = get_summary(user.id, today, &connection).unwrap();
        assert_eq!(summary.monthly_expense, 0.0);
        assert_eq!(summary.total_expense, 20.0);
    }

    #[test]
    fn summary_ignores_other_users() {
        let connection = get_test_connection();
        let user = create_test_user("foo@bar.baz", &connection);
        let other_user = create_test_user("bar@baz.qux", &connection);
        let day = date!(2024 - 03 - 15);
        add::<Income>(IncomeSource::Profit, 75.0, day, other_user.id, &connection);

        let summary = get_summary(user.id, day, &connection).unwrap();

        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.transaction_count, 0);
    }
}
