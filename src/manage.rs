//! The management page with shortcuts for adding records and downloading reports.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    endpoints::{self, format_export_endpoint},
    html::{PAGE_CONTAINER_STYLE, base, link},
    month::MonthRange,
    navigation::NavBar,
    timezone::local_today,
};

/// The number of months, including the current one, that reports are offered for.
pub const REPORT_MONTH_COUNT: usize = 12;

/// The state needed for the management page.
#[derive(Debug, Clone)]
pub struct ManageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ManageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The current month followed by the months before it, newest first.
///
/// Stops early if a month before the earliest supported date is reached.
pub fn recent_months(current: MonthRange, count: usize) -> Vec<MonthRange> {
    std::iter::successors(Some(current), |month| month.previous().ok())
        .take(count)
        .collect()
}

/// Display the management page.
pub async fn get_manage_page(State(state): State<ManageState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let months = recent_months(MonthRange::containing(today)?, REPORT_MONTH_COUNT);

    Ok(manage_view(&months).into_response())
}

fn month_name(month: &MonthRange) -> String {
    format!("{} {}", month.start.month(), month.year())
}

fn manage_view(months: &[MonthRange]) -> Markup {
    let nav_bar = NavBar::new(endpoints::MANAGE_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-xl space-y-8"
            {
                section class="space-y-2"
                {
                    h1 class="text-xl font-bold" { "Manage" }

                    ul id="record-links" class="list-disc list-inside space-y-1"
                    {
                        li { (link(endpoints::NEW_EXPENSE_VIEW, "Add an expense")) }
                        li { (link(endpoints::NEW_INCOME_VIEW, "Add an income")) }
                        li { (link(endpoints::EXPENSES_VIEW, "View expenses")) }
                        li { (link(endpoints::INCOMES_VIEW, "View incomes")) }
                    }
                }

                section class="space-y-2"
                {
                    h2 class="text-lg font-semibold" { "Monthly reports" }

                    p class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        "Download a CSV of the incomes and expenses dated within a month."
                    }

                    ul id="report-links" class="list-disc list-inside space-y-1"
                    {
                        @for month in months {
                            li
                            {
                                (link(
                                    &format_export_endpoint(month.year(), month.month()),
                                    &month_name(month),
                                ))
                            }
                        }
                    }
                }
            }
        }
    };

    base("Manage", &content)
}
