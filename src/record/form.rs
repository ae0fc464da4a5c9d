//! The form shared by the add and edit pages for expenses and incomes.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    html::{
        FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, InputField, base,
        field_error, submit_button,
    },
    navigation::NavBar,
    record::{Record, RecordFields, RecordKind},
    validation::{
        Choice, FieldErrors, check_max_length, parse_amount, parse_choice, parse_date_or,
    },
};

/// The longest description that can be saved with a record.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// The raw form data for creating or editing a record.
///
/// Fields are kept as strings so that invalid input can be shown back to the
/// user alongside the error messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordForm {
    /// The expense category or income source.
    #[serde(default, alias = "category", alias = "source")]
    pub label: String,
    #[serde(default)]
    pub amount: String,
    /// The date in the format YYYY-MM-DD, defaults to today when empty.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

impl RecordForm {
    /// A blank form with the date set to `today`.
    pub fn new(today: Date) -> Self {
        Self {
            date: today.to_string(),
            ..Default::default()
        }
    }

    /// A form filled in with the current values of `record`.
    pub fn from_record<K: RecordKind>(record: &Record<K>) -> Self {
        Self {
            label: record.label.as_str().to_owned(),
            amount: format!("{:.2}", record.amount),
            date: record.date.to_string(),
            description: record.description.clone().unwrap_or_default(),
        }
    }

    /// Check every field, using `today` when no date was given.
    ///
    /// # Errors
    /// Returns the error message for each invalid field.
    pub fn validate<K: RecordKind>(&self, today: Date) -> Result<RecordFields<K>, FieldErrors> {
        let mut errors = FieldErrors::new();

        let label = parse_choice::<K::Label>(K::LABEL_COLUMN, &self.label, &mut errors);
        let amount = parse_amount("amount", &self.amount, &mut errors);
        let date = parse_date_or("date", &self.date, today, &mut errors);
        let description = self.description.trim();
        check_max_length(
            "description",
            description,
            MAX_DESCRIPTION_LENGTH,
            &mut errors,
        );

        match (label, amount, date) {
            (Some(label), Some(amount), Some(date)) if errors.is_empty() => Ok(RecordFields {
                label,
                description: (!description.is_empty()).then(|| description.to_owned()),
                amount,
                date,
            }),
            _ => Err(errors),
        }
    }
}

/// The add or edit form. Both plain and htmx submissions are posted to `action`.
pub fn record_form_view<K: RecordKind>(
    action: &str,
    form: &RecordForm,
    errors: &FieldErrors,
    submit_text: &str,
) -> Markup {
    let label_has_error = errors.get(K::LABEL_COLUMN).is_some();

    html! {
        form
            id="record-form"
            method="post"
            action=(action)
            hx-post=(action)
            hx-select="#record-form"
            hx-target="this"
            hx-swap="outerHTML"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for=(K::LABEL_COLUMN) class=(FORM_LABEL_STYLE) { (K::LABEL_TITLE) }

                select
                    name=(K::LABEL_COLUMN)
                    id=(K::LABEL_COLUMN)
                    required
                    aria-invalid=[label_has_error.then_some("true")]
                    aria-describedby=[label_has_error.then(|| format!("{}-error", K::LABEL_COLUMN))]
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" disabled selected[form.label.is_empty()]
                    {
                        "Select a " (K::LABEL_TITLE.to_lowercase())
                    }

                    @for choice in K::Label::ALL {
                        option value=(choice.as_str()) selected[form.label == choice.as_str()]
                        {
                            (choice.label())
                        }
                    }
                }

                (field_error(K::LABEL_COLUMN, errors))
            }

            (InputField {
                name: "amount",
                label: "Amount",
                input_type: "number",
                value: &form.amount,
                required: true,
            }.into_html(errors))

            (InputField {
                name: "date",
                label: "Date",
                input_type: "date",
                value: &form.date,
                required: false,
            }.into_html(errors))

            (InputField {
                name: "description",
                label: "Description",
                input_type: "text",
                value: &form.description,
                required: false,
            }.into_html(errors))

            (submit_button(submit_text))
        }
    }
}

/// A full page holding a record form under the heading `title`.
pub fn record_form_page<K: RecordKind>(title: &str, form: Markup) -> Markup {
    let nav_bar = NavBar::new(K::LIST_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold leading-tight tracking-tight text-gray-900 md:text-2xl dark:text-white"
                {
                    (title)
                }

                (form)
            }
        }
    };

    base(title, &content)
}
