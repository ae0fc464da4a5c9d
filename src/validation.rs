//! Field level validation for the HTML forms.
//!
//! Form handlers deserialize every field as a string and convert them with
//! the helpers in this module, collecting a message per invalid field so
//! that all problems can be shown next to their inputs at once.

use std::collections::BTreeMap;

use time::{Date, macros::format_description};

use crate::auth::Email;

/// The smallest amount of money that can be recorded.
pub const MIN_AMOUNT: f64 = 0.01;
/// The largest amount of money that can be recorded.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

pub const REQUIRED_MSG: &str = "This field is required.";
pub const AMOUNT_NOT_A_NUMBER_MSG: &str = "Amount must be a number.";
pub const AMOUNT_TOO_SMALL_MSG: &str = "Amount must be at least 0.01.";
pub const AMOUNT_TOO_LARGE_MSG: &str = "Amount must be at most 1,000,000,000,000.";
pub const INVALID_DATE_MSG: &str = "Date must be a valid date (YYYY-MM-DD).";
pub const INVALID_CHOICE_MSG: &str = "Not a valid choice.";
pub const INVALID_EMAIL_MSG: &str = "Invalid email address.";

/// Error messages keyed by the name of the form field they belong to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`. The first error recorded for a field is kept.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Return the trimmed value, or record [REQUIRED_MSG] if it is empty.
pub fn required<'a>(
    field: &'static str,
    value: &'a str,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    let value = value.trim();

    if value.is_empty() {
        errors.insert(field, REQUIRED_MSG);
        None
    } else {
        Some(value)
    }
}

/// Record an error if `value` is longer than `max_length` characters.
pub fn check_max_length(
    field: &'static str,
    value: &str,
    max_length: usize,
    errors: &mut FieldErrors,
) {
    if value.chars().count() > max_length {
        errors.insert(
            field,
            format!("Must be at most {max_length} characters long."),
        );
    }
}

/// Parse an amount of money between [MIN_AMOUNT] and [MAX_AMOUNT], rounded to cents.
///
/// The bounds are checked before rounding, so 0.005 is too small.
pub fn parse_amount(field: &'static str, value: &str, errors: &mut FieldErrors) -> Option<f64> {
    let value = required(field, value, errors)?;

    let amount = match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount,
        _ => {
            errors.insert(field, AMOUNT_NOT_A_NUMBER_MSG);
            return None;
        }
    };

    if amount < MIN_AMOUNT {
        errors.insert(field, AMOUNT_TOO_SMALL_MSG);
        return None;
    }

    if amount > MAX_AMOUNT {
        errors.insert(field, AMOUNT_TOO_LARGE_MSG);
        return None;
    }

    Some((amount * 100.0).round() / 100.0)
}

/// Parse a date in the format YYYY-MM-DD, using `default` if `value` is blank.
pub fn parse_date_or(
    field: &'static str,
    value: &str,
    default: Date,
    errors: &mut FieldErrors,
) -> Option<Date> {
    let value = value.trim();

    if value.is_empty() {
        return Some(default);
    }

    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .inspect_err(|_| errors.insert(field, INVALID_DATE_MSG))
        .ok()
}

/// A closed set of values that a form field may take, e.g. an expense category.
pub trait Choice: Sized + Copy + 'static {
    /// Every value in the order it should be displayed.
    const ALL: &'static [Self];

    /// The value stored in the database and sent in forms.
    fn as_str(&self) -> &'static str;

    /// The human readable name.
    fn label(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|choice| choice.as_str() == value)
            .copied()
    }
}

/// Parse one of the values of `C`.
pub fn parse_choice<C: Choice>(
    field: &'static str,
    value: &str,
    errors: &mut FieldErrors,
) -> Option<C> {
    let value = required(field, value, errors)?;

    let choice = C::parse(value);
    if choice.is_none() {
        errors.insert(field, INVALID_CHOICE_MSG);
    }

    choice
}

/// Parse and normalize an email address.
pub fn parse_email(field: &'static str, value: &str, errors: &mut FieldErrors) -> Option<Email> {
    let value = required(field, value, errors)?;

    Email::new(value)
        .inspect_err(|_| errors.insert(field, INVALID_EMAIL_MSG))
        .ok()
}
