//! Calendar month ranges used by the dashboard and the CSV reports.

use time::{Date, Month};

use crate::Error;

/// A half-open date range covering one calendar month,
/// `[first day of the month, first day of the next month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    /// The first day of the month.
    pub start: Date,
    /// The first day of the following month.
    pub end: Date,
}

impl MonthRange {
    /// The range for `month` (1-12) of `year`.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `month` is not between 1 and 12 or the
    /// year is outside the supported date range.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        let invalid_month = || Error::InvalidMonth { year, month };

        let calendar_month = Month::try_from(month).map_err(|_| invalid_month())?;
        let start =
            Date::from_calendar_date(year, calendar_month, 1).map_err(|_| invalid_month())?;
        let end = first_day_of_next_month(start).ok_or_else(invalid_month)?;

        Ok(Self { start, end })
    }

    /// The range for the month that `date` falls in.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `date` is in the last supported month.
    pub fn containing(date: Date) -> Result<Self, Error> {
        Self::new(date.year(), date.month() as u8)
    }

    /// The range for the month before this one.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if this is the first supported month.
    pub fn previous(&self) -> Result<Self, Error> {
        let day_before = self.start.previous_day().ok_or(Error::InvalidMonth {
            year: self.start.year(),
            month: self.start.month() as u8,
        })?;

        Self::containing(day_before)
    }

    /// Whether `date` falls within the month.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }

    /// The calendar year of the month.
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// The month number, 1 for January through to 12 for December.
    pub fn month(&self) -> u8 {
        self.start.month() as u8
    }
}

fn first_day_of_next_month(first_day: Date) -> Option<Date> {
    let (year, month) = match first_day.month() {
        Month::December => (first_day.year().checked_add(1)?, Month::January),
        month => (first_day.year(), month.next()),
    };

    Date::from_calendar_date(year, month, 1).ok()
}
