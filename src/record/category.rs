//! The fixed set of expense categories and income sources.

use crate::validation::Choice;

/// What an expense was spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseCategory {
    /// Groceries and eating out.
    Food,
    /// Rent, utilities and things for the home.
    Household,
    /// Internet and phone plans.
    Internet,
    /// Public transport, fuel and fares.
    Transport,
}

impl Choice for ExpenseCategory {
    const ALL: &'static [Self] = &[
        ExpenseCategory::Food,
        ExpenseCategory::Household,
        ExpenseCategory::Internet,
        ExpenseCategory::Transport,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "food",
            ExpenseCategory::Household => "household",
            ExpenseCategory::Internet => "internet",
            ExpenseCategory::Transport => "transport",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Household => "Household",
            ExpenseCategory::Internet => "Internet",
            ExpenseCategory::Transport => "Transport",
        }
    }
}

/// Where an income came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeSource {
    /// Regular pay from an employer.
    Salary,
    /// Pay earned as a share of sales.
    Commission,
    /// One-off pay on top of a salary.
    Bonus,
    /// Returns from a business or investment.
    Profit,
}

impl Choice for IncomeSource {
    const ALL: &'static [Self] = &[
        IncomeSource::Salary,
        IncomeSource::Commission,
        IncomeSource::Bonus,
        IncomeSource::Profit,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            IncomeSource::Salary => "salary",
            IncomeSource::Commission => "commission",
            IncomeSource::Bonus => "bonus",
            IncomeSource::Profit => "profit",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IncomeSource::Salary => "Salary",
            IncomeSource::Commission => "Commission",
            IncomeSource::Bonus => "Bonus",
            IncomeSource::Profit => "Profit",
        }
    }
}

#[cfg(test)]
mod choice_tests {
    use crate::validation::Choice;

    use super::{ExpenseCategory, IncomeSource};

    #[test]
    fn parse_inverts_as_str() {
        for category in ExpenseCategory::ALL {
            assert_eq!(ExpenseCategory::parse(category.as_str()), Some(*category));
        }

        for source in IncomeSource::ALL {
            assert_eq!(IncomeSource::parse(source.as_str()), Some(*source));
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(ExpenseCategory::parse("Food"), None);
        assert_eq!(IncomeSource::parse("SALARY"), None);
    }

    #[test]
    fn categories_and_sources_are_disjoint() {
        assert_eq!(IncomeSource::parse("food"), None);
        assert_eq!(ExpenseCategory::parse("salary"), None);
    }
}
