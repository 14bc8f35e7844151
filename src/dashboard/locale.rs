//! Display text for reports in the supported languages.

use std::{fmt::Display, str::FromStr};

use time::Month;

use crate::category::{Category, CategoryType};

/// The language used for month labels, category type labels and chart titles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    /// English, e.g. "Jan", "Income".
    English,
    /// Russian, e.g. "Янв", "Доход".
    #[default]
    Russian,
}

impl Locale {
    /// The three-letter label for `month`.
    pub fn month_label(self, month: Month) -> &'static str {
        match self {
            Locale::English => english_month_abbreviation(month),
            Locale::Russian => translate_to_russian(month),
        }
    }

    /// The display name for a category type.
    pub fn category_type_label(self, category_type: CategoryType) -> &'static str {
        match (self, category_type) {
            (Locale::English, CategoryType::Income) => "Income",
            (Locale::English, CategoryType::Expense) => "Expense",
            (Locale::Russian, CategoryType::Income) => "Доход",
            (Locale::Russian, CategoryType::Expense) => "Расход",
        }
    }

    /// The label for a category in a selection list, e.g. "Expense - Groceries".
    pub fn category_label(self, category: &Category) -> String {
        format!(
            "{} - {}",
            self.category_type_label(category.category_type),
            category.name
        )
    }

    pub(super) fn balance_series_name(self) -> &'static str {
        match self {
            Locale::English => "Balance (income - expenses)",
            Locale::Russian => "Баланс (доходы - расходы)",
        }
    }

    pub(super) fn income_series_name(self) -> &'static str {
        match self {
            Locale::English => "Income",
            Locale::Russian => "Доходы",
        }
    }

    pub(super) fn expense_series_name(self) -> &'static str {
        match self {
            Locale::English => "Expenses",
            Locale::Russian => "Расходы",
        }
    }

    pub(super) fn category_series_name(self) -> &'static str {
        match self {
            Locale::English => "Expenses by category",
            Locale::Russian => "Расходы по категориям",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::English),
            "ru" => Ok(Locale::Russian),
            other => Err(format!(
                "unsupported locale \"{other}\", expected \"en\" or \"ru\""
            )),
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::English => f.write_str("en"),
            Locale::Russian => f.write_str("ru"),
        }
    }
}

fn english_month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

fn translate_to_russian(month: Month) -> &'static str {
    match month {
        Month::January => "Янв",
        Month::February => "Фев",
        Month::March => "Мар",
        Month::April => "Апр",
        Month::May => "Май",
        Month::June => "Июн",
        Month::July => "Июл",
        Month::August => "Авг",
        Month::September => "Сен",
        Month::October => "Окт",
        Month::November => "Ноя",
        Month::December => "Дек",
    }
}
