//! The reports shown on the dashboard.
//!
//! Each report takes the user and its date window explicitly. "Today" is
//! passed in by the caller so that reports do not depend on the clock.

use rusqlite::Connection;
use time::{Date, Duration};

use crate::{
    Error,
    category::CategoryType,
    dashboard::{
        ChartSeries, Dashboard, IncomeExpenseSeries, Locale,
        aggregation::{balance_series, category_series, income_expense_series},
        queries::{category_expense_totals, monthly_totals, monthly_type_totals},
    },
    user::UserID,
};

/// The number of trailing months in the balance report when none is given.
pub const DEFAULT_BALANCE_MONTHS: u32 = 6;

/// Every "month" in the balance window is this many days long.
const DAYS_PER_MONTH: i64 = 30;

/// The length of the income/expense window in days.
const INCOME_EXPENSE_WINDOW_DAYS: i64 = 180;

/// Net balance (income − expenses) for each calendar month in the trailing window.
///
/// The window runs from `months` × 30 days before `today` up to and
/// including `today`, so it only approximates whole calendar months.
/// Transactions dated after `today` are not counted.
pub fn compute_monthly_balance(
    user_id: UserID,
    months: u32,
    today: Date,
    locale: Locale,
    connection: &Connection,
) -> Result<ChartSeries, Error> {
    let start = days_before(today, DAYS_PER_MONTH * i64::from(months));
    let rows = monthly_type_totals(user_id, start, today, connection)?;

    Ok(balance_series(&rows, locale))
}

/// Income and expense totals for each calendar month between `start` and `end` inclusive.
pub fn compute_income_expense_series(
    user_id: UserID,
    start: Date,
    end: Date,
    locale: Locale,
    connection: &Connection,
) -> Result<IncomeExpenseSeries, Error> {
    let income = monthly_totals(user_id, CategoryType::Income, start, end, connection)?;
    let expenses = monthly_totals(user_id, CategoryType::Expense, start, end, connection)?;

    Ok(income_expense_series(&income, &expenses, locale))
}

/// Expense totals per category between `start` and `end` inclusive, largest first.
pub fn compute_category_breakdown(
    user_id: UserID,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<ChartSeries, Error> {
    let rows = category_expense_totals(user_id, start, end, connection)?;

    Ok(category_series(rows))
}

/// Compute every dashboard report for the user as of `today`.
///
/// - The balance covers the last `months` × 30 days.
/// - Income and expenses cover the last 180 days.
/// - The category breakdown covers the current calendar month so far.
pub fn build_dashboard(
    user_id: UserID,
    months: u32,
    today: Date,
    locale: Locale,
    connection: &Connection,
) -> Result<Dashboard, Error> {
    let monthly_balance = compute_monthly_balance(user_id, months, today, locale, connection)?;

    let income_expense = compute_income_expense_series(
        user_id,
        days_before(today, INCOME_EXPENSE_WINDOW_DAYS),
        today,
        locale,
        connection,
    )?;

    let category_expenses =
        compute_category_breakdown(user_id, first_of_month(today), today, connection)?;

    Ok(Dashboard {
        monthly_balance,
        income_expense,
        category_expenses,
    })
}

fn days_before(date: Date, days: i64) -> Date {
    date.checked_sub(Duration::days(days)).unwrap_or(Date::MIN)
}

fn first_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}
