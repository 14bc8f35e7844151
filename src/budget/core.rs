//! Budget model and the database functions for managing budgets.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::{CategoryScope, get_category},
    database_id::DatabaseId,
    transaction::{Amount, round_to_cents},
    user::UserID,
};

/// An inclusive range of dates that a budget applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetPeriod {
    start: Date,
    end: Date,
}

impl BudgetPeriod {
    /// Create a budget period from `start` to `end`, inclusive.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if `end` is before `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, Error> {
        if end < start {
            return Err(Error::InvalidDateRange { start, end });
        }

        Ok(Self { start, end })
    }

    /// The first day of the period.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The last day of the period.
    pub fn end(&self) -> Date {
        self.end
    }
}

/// A spending limit for an expense category over a period of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: DatabaseId,
    /// The user that owns the budget.
    pub user_id: UserID,
    /// The expense category the budget limits.
    pub category_id: DatabaseId,
    /// The maximum amount to spend in the period.
    pub amount: f64,
    /// The first day of the budget period.
    pub start_date: Date,
    /// The last day of the budget period.
    pub end_date: Date,
}

/// A budget with how much of it has been used so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUsage {
    /// The ID of the budget.
    pub id: DatabaseId,
    /// The expense category the budget limits.
    pub category_id: DatabaseId,
    /// The name of the budget's category.
    pub category_name: String,
    /// The maximum amount to spend in the period.
    pub amount: f64,
    /// The first day of the budget period.
    pub start_date: Date,
    /// The last day of the budget period.
    pub end_date: Date,
    /// The sum of the category's expenses within the period.
    pub spent: f64,
    /// `amount - spent`, negative when the budget has been exceeded.
    pub remaining: f64,
}

/// Create a budget for one of the user's expense categories.
///
/// # Errors
/// Returns:
/// - [Error::InvalidCategory] if the category does not belong to the user,
/// - [Error::BudgetCategoryNotExpense] if the category is an income category,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_budget(
    user_id: UserID,
    category_id: DatabaseId,
    amount: Amount,
    period: BudgetPeriod,
    connection: &Connection,
) -> Result<Budget, Error> {
    let category = get_category(user_id, category_id, connection).map_err(|error| match error {
        Error::NotFound => Error::InvalidCategory(category_id),
        error => error,
    })?;

    if !CategoryScope::expenses(user_id).allows(&category) {
        return Err(Error::BudgetCategoryNotExpense);
    }

    connection.execute(
        "INSERT INTO budget (user_id, category_id, amount, start_date, end_date)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            user_id.as_i64(),
            category_id,
            amount.as_f64(),
            period.start(),
            period.end(),
        ),
    )?;

    Ok(Budget {
        id: connection.last_insert_rowid(),
        user_id,
        category_id,
        amount: amount.as_f64(),
        start_date: period.start(),
        end_date: period.end(),
    })
}

/// Get the user's budgets with their current usage, newest start date first.
///
/// Usage is summed from the category's transactions every time this is
/// called. A budget whose category has since become an income category has
/// nothing spent.
pub fn get_budget_usage(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<BudgetUsage>, Error> {
    connection
        .prepare(
            "SELECT b.id, b.category_id, c.name, b.amount, b.start_date, b.end_date,
                (SELECT COALESCE(SUM(t.amount), 0) FROM \"transaction\" t
                    WHERE t.category_id = b.category_id
                    AND c.type = 'expense'
                    AND t.date BETWEEN b.start_date AND b.end_date)
            FROM budget b
            INNER JOIN category c ON c.id = b.category_id
            WHERE b.user_id = ?1
            ORDER BY b.start_date DESC, b.id DESC",
        )?
        .query_map((user_id.as_i64(),), map_usage_row)?
        .map(|maybe_usage| maybe_usage.map_err(|error| error.into()))
        .collect()
}

/// Delete one of the user's budgets.
///
/// # Errors
/// Returns [Error::DeleteMissingBudget] if the budget does not exist.
pub fn delete_budget(
    user_id: UserID,
    id: DatabaseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// Create the budget table.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0.01),
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL CHECK (end_date >= start_date),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_budget_user ON budget(user_id, start_date);",
    )?;

    Ok(())
}

fn map_usage_row(row: &Row) -> Result<BudgetUsage, rusqlite::Error> {
    let amount: f64 = row.get(3)?;
    let spent = round_to_cents(row.get(6)?);

    Ok(BudgetUsage {
        id: row.get(0)?,
        category_id: row.get(1)?,
        category_name: row.get(2)?,
        amount,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        spent,
        remaining: round_to_cents(amount - spent),
    })
}
