//! Grouped-sum queries over the transaction ledger.
//!
//! Every query joins the category table so that a transaction always counts
//! with its category's current type.

use rusqlite::{Connection, named_params};
use time::Date;

use crate::{Error, category::CategoryType, user::UserID};

/// Income and expense sums for one calendar month.
///
/// A sum is `None` when the month has no transactions of that type.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct MonthlyTypeTotals {
    /// The first day of the month.
    pub month: Date,
    pub income: Option<f64>,
    pub expense: Option<f64>,
}

/// The sum of one type of transaction in a calendar month.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct MonthlyTotal {
    /// The first day of the month.
    pub month: Date,
    pub total: f64,
}

/// The sum of expenses for one category name.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategoryTotal {
    pub name: String,
    pub total: f64,
}

/// Sum income and expenses per calendar month between `start` and `end` inclusive.
pub(super) fn monthly_type_totals(
    user_id: UserID,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<MonthlyTypeTotals>, Error> {
    connection
        .prepare(
            "SELECT strftime('%Y-%m-01', t.date) AS month,
                SUM(CASE WHEN c.type = 'income' THEN t.amount END),
                SUM(CASE WHEN c.type = 'expense' THEN t.amount END)
            FROM \"transaction\" t
            INNER JOIN category c ON c.id = t.category_id
            WHERE t.user_id = :user_id AND t.date BETWEEN :start AND :end
            GROUP BY month
            ORDER BY month ASC",
        )?
        .query_map(
            named_params! {":user_id": user_id.as_i64(), ":start": start, ":end": end},
            |row| {
                Ok(MonthlyTypeTotals {
                    month: row.get(0)?,
                    income: row.get(1)?,
                    expense: row.get(2)?,
                })
            },
        )?
        .map(|maybe_row| maybe_row.map_err(Error::from))
        .collect()
}

/// Sum transactions of `category_type` per calendar month between `start` and `end` inclusive.
///
/// Months without any such transactions are left out.
pub(super) fn monthly_totals(
    user_id: UserID,
    category_type: CategoryType,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<MonthlyTotal>, Error> {
    connection
        .prepare(
            "SELECT strftime('%Y-%m-01', t.date) AS month, SUM(t.amount)
            FROM \"transaction\" t
            INNER JOIN category c ON c.id = t.category_id
            WHERE t.user_id = :user_id AND c.type = :type AND t.date BETWEEN :start AND :end
            GROUP BY month
            ORDER BY month ASC",
        )?
        .query_map(
            named_params! {
                ":user_id": user_id.as_i64(),
                ":type": category_type,
                ":start": start,
                ":end": end,
            },
            |row| {
                Ok(MonthlyTotal {
                    month: row.get(0)?,
                    total: row.get(1)?,
                })
            },
        )?
        .map(|maybe_row| maybe_row.map_err(Error::from))
        .collect()
}

/// Sum expenses per category name between `start` and `end` inclusive.
pub(super) fn category_expense_totals(
    user_id: UserID,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT c.name, SUM(t.amount)
            FROM \"transaction\" t
            INNER JOIN category c ON c.id = t.category_id
            WHERE t.user_id = :user_id AND c.type = 'expense' AND t.date BETWEEN :start AND :end
            GROUP BY c.name",
        )?
        .query_map(
            named_params! {":user_id": user_id.as_i64(), ":start": start, ":end": end},
            |row| {
                Ok(CategoryTotal {
                    name: row.get(0)?,
                    total: row.get(1)?,
                })
            },
        )?
        .map(|maybe_row| maybe_row.map_err(Error::from))
        .collect()
}
