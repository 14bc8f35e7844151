//! Savings goal model and the database functions for managing goals.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::MAX_CATEGORY_NAME_LENGTH,
    database_id::DatabaseId,
    transaction::{AMOUNT_UPPER_BOUND, Amount},
    user::UserID,
};

/// A validated, non-empty savings goal name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalName(String);

impl GoalName {
    /// Create a goal name.
    ///
    /// # Errors
    ///
    /// Returns an [Error::EmptyGoalName] if `name` is empty or only whitespace,
    /// or an [Error::NameTooLong] if it has more than 255 characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyGoalName)
        } else if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
            Err(Error::NameTooLong(MAX_CATEGORY_NAME_LENGTH))
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a goal name without validation.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for GoalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate the amount saved towards a goal so far.
///
/// Unlike [Amount], zero is allowed.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `value` is negative, not finite, too
/// large or has more than two decimal places.
pub fn saved_amount(value: f64) -> Result<f64, Error> {
    if value == 0.0 {
        return Ok(0.0);
    }

    if value.is_finite() && value < 0.0 {
        return Err(Error::InvalidAmount(value, "must not be negative"));
    }

    Amount::new(value).map(|amount| amount.as_f64())
}

/// An amount of money the user wants to have saved by a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    /// The ID of the goal.
    pub id: DatabaseId,
    /// The user that owns the goal.
    pub user_id: UserID,
    /// What the user is saving for.
    pub name: GoalName,
    /// How much the user wants to save.
    pub target_amount: f64,
    /// How much the user has saved so far.
    pub current_amount: f64,
    /// When the user wants to reach the target.
    pub target_date: Date,
    /// Optional notes about the goal.
    pub description: Option<String>,
}

impl SavingsGoal {
    /// The percentage of the target amount saved so far.
    ///
    /// Exceeds 100 once more than the target has been saved.
    pub fn progress(&self) -> f64 {
        self.current_amount / self.target_amount * 100.0
    }

    /// The label shown for the goal, e.g. "Holiday - 42.5%".
    pub fn label(&self) -> String {
        format!("{} - {:.1}%", self.name.as_ref(), self.progress())
    }
}

/// A savings goal with its progress, as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsGoalProgress {
    /// The goal itself.
    #[serde(flatten)]
    pub goal: SavingsGoal,
    /// The percentage of the target amount saved so far.
    pub progress: f64,
    /// The display label with the name and rounded progress.
    pub label: String,
}

impl From<SavingsGoal> for SavingsGoalProgress {
    fn from(goal: SavingsGoal) -> Self {
        Self {
            progress: goal.progress(),
            label: goal.label(),
            goal,
        }
    }
}

/// The data needed to create a savings goal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSavingsGoal {
    /// What the user is saving for.
    pub name: GoalName,
    /// How much the user wants to save.
    pub target_amount: Amount,
    /// How much the user has already saved, see [saved_amount].
    pub current_amount: f64,
    /// When the user wants to reach the target.
    pub target_date: Date,
    /// Optional notes about the goal.
    pub description: Option<String>,
}

/// Create a savings goal for the user.
pub fn create_savings_goal(
    user_id: UserID,
    goal: NewSavingsGoal,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    connection
        .prepare(
            "INSERT INTO savings_goal
                (user_id, name, target_amount, current_amount, target_date, description)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, user_id, name, target_amount, current_amount, target_date, description",
        )?
        .query_row(
            (
                user_id.as_i64(),
                goal.name.as_ref(),
                goal.target_amount.as_f64(),
                goal.current_amount,
                goal.target_date,
                goal.description,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve one of the user's savings goals.
///
/// # Errors
/// Returns [Error::NotFound] if the goal does not exist or belongs to another user.
pub fn get_savings_goal(
    user_id: UserID,
    id: DatabaseId,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, target_amount, current_amount, target_date, description
            FROM savings_goal WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            rusqlite::named_params! {":id": id, ":user_id": user_id.as_i64()},
            map_row,
        )
        .map_err(|error| error.into())
}

/// Get all of the user's savings goals, latest target date first.
pub fn get_savings_goals(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<SavingsGoal>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, target_amount, current_amount, target_date, description
            FROM savings_goal WHERE user_id = ?1
            ORDER BY target_date DESC, id DESC",
        )?
        .query_map((user_id.as_i64(),), map_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Set how much has been saved towards a goal.
///
/// # Errors
/// Returns [Error::UpdateMissingSavingsGoal] if the goal does not exist.
pub fn update_current_amount(
    user_id: UserID,
    id: DatabaseId,
    current_amount: f64,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    let rows_affected = connection.execute(
        "UPDATE savings_goal SET current_amount = ?1 WHERE id = ?2 AND user_id = ?3",
        (current_amount, id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingSavingsGoal);
    }

    get_savings_goal(user_id, id, connection)
}

/// Delete one of the user's savings goals.
///
/// # Errors
/// Returns [Error::DeleteMissingSavingsGoal] if the goal does not exist.
pub fn delete_savings_goal(
    user_id: UserID,
    id: DatabaseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM savings_goal WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingSavingsGoal);
    }

    Ok(())
}

/// Create the savings goal table.
pub fn create_savings_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS savings_goal (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            target_amount REAL NOT NULL CHECK (target_amount >= 0.01),
            current_amount REAL NOT NULL DEFAULT 0
                CHECK (current_amount >= 0 AND current_amount < {AMOUNT_UPPER_BOUND}),
            target_date TEXT NOT NULL,
            description TEXT,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_savings_goal_user ON savings_goal(user_id);"
    ))?;

    Ok(())
}

fn map_row(row: &Row) -> Result<SavingsGoal, rusqlite::Error> {
    let raw_name: String = row.get(2)?;

    Ok(SavingsGoal {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: GoalName::new_unchecked(&raw_name),
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        target_date: row.get(5)?,
        description: row.get(6)?,
    })
}
