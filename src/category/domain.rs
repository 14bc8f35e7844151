//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId, user::UserID};

/// The maximum number of characters in a category name.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 255;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty or only whitespace, or an [Error::NameTooLong] if it is longer than
    /// [MAX_CATEGORY_NAME_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
            Err(Error::NameTooLong(MAX_CATEGORY_NAME_LENGTH))
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the
    /// non-empty invariant is violated it will cause incorrect behaviour but not affect
    /// memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether money in a category is earned or spent.
///
/// Transactions do not store a type of their own, they take it from their
/// category whenever they are aggregated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Money coming in, e.g. wages.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl CategoryType {
    /// The value stored in the database for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            other => Err(format!("unknown category type \"{other}\"")),
        }
    }
}

impl ToSql for CategoryType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CategoryType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// A category for income or expenses, e.g., 'Wages', 'Groceries'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseId,
    /// The user that owns the category.
    pub user_id: UserID,
    /// The name of the category.
    pub name: CategoryName,
    /// Whether the category is for income or expenses.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

/// JSON body for category creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    /// The name of the category.
    pub name: String,
    /// Whether the category is for income or expenses.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

/// Query parameters for filtering the category list.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryFilter {
    /// Only include categories of this type.
    #[serde(default, rename = "type")]
    pub category_type: Option<CategoryType>,
    /// Only include categories whose name contains this text, ignoring case.
    #[serde(default)]
    pub search: Option<String>,
}

/// Restricts which categories are offered when choosing a category for a record.
///
/// Transactions may use any of the user's categories, while budgets only
/// accept expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryScope {
    /// The user whose categories may be chosen.
    pub user_id: UserID,
    /// Only offer categories of this type, or all types if `None`.
    pub category_type: Option<CategoryType>,
}

impl CategoryScope {
    /// A scope offering only the user's expense categories.
    pub fn expenses(user_id: UserID) -> Self {
        Self {
            user_id,
            category_type: Some(CategoryType::Expense),
        }
    }

    /// Whether `category` may be chosen within this scope.
    pub fn allows(&self, category: &Category) -> bool {
        category.user_id == self.user_id
            && self
                .category_type
                .is_none_or(|category_type| category_type == category.category_type)
    }
}

/// A category in a selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChoice {
    /// The ID of the category.
    pub id: DatabaseId,
    /// The display label, e.g. "Expense - Groceries".
    pub label: String,
}
