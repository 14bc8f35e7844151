//! Spending limits for expense categories.

mod core;
mod handlers;

pub use core::{
    BudgetPeriod, BudgetUsage, create_budget, create_budget_table, delete_budget,
    get_budget_usage,
};
pub use handlers::{create_budget_endpoint, delete_budget_endpoint, get_budgets_endpoint};
