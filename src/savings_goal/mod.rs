//! Savings goals and their progress.

mod core;
mod handlers;

pub use core::{
    GoalName, NewSavingsGoal, SavingsGoal, SavingsGoalProgress, create_savings_goal,
    create_savings_goal_table, delete_savings_goal, get_savings_goal, get_savings_goals,
    saved_amount, update_current_amount,
};
pub use handlers::{
    create_savings_goal_endpoint, delete_savings_goal_endpoint, get_savings_goals_endpoint,
    update_current_amount_endpoint,
};
