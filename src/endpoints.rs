//! The API endpoints URIs.
//!
//! Every resource belongs to a user, so routes are nested under
//! [USER] and take the user's ID as the first path parameter.

/// The route to create users.
pub const USERS: &str = "/api/users";
/// The route to access a single user.
pub const USER: &str = "/api/users/{user_id}";
/// The route to list and create a user's categories.
pub const CATEGORIES: &str = "/api/users/{user_id}/categories";
/// The route to list a user's categories as choices for a selection list.
pub const CATEGORY_CHOICES: &str = "/api/users/{user_id}/categories/choices";
/// The route to update or delete a single category.
pub const CATEGORY: &str = "/api/users/{user_id}/categories/{category_id}";
/// The route to list and create a user's transactions.
pub const TRANSACTIONS: &str = "/api/users/{user_id}/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/users/{user_id}/transactions/{transaction_id}";
/// The route to list and create a user's budgets.
pub const BUDGETS: &str = "/api/users/{user_id}/budgets";
/// The route to delete a single budget.
pub const BUDGET: &str = "/api/users/{user_id}/budgets/{budget_id}";
/// The route to list and create a user's savings goals.
pub const SAVINGS_GOALS: &str = "/api/users/{user_id}/savings_goals";
/// The route to delete a single savings goal.
pub const SAVINGS_GOAL: &str = "/api/users/{user_id}/savings_goals/{goal_id}";
/// The route to set how much has been saved towards a goal.
pub const SAVINGS_GOAL_CURRENT_AMOUNT: &str =
    "/api/users/{user_id}/savings_goals/{goal_id}/current_amount";
/// The route for the dashboard report series.
pub const DASHBOARD: &str = "/api/users/{user_id}/dashboard";
/// The route for the dashboard chart options.
pub const DASHBOARD_CHARTS: &str = "/api/users/{user_id}/dashboard/charts";

/// Replace the parameters in `endpoint_path` with `ids`, in order.
///
/// A parameter is a string that starts with a left brace and ends with a
/// right brace, e.g. '{user_id}' in '/api/users/{user_id}'.
///
/// Parameters without a matching ID are left untouched and extra IDs are ignored.
pub fn format_endpoint(endpoint_path: &str, ids: &[i64]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut ids = ids.iter();
    let mut rest = endpoint_path;

    while let Some(start) = rest.find('{') {
        let Some(length) = rest[start..].find('}') else {
            break;
        };
        let end = start + length;

        formatted.push_str(&rest[..start]);

        match ids.next() {
            Some(id) => formatted.push_str(&id.to_string()),
            None => formatted.push_str(&rest[start..=end]),
        }

        rest = &rest[end + 1..];
    }

    formatted.push_str(rest);
    formatted
}
