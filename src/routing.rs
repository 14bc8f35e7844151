//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{
    AppState,
    budget::{create_budget_endpoint, delete_budget_endpoint, get_budgets_endpoint},
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        get_category_choices_endpoint, update_category_endpoint,
    },
    dashboard::{get_dashboard_charts_endpoint, get_dashboard_endpoint},
    endpoints,
    not_found::get_404_not_found,
    savings_goal::{
        create_savings_goal_endpoint, delete_savings_goal_endpoint, get_savings_goals_endpoint,
        update_current_amount_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint,
    },
    user::{create_user_endpoint, get_user_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::USERS, post(create_user_endpoint))
        .route(endpoints::USER, get(get_user_endpoint))
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY_CHOICES,
            get(get_category_choices_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            get(get_budgets_endpoint).post(create_budget_endpoint),
        )
        .route(endpoints::BUDGET, delete(delete_budget_endpoint))
        .route(
            endpoints::SAVINGS_GOALS,
            get(get_savings_goals_endpoint).post(create_savings_goal_endpoint),
        )
        .route(endpoints::SAVINGS_GOAL, delete(delete_savings_goal_endpoint))
        .route(
            endpoints::SAVINGS_GOAL_CURRENT_AMOUNT,
            put(update_current_amount_endpoint),
        )
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route(endpoints::DASHBOARD_CHARTS, get(get_dashboard_charts_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}
