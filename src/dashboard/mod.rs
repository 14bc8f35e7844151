//! Financial reports for the dashboard.
//!
//! Computes monthly balances, monthly income and expense totals and
//! per-category expense totals for a user, ready for charting. Results are
//! served both as raw label/value series and as ECharts options.

mod aggregation;
mod charts;
mod handlers;
mod locale;
mod queries;
mod reports;
mod series;

pub use charts::{DashboardChart, dashboard_charts};
pub use handlers::{get_dashboard_charts_endpoint, get_dashboard_endpoint};
pub use locale::Locale;
pub use reports::{
    DEFAULT_BALANCE_MONTHS, build_dashboard, compute_category_breakdown,
    compute_income_expense_series, compute_monthly_balance,
};
pub use series::{ChartSeries, Dashboard, IncomeExpenseSeries};
