//! The label/value series returned to the charting layer.

use serde::{Deserialize, Serialize};

/// Positionally aligned labels and values for a single chart series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// The x-axis labels, e.g. month abbreviations or category names.
    pub labels: Vec<String>,
    /// One value per label.
    pub data: Vec<f64>,
}

impl ChartSeries {
    /// Whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Monthly income and expense totals sharing one set of month labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeExpenseSeries {
    /// Month abbreviations in chronological order.
    pub labels: Vec<String>,
    /// Total income for each month in `labels`.
    pub income_data: Vec<f64>,
    /// Total expenses for each month in `labels`.
    pub expense_data: Vec<f64>,
}

/// Everything shown on a user's dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Income minus expenses for each of the trailing months.
    pub monthly_balance: ChartSeries,
    /// Income and expenses for each month of the last half year.
    pub income_expense: IncomeExpenseSeries,
    /// Expenses per category so far this month, largest first.
    pub category_expenses: ChartSeries,
}
