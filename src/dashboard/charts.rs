//! ECharts options for the dashboard reports.
//!
//! The options are plain JSON so that any ECharts front end can render them
//! with `chart.setOption(options)`.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisPointer, AxisPointerType, AxisType, ItemStyle, LineStyle, Tooltip, Trigger,
    },
    series::{Bar, Line},
};
use serde::Serialize;

use crate::dashboard::{ChartSeries, Dashboard, IncomeExpenseSeries, Locale};

const BALANCE_COLOR: &str = "#d346b1";
const INCOME_COLOR: &str = "#00d6b4";
const EXPENSE_COLOR: &str = "#f44336";
const CATEGORY_COLOR: &str = "#1f8ef1";

/// A dashboard chart with its element ID and ECharts options.
#[derive(Serialize)]
pub struct DashboardChart {
    /// The element ID to use for the chart (kebab-case).
    pub id: &'static str,
    /// The ECharts options.
    pub options: Chart,
}

/// Build the four dashboard charts from the computed reports.
pub fn dashboard_charts(dashboard: &Dashboard, locale: Locale) -> Vec<DashboardChart> {
    let (income_chart, expense_chart) = income_expense_charts(&dashboard.income_expense, locale);

    vec![
        DashboardChart {
            id: "monthly-balance",
            options: balance_chart(&dashboard.monthly_balance, locale),
        },
        DashboardChart {
            id: "monthly-income",
            options: income_chart,
        },
        DashboardChart {
            id: "monthly-expenses",
            options: expense_chart,
        },
        DashboardChart {
            id: "category-expenses",
            options: category_chart(&dashboard.category_expenses, locale),
        },
    ]
}

fn balance_chart(series: &ChartSeries, locale: Locale) -> Chart {
    line_chart(
        locale.balance_series_name(),
        &series.labels,
        series.data.clone(),
        BALANCE_COLOR,
    )
}

fn income_expense_charts(series: &IncomeExpenseSeries, locale: Locale) -> (Chart, Chart) {
    let income = line_chart(
        locale.income_series_name(),
        &series.labels,
        series.income_data.clone(),
        INCOME_COLOR,
    );
    let expenses = line_chart(
        locale.expense_series_name(),
        &series.labels,
        series.expense_data.clone(),
        EXPENSE_COLOR,
    );

    (income, expenses)
}

fn category_chart(series: &ChartSeries, locale: Locale) -> Chart {
    let name = locale.category_series_name();

    base_chart(name, &series.labels).series(
        Bar::new()
            .name(name)
            .item_style(ItemStyle::new().color(CATEGORY_COLOR))
            .data(series.data.clone()),
    )
}

fn line_chart(name: &str, labels: &[String], values: Vec<f64>, color: &str) -> Chart {
    base_chart(name, labels).series(
        Line::new()
            .name(name)
            .item_style(ItemStyle::new().color(color))
            .line_style(LineStyle::new().color(color))
            .data(values),
    )
}

fn base_chart(title: &str, labels: &[String]) -> Chart {
    Chart::new()
        .title(Title::new().text(title))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .legend(Legend::new().top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels.to_vec()))
        .y_axis(Axis::new().type_(AxisType::Value))
}
