//! Turns grouped query results into chart series.
//!
//! The database does the grouping and summing. The functions here fill in
//! missing values with zero, put the buckets in order and attach localized
//! month labels.

use std::collections::BTreeMap;

use time::Date;

use crate::{
    dashboard::{
        ChartSeries, IncomeExpenseSeries, Locale,
        queries::{CategoryTotal, MonthlyTotal, MonthlyTypeTotals},
    },
    transaction::round_to_cents,
};

/// Net balance (income − expenses) for each month.
///
/// Months are assumed to be unique. The output is in chronological order
/// regardless of the input order.
pub(super) fn balance_series(rows: &[MonthlyTypeTotals], locale: Locale) -> ChartSeries {
    let mut rows: Vec<_> = rows.iter().collect();
    rows.sort_by_key(|row| row.month);

    let labels = rows
        .iter()
        .map(|row| month_label(row.month, locale))
        .collect();
    let data = rows
        .iter()
        .map(|row| round_to_cents(row.income.unwrap_or(0.0) - row.expense.unwrap_or(0.0)))
        .collect();

    ChartSeries { labels, data }
}

/// Combine separately grouped income and expense totals into one series.
///
/// The labels cover every month that has either income or expenses, and a
/// month missing from one side is zero for that side.
pub(super) fn income_expense_series(
    income: &[MonthlyTotal],
    expenses: &[MonthlyTotal],
    locale: Locale,
) -> IncomeExpenseSeries {
    let mut months: BTreeMap<Date, (f64, f64)> = BTreeMap::new();

    for row in income {
        months.entry(row.month).or_default().0 += row.total;
    }

    for row in expenses {
        months.entry(row.month).or_default().1 += row.total;
    }

    let mut series = IncomeExpenseSeries::default();
    for (month, (income, expense)) in months {
        series.labels.push(month_label(month, locale));
        series.income_data.push(round_to_cents(income));
        series.expense_data.push(round_to_cents(expense));
    }

    series
}

/// Expense totals per category, largest first.
///
/// Totals are rounded to cents before sorting, so categories whose totals
/// round to the same amount are ordered by name.
pub(super) fn category_series(rows: Vec<CategoryTotal>) -> ChartSeries {
    let mut rows: Vec<(String, f64)> = rows
        .into_iter()
        .map(|row| (row.name, round_to_cents(row.total)))
        .collect();
    rows.sort_by(|(a_name, a_total), (b_name, b_total)| {
        b_total.total_cmp(a_total).then_with(|| a_name.cmp(b_name))
    });

    let (labels, data) = rows.into_iter().unzip();

    ChartSeries { labels, data }
}

fn month_label(month: Date, locale: Locale) -> String {
    locale.month_label(month.month()).to_owned()
}


#[cfg(test)]
mod income_expense_series_tests {
    use time::macros::date;

    use crate::dashboard::{Locale, aggregation::income_expense_series, queries::MonthlyTotal};

    fn total(month: time::Date, total: f64) -> MonthlyTotal {
        MonthlyTotal { month, total }
    }

    #[test]
    fn month_with_only_expenses_keeps_its_label() {
        let income = [
            total(date!(2025 - 01 - 01), 1000.0),
            total(date!(2025 - 03 - 01), 1200.0),
        ];
        let expenses = [
            total(date!(2025 - 01 - 01), 300.0),
            total(date!(2025 - 02 - 01), 450.0),
        ];

        let series = income_expense_series(&income, &expenses, Locale::English);

        assert_eq!(series.labels, vec!["Jan", "Feb", "Mar"]);
        assert_eq!(series.income_data, vec![1000.0, 0.0, 1200.0]);
        assert_eq!(series.expense_data, vec![300.0, 450.0, 0.0]);
    }

    #[test]
    fn series_always_have_equal_length() {
        let income = [total(date!(2025 - 05 - 01), 1.0)];
        let expenses = [
            total(date!(2025 - 04 - 01), 2.0),
            total(date!(2025 - 06 - 01), 3.0),
        ];

        let series = income_expense_series(&income, &expenses, Locale::Russian);

        assert_eq!(series.labels.len(), 3);
        assert_eq!(series.income_data.len(), 3);
        assert_eq!(series.expense_data.len(), 3);
    }

    #[test]
    fn no_rows_gives_empty_series() {
        let series = income_expense_series(&[], &[], Locale::Russian);

        assert!(series.labels.is_empty());
        assert!(series.income_data.is_empty());
        assert!(series.expense_data.is_empty());
    }
}
