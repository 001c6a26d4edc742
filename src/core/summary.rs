//! Monthly summary business logic
//!
//! Prepares the data behind the spending chart: totals for the six months ending at the
//! current month, oldest first. Buckets are keyed by month-of-year only, so two expenses in
//! March of different years land in the same bucket. [`current_month_total`] is the
//! year-aware counterpart used for the "this month" figure.

use chrono::{Datelike, NaiveDate};

/// Number of months shown in the trailing summary.
pub const TRAILING_MONTHS: u32 = 6;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Total spend for one calendar month of the summary window.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    /// Short month name, e.g. `"Mar"`
    pub label: &'static str,
    /// Month of year, 1-12
    pub month: u32,
    /// Sum of amounts for expenses whose date falls in `month`
    pub total: f64,
}

/// Short label for a month of year (1-12).
#[must_use]
pub fn month_label(month: u32) -> &'static str {
    let index = month.saturating_sub(1) as usize % MONTH_LABELS.len();
    MONTH_LABELS[index]
}

/// Months of year in the trailing window ending at `today`, oldest first.
#[must_use]
pub fn trailing_months(today: NaiveDate) -> Vec<u32> {
    let current = today.month0();
    (0..TRAILING_MONTHS)
        .rev()
        .map(|back| (current + 12 - back) % 12 + 1)
        .collect()
}

/// Buckets `(date, amount)` pairs into the six months ending at `today`.
///
/// The result always has six entries, oldest month first. Months with no expenses total
/// 0.0, and expenses outside the window's months are ignored. Matching is by month-of-year
/// alone.
#[must_use]
pub fn trailing_monthly_totals<I>(expenses: I, today: NaiveDate) -> Vec<MonthlyTotal>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let months = trailing_months(today);
    let mut totals = [0.0_f64; 12];
    for (date, amount) in expenses {
        totals[date.month0() as usize] += amount;
    }

    months
        .into_iter()
        .map(|month| MonthlyTotal {
            label: month_label(month),
            month,
            total: totals[(month - 1) as usize],
        })
        .collect()
}

/// Sums amounts dated in the same month and year as `today`.
#[must_use]
pub fn current_month_total<I>(expenses: I, today: NaiveDate) -> f64
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    expenses
        .into_iter()
        .filter(|(date, _)| date.year() == today.year() && date.month() == today.month())
        .map(|(_, amount)| amount)
        .sum()
}

/// Formats a date for display, e.g. `Mar 15, 2024`.
#[must_use]
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_trailing_months_wraps_year_boundary() {
        assert_eq!(trailing_months(date(2024, 2, 10)), vec![9, 10, 11, 12, 1, 2]);
        assert_eq!(trailing_months(date(2024, 6, 30)), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(trailing_months(date(2024, 12, 1)), vec![7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_labels_follow_months() {
        let totals = trailing_monthly_totals(Vec::new(), date(2024, 3, 1));
        let labels: Vec<&str> = totals.iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]);
        assert!(totals.iter().all(|t| t.total == 0.0));
    }

    #[test]
    fn test_eight_items_over_six_months_sum_matches_window() {
        let today = date(2024, 6, 15);
        let expenses = vec![
            (date(2024, 1, 5), 100.0),
            (date(2024, 2, 5), 50.0),
            (date(2024, 2, 20), 25.0),
            (date(2024, 3, 1), 10.0),
            (date(2024, 4, 9), 40.0),
            (date(2024, 5, 30), 60.0),
            (date(2024, 6, 1), 5.0),
            // December falls outside the January-June window
            (date(2023, 12, 24), 1000.0),
        ];

        let totals = trailing_monthly_totals(expenses.clone(), today);
        assert_eq!(totals.len(), 6);

        let window = trailing_months(today);
        let expected: f64 = expenses
            .iter()
            .filter(|(d, _)| window.contains(&d.month()))
            .map(|(_, a)| a)
            .sum();
        let actual: f64 = totals.iter().map(|t| t.total).sum();
        assert_eq!(actual, expected);
        assert_eq!(actual, 290.0);

        assert_eq!(totals[1].label, "Feb");
        assert_eq!(totals[1].total, 75.0);
    }

    #[test]
    fn test_same_month_of_different_years_is_merged() {
        let totals = trailing_monthly_totals(
            vec![(date(2024, 3, 1), 10.0), (date(2021, 3, 1), 5.0)],
            date(2024, 3, 20),
        );
        assert_eq!(totals.last().unwrap().total, 15.0);
    }

    #[test]
    fn test_current_month_total_is_year_aware() {
        let today = date(2024, 3, 20);
        let total = current_month_total(
            vec![
                (date(2024, 3, 1), 10.0),
                (date(2024, 3, 31), 2.5),
                (date(2023, 3, 1), 100.0),
                (date(2024, 2, 29), 7.0),
            ],
            today,
        );
        assert_eq!(total, 12.5);
    }

    #[test]
    fn test_format_display_date() {
        assert_eq!(format_display_date(date(2024, 3, 5)), "Mar 05, 2024");
    }
}
