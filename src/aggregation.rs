//! Pure functions that turn a snapshot of expenses into the summaries shown to users.
//!
//! Every function takes the expenses it works on as an argument and keeps no
//! state between calls, so callers read the expenses from the store once and
//! pass the same snapshot to as many functions as they need. None of the
//! functions can fail.
//!
//! The year and month of an expense are taken from its date in the UTC offset
//! it was recorded with.

use std::{
    collections::{BTreeMap, BTreeSet},
    iter,
    ops::RangeInclusive,
};

use serde::Serialize;
use time::Month;

use crate::{
    Error,
    expense::{Category, Expense},
};

/// The total, count and average amount of a group of expenses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// The sum of the amounts.
    pub total: f64,
    /// The number of expenses.
    pub count: usize,
    /// `total / count`, or zero if there are no expenses.
    pub average: f64,
}

impl Summary {
    /// The summary with the total and average rounded to the nearest cent.
    pub fn rounded(self) -> Self {
        Self {
            total: round_to_cents(self.total),
            average: round_to_cents(self.average),
            ..self
        }
    }
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Calculate the total, count and average of `expenses`.
pub fn summarize<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Summary {
    let (total, count) = expenses
        .into_iter()
        .fold((0.0, 0), |(total, count), expense| {
            (total + expense.amount, count + 1)
        });

    let average = if count == 0 { 0.0 } else { total / count as f64 };

    Summary {
        total,
        count,
        average,
    }
}

/// Get the expenses dated in `month` of `year`, in their original order.
pub fn filter_by_month(expenses: &[Expense], year: i32, month: Month) -> Vec<&Expense> {
    expenses
        .iter()
        .filter(|expense| expense.date.year() == year && expense.date.month() == month)
        .collect()
}

/// Get the years a user can choose from, most recent first.
///
/// The list always contains `current_year` and the year before it, even when
/// there are no expenses, followed by every other year that has an expense.
pub fn available_years(expenses: &[Expense], current_year: i32) -> Vec<i32> {
    let years: BTreeSet<i32> = [current_year, current_year - 1]
        .into_iter()
        .chain(expenses.iter().map(|expense| expense.date.year()))
        .collect();

    years.into_iter().rev().collect()
}

/// The expenses in a single month and their summary.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthOverview<'a> {
    /// The calendar month.
    pub month: Month,
    /// The expenses dated in the month, in their original order.
    pub expenses: Vec<&'a Expense>,
    /// The summary of `expenses`.
    pub summary: Summary,
}

impl MonthOverview<'_> {
    /// Whether any expenses were recorded in the month.
    ///
    /// A month without expenses should be displayed differently from a month
    /// with expenses, regardless of the total.
    pub fn has_data(&self) -> bool {
        self.summary.count > 0
    }
}

/// Iterate over the months of the year from January to December.
pub fn months() -> impl Iterator<Item = Month> {
    iter::successors(Some(Month::January), |month| Some(month.next())).take(12)
}

/// Summarise each of the twelve months of `year`, January first.
pub fn monthly_overview(expenses: &[Expense], year: i32) -> Vec<MonthOverview<'_>> {
    months()
        .map(|month| {
            let expenses = filter_by_month(expenses, year, month);
            let summary = summarize(expenses.iter().copied());

            MonthOverview {
                month,
                expenses,
                summary,
            }
        })
        .collect()
}

/// Sum the amounts of `expenses` per category.
///
/// Every category is in the result, with a total of zero if it has no expenses.
pub fn category_breakdown<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> BTreeMap<Category, f64> {
    let mut totals: BTreeMap<Category, f64> = Category::ALL
        .into_iter()
        .map(|category| (category, 0.0))
        .collect();

    for expense in expenses {
        *totals.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    totals
}

/// The years that [Period::new] accepts, matching the dates `time` can represent.
pub const YEARS: RangeInclusive<i32> = -9999..=9999;

/// A calendar month in a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// The calendar year, e.g. 2025.
    pub year: i32,
    /// The month of the year.
    pub month: Month,
}

impl Period {
    /// Create a period from a year and a month number from 1 (January) to 12 (December).
    ///
    /// # Errors
    /// Returns [Error::InvalidYear] if `year` is outside of -9999 to 9999, or
    /// [Error::InvalidMonth] if `month` is not in 1-12.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        if !YEARS.contains(&year) {
            return Err(Error::InvalidYear(year));
        }

        Ok(Self {
            year,
            month: month_from_number(month)?,
        })
    }

    /// The month before this one, which may be in the previous year.
    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self {
                year: self.year.saturating_sub(1),
                month: Month::December,
            },
            month => Self {
                year: self.year,
                month: month.previous(),
            },
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

/// Convert a month number from 1 (January) to 12 (December) into a [Month].
///
/// # Errors
/// Returns [Error::InvalidMonth] if `month` is not in 1-12.
pub fn month_from_number(month: u8) -> Result<Month, Error> {
    Month::try_from(month).map_err(|_| Error::InvalidMonth(month))
}

/// The summary and category totals of a single period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodReport {
    /// The month that was summarised.
    pub period: Period,
    /// The total, count and average of the expenses in the period.
    pub summary: Summary,
    /// The total per category of the expenses in the period.
    pub categories: BTreeMap<Category, f64>,
}

impl PeriodReport {
    fn new(expenses: &[Expense], period: Period) -> Self {
        let expenses = filter_by_month(expenses, period.year, period.month);

        Self {
            period,
            summary: summarize(expenses.iter().copied()),
            categories: category_breakdown(expenses.iter().copied()),
        }
    }
}

/// How the spending in one month compares to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// The period being compared.
    pub first: PeriodReport,
    /// The period `first` is compared against.
    pub second: PeriodReport,
    /// `first.summary.total - second.summary.total`.
    pub difference: f64,
    /// The change from `second` to `first` as a percentage, see [percent_change].
    pub percent_change: f64,
    /// The largest category total across both periods.
    ///
    /// Used for scaling bars in a side-by-side breakdown.
    pub max_category_total: f64,
}

/// Compare the spending in `first` against the spending in `second`.
pub fn compare_periods(expenses: &[Expense], first: Period, second: Period) -> Comparison {
    let first = PeriodReport::new(expenses, first);
    let second = PeriodReport::new(expenses, second);

    let max_category_total = first
        .categories
        .values()
        .chain(second.categories.values())
        .copied()
        .fold(0.0, f64::max);

    Comparison {
        difference: first.summary.total - second.summary.total,
        percent_change: percent_change(first.summary.total, second.summary.total),
        max_category_total,
        first,
        second,
    }
}

/// The change from `previous` to `current` as a percentage of `previous`.
///
/// When `previous` is zero the change is 100% if anything was spent in
/// `current`, and 0% if nothing was spent in either.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous != 0.0 {
        (current - previous) / previous * 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}
