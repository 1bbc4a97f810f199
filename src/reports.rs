//! JSON endpoints that summarise the stored expenses.
//!
//! Each handler reads the full set of expenses once and hands it to the
//! functions in [crate::aggregation].

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    aggregation::{
        Comparison, MonthOverview, Period, PeriodReport, Summary, available_years,
        category_breakdown, compare_periods, monthly_overview, summarize,
    },
    expense::{Category, Expense, get_all_expenses},
    timezone::now_in_timezone,
};

/// The state needed to summarise expenses.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Decides what the current year is.
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl ReportState {
    fn load_expenses(&self) -> Result<Vec<Expense>, Error> {
        let connection = self
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_expenses(&connection)
    }
}

/// The summary of a single month in a [YearOverviewResponse].
#[derive(Debug, Serialize)]
pub struct MonthSummaryResponse {
    /// The month number, 1 (January) to 12 (December).
    pub month: u8,
    /// The full name of the month, e.g. "March".
    pub name: String,
    /// The summary of the expenses in the month.
    #[serde(flatten)]
    pub summary: Summary,
    /// Whether any expenses were recorded in the month.
    pub has_data: bool,
}

impl From<&MonthOverview<'_>> for MonthSummaryResponse {
    fn from(overview: &MonthOverview) -> Self {
        Self {
            month: u8::from(overview.month),
            name: overview.month.to_string(),
            summary: overview.summary.rounded(),
            has_data: overview.has_data(),
        }
    }
}

/// The month-by-month overview of a year.
#[derive(Debug, Serialize)]
pub struct YearOverviewResponse {
    /// The calendar year.
    pub year: i32,
    /// The summary of every expense in the year.
    pub summary: Summary,
    /// The twelve months of the year, January first.
    pub months: Vec<MonthSummaryResponse>,
    /// The total per category for the year.
    pub categories: BTreeMap<Category, f64>,
}

/// A period in a [ComparisonResponse].
#[derive(Debug, Serialize)]
pub struct PeriodResponse {
    /// The calendar year.
    pub year: i32,
    /// The month number, 1 (January) to 12 (December).
    pub month: u8,
    /// The period as text, e.g. "March 2025".
    pub label: String,
    /// The summary of the expenses in the period.
    pub summary: Summary,
    /// The total per category for the period.
    pub categories: BTreeMap<Category, f64>,
}

impl From<PeriodReport> for PeriodResponse {
    fn from(report: PeriodReport) -> Self {
        Self {
            year: report.period.year,
            month: u8::from(report.period.month),
            label: report.period.to_string(),
            summary: report.summary.rounded(),
            categories: report.categories,
        }
    }
}

/// How the spending in one month compares to another.
#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    /// The period being compared.
    pub first: PeriodResponse,
    /// The period `first` is compared against.
    pub second: PeriodResponse,
    /// The total of `first` minus the total of `second`.
    pub difference: f64,
    /// The change from `second` to `first` as a percentage.
    pub percent_change: f64,
    /// The largest category total across both periods.
    pub max_category_total: f64,
}

impl From<Comparison> for ComparisonResponse {
    fn from(comparison: Comparison) -> Self {
        Self {
            first: comparison.first.into(),
            second: comparison.second.into(),
            difference: comparison.difference,
            percent_change: comparison.percent_change,
            max_category_total: comparison.max_category_total,
        }
    }
}

/// A route handler for the total, count and average of every expense.
///
/// The total and average are rounded to cents.
pub async fn get_summary_endpoint(
    State(state): State<ReportState>,
) -> Result<Json<Summary>, Error> {
    let expenses = state.load_expenses()?;

    Ok(Json(summarize(&expenses).rounded()))
}

/// A route handler listing the names of the expense categories.
pub async fn get_categories_endpoint() -> Json<[Category; 7]> {
    Json(Category::ALL)
}

/// A route handler listing the years that can be selected for an overview, most recent first.
pub async fn get_years_endpoint(State(state): State<ReportState>) -> Result<Json<Vec<i32>>, Error> {
    let current_year = now_in_timezone(&state.local_timezone)?.year();
    let expenses = state.load_expenses()?;

    Ok(Json(available_years(&expenses, current_year)))
}

/// A route handler for the month-by-month overview of a year.
pub async fn get_overview_endpoint(
    State(state): State<ReportState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<YearOverviewResponse>, Error> {
    let Path(year) = path?;
    let expenses = state.load_expenses()?;
    let overview = monthly_overview(&expenses, year);
    let expenses_in_year = overview
        .iter()
        .flat_map(|month| month.expenses.iter().copied());

    Ok(Json(YearOverviewResponse {
        year,
        summary: summarize(expenses_in_year.clone()).rounded(),
        categories: category_breakdown(expenses_in_year),
        months: overview.iter().map(MonthSummaryResponse::from).collect(),
    }))
}

/// A route handler comparing the spending in two months.
///
/// The path holds the year and month (1-12) of the first period followed by
/// the year and month of the period it is compared against.
pub async fn get_comparison_endpoint(
    State(state): State<ReportState>,
    path: Result<Path<(i32, u8, i32, u8)>, PathRejection>,
) -> Result<Json<ComparisonResponse>, Error> {
    let Path((year1, month1, year2, month2)) = path?;
    let first = Period::new(year1, month1)?;
    let second = Period::new(year2, month2)?;
    let expenses = state.load_expenses()?;

    Ok(Json(compare_periods(&expenses, first, second).into()))
}
