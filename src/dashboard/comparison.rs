//! A page comparing the spending in two months side by side.

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    aggregation::{Comparison, Period, PeriodReport, compare_periods, months},
    dashboard::handlers::{DashboardState, bad_request_response},
    endpoints,
    expense::Category,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE, PAGE_CONTAINER_STYLE, base,
        error_banner, format_currency, format_percent_change,
    },
    navigation::NavBar,
    timezone::now_in_timezone,
};

/// The query parameters for the comparison page.
///
/// Months are numbers from 1 (January) to 12 (December). Missing values
/// default to the current month for the first period and the month before
/// the first period for the second.
#[derive(Debug, Default, Deserialize)]
pub struct ComparisonQuery {
    /// The year of the first period.
    pub year1: Option<i32>,
    /// The month of the first period, 1-12.
    pub month1: Option<u8>,
    /// The year of the second period.
    pub year2: Option<i32>,
    /// The month of the second period, 1-12.
    pub month2: Option<u8>,
}

impl ComparisonQuery {
    fn into_periods(self, current: Period) -> Result<(Period, Period), Error> {
        let first = Period::new(
            self.year1.unwrap_or(current.year),
            self.month1.unwrap_or(current.month as u8),
        )?;
        let previous = first.previous();
        let second = Period::new(
            self.year2.unwrap_or(previous.year),
            self.month2.unwrap_or(previous.month as u8),
        )?;

        Ok((first, second))
    }
}

/// Display a page comparing the spending in two months.
pub async fn get_comparison_page(
    State(state): State<DashboardState>,
    query: Result<Query<ComparisonQuery>, QueryRejection>,
) -> Result<Response, Error> {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return Ok(bad_request_response(&Error::from(rejection))),
    };

    let now = now_in_timezone(&state.local_timezone)?;
    let current = Period {
        year: now.year(),
        month: now.month(),
    };

    let (first, second) = match query.into_periods(current) {
        Ok(periods) => periods,
        Err(error) => return Ok(bad_request_response(&error)),
    };

    let (expenses, load_failed) = match state.load_expenses() {
        Ok(expenses) => (expenses, false),
        Err(error) => {
            tracing::error!("could not load expenses for the comparison: {error}");
            (Vec::new(), true)
        }
    };

    let comparison = compare_periods(&expenses, first, second);

    Ok(comparison_view(&comparison, load_failed).into_response())
}

fn comparison_view(comparison: &Comparison, load_failed: bool) -> Markup {
    let nav_bar = NavBar::new(endpoints::COMPARISON_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div id="comparison-content" class=(PAGE_CONTAINER_STYLE)
        {
            @if load_failed {
                (error_banner(
                    "Could not load your expenses.",
                    "The figures below may be incomplete. Try refreshing the page.",
                ))
            }

            h2 class="text-2xl font-bold mb-4"
            {
                (comparison.first.period) " vs. " (comparison.second.period)
            }

            (period_picker(comparison.first.period, comparison.second.period))

            section id="comparison-totals" class="grid grid-cols-1 md:grid-cols-4 gap-4 w-full mb-8"
            {
                (total_card("first-total", &comparison.first))
                (total_card("second-total", &comparison.second))
                (stat_card("difference", "Difference", &format_difference(comparison.difference)))
                (stat_card("percent-change", "Change", &format_percent_change(comparison.percent_change)))
            }

            (category_bars(comparison))
        }
    );

    base("Compare Months", &[], &content)
}

fn period_picker(first: Period, second: Period) -> Markup {
    html!(
        form
            id="period-picker"
            method="get"
            action=(endpoints::COMPARISON_VIEW)
            class="flex flex-wrap items-end gap-4 w-full mb-8"
        {
            (period_fields("1", "First month", first))
            (period_fields("2", "Second month", second))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Compare" }
        }
    )
}

fn period_fields(suffix: &str, legend: &str, period: Period) -> Markup {
    let month_name = format!("month{suffix}");
    let year_name = format!("year{suffix}");

    html!(
        fieldset class="flex gap-2"
        {
            legend class=(FORM_LABEL_STYLE) { (legend) }

            select name=(month_name) aria-label={ (legend) " month" } class=(FORM_SELECT_STYLE)
            {
                @for month in months() {
                    option value=(month as u8) selected[month == period.month] { (month) }
                }
            }

            input
                type="number"
                name=(year_name)
                value=(period.year)
                aria-label={ (legend) " year" }
                class=(FORM_SELECT_STYLE);
        }
    )
}

fn total_card(id: &str, report: &PeriodReport) -> Markup {
    let detail = match report.summary.count {
        0 => "No expenses".to_owned(),
        1 => "1 expense".to_owned(),
        count => format!("{count} expenses"),
    };

    html!(
        div id=(id) class="bg-white dark:bg-gray-800 rounded-lg p-4 shadow-md"
        {
            h3 class="text-sm text-gray-600 dark:text-gray-400" { (report.period) }
            p class="total text-2xl font-bold" { (format_currency(report.summary.total)) }
            p class="text-sm text-gray-600 dark:text-gray-400" { (detail) }
        }
    )
}

fn stat_card(id: &str, label: &str, value: &str) -> Markup {
    html!(
        div id=(id) class="bg-white dark:bg-gray-800 rounded-lg p-4 shadow-md"
        {
            h3 class="text-sm text-gray-600 dark:text-gray-400" { (label) }
            p class="total text-2xl font-bold" { (value) }
        }
    )
}

fn format_difference(difference: f64) -> String {
    let formatted = format_currency(difference);

    if difference > 0.0 && formatted != "$0.00" {
        format!("+{formatted}")
    } else if formatted == "-$0.00" {
        "$0.00".to_owned()
    } else {
        formatted
    }
}

/// The width of a bar as a percentage of the widest possible bar.
fn bar_width(total: f64, max_total: f64) -> f64 {
    if max_total > 0.0 {
        total / max_total * 100.0
    } else {
        0.0
    }
}

fn category_bars(comparison: &Comparison) -> Markup {
    let category_total = |report: &PeriodReport, category: &Category| {
        report.categories.get(category).copied().unwrap_or(0.0)
    };

    html!(
        section id="category-comparison" class="w-full"
        {
            h3 class="text-xl font-semibold mb-4" { "Category Breakdown" }

            div class="flex gap-4 mb-4 text-sm"
            {
                span class="flex items-center gap-1"
                {
                    span class="inline-block w-3 h-3 rounded bg-blue-600" {}
                    (comparison.first.period)
                }
                span class="flex items-center gap-1"
                {
                    span class="inline-block w-3 h-3 rounded bg-gray-400" {}
                    (comparison.second.period)
                }
            }

            @for category in Category::ALL {
                @let first = category_total(&comparison.first, &category);
                @let second = category_total(&comparison.second, &category);

                div class="category-row grid grid-cols-[8rem_1fr] gap-2 mb-3" data-category=(category)
                {
                    span class="font-medium" { (category) }

                    div class="flex flex-col gap-1"
                    {
                        (bar("first-bar bg-blue-600", first, comparison.max_category_total))
                        (bar("second-bar bg-gray-400", second, comparison.max_category_total))
                    }
                }
            }
        }
    )
}

fn bar(class: &str, total: f64, max_total: f64) -> Markup {
    let width = bar_width(total, max_total);

    html!(
        div class="flex items-center gap-2"
        {
            div class="w-full h-4 bg-gray-100 dark:bg-gray-800 rounded"
            {
                div
                    class={ (class) " h-4 rounded" }
                    style=(format!("width: {width:.1}%"))
                {}
            }
            span class="w-24 text-right text-sm whitespace-nowrap" { (format_currency(total)) }
        }
    )
}
