//! Dashboard HTTP handlers and view rendering.
//!
//! The dashboard shows the summary statistics of every expense, an overview of
//! each month in the selected year, the category breakdown of that year, and
//! the table of all expenses.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    aggregation::{available_years, category_breakdown, monthly_overview, summarize},
    dashboard::{
        cards::monthly_cards_view,
        charts::{DashboardChart, category_chart, charts_script, charts_view, monthly_chart},
        tables::{category_table, expenses_table, summary_statistics_table},
    },
    endpoints,
    expense::{Expense, get_all_expenses},
    html::{
        BUTTON_PRIMARY_STYLE, ECHARTS_SCRIPT, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, base, error_banner, error_view,
    },
    navigation::NavBar,
    timezone::now_in_timezone,
};

/// The state needed for displaying the dashboard pages.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl DashboardState {
    pub(super) fn load_expenses(&self) -> Result<Vec<Expense>, Error> {
        let connection = self
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_expenses(&connection)
    }
}

/// The query parameters for the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The year to show the monthly overview and category breakdown for.
    ///
    /// Defaults to the current year.
    pub year: Option<i32>,
}

/// Display a page with an overview of the user's expenses.
///
/// If the expenses cannot be read, the page is still rendered as if there
/// were no expenses, with a banner telling the user what went wrong.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Response, Error> {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return Ok(bad_request_response(&Error::from(rejection))),
    };

    let current_year = now_in_timezone(&state.local_timezone)?.year();
    let year = query.year.unwrap_or(current_year);

    let (expenses, load_failed) = match state.load_expenses() {
        Ok(expenses) => (expenses, false),
        Err(error) => {
            tracing::error!("could not load expenses for the dashboard: {error}");
            (Vec::new(), true)
        }
    };

    Ok(dashboard_view(&expenses, year, current_year, load_failed).into_response())
}

/// Renders a 400 page describing why the request could not be handled.
pub(super) fn bad_request_response(error: &Error) -> Response {
    (
        StatusCode::BAD_REQUEST,
        error_view(
            "Bad Request",
            "400",
            &error.to_string(),
            "Check the address and try again.",
        ),
    )
        .into_response()
}

fn dashboard_view(
    expenses: &[Expense],
    year: i32,
    current_year: i32,
    load_failed: bool,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let overview = monthly_overview(expenses, year);
    let year_expenses: Vec<&Expense> = overview
        .iter()
        .flat_map(|month| month.expenses.iter().copied())
        .collect();
    let year_summary = summarize(year_expenses.iter().copied());
    let categories = category_breakdown(year_expenses.iter().copied());

    let mut years = available_years(expenses, current_year);
    if !years.contains(&year) {
        years.push(year);
        years.sort_unstable_by(|a, b| b.cmp(a));
    }

    let charts = [
        DashboardChart {
            id: "category-chart",
            options: category_chart(&categories, year).to_string(),
        },
        DashboardChart {
            id: "monthly-chart",
            options: monthly_chart(&overview, year).to_string(),
        },
    ];

    let content = html!(
        (nav_bar)

        div id="dashboard-content" class=(PAGE_CONTAINER_STYLE)
        {
            @if load_failed {
                (error_banner(
                    "Could not load your expenses.",
                    "The figures below may be incomplete. Try refreshing the page.",
                ))
            }

            div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full mb-8"
            {
                (summary_statistics_table(summarize(expenses), year, year_summary))
                (year_selector(&years, year))
            }

            (monthly_cards_view(&overview, year))
            (charts_view(&charts))
            (category_table(&categories, year_summary.total))
            (expenses_table(expenses))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}

fn year_selector(years: &[i32], selected_year: i32) -> Markup {
    html!(
        form
            id="year-selector"
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="flex items-end gap-2"
        {
            div class="grow"
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                select
                    id="year"
                    name="year"
                    onchange="this.form.submit()"
                    class=(FORM_SELECT_STYLE)
                {
                    @for year in years {
                        option value=(year) selected[*year == selected_year] { (year) }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Show" }
        }
    )
}
