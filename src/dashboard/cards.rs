//! Cards giving an overview of each month in the selected year.

use maud::{Markup, html};

use crate::{
    aggregation::{MonthOverview, Period},
    endpoints,
    html::format_currency,
};

/// Renders a card for each of the twelve months, January first.
pub(super) fn monthly_cards_view(overview: &[MonthOverview], year: i32) -> Markup {
    html! {
        section id="monthly-overview" class="w-full mx-auto mt-8 mb-8" {
            div class="flex justify-between items-baseline mb-4" {
                h3 class="text-xl font-semibold" { "Monthly Overview" }
                span class="text-sm text-gray-600 dark:text-gray-400" { (year) }
            }

            div class="grid grid-cols-1 sm:grid-cols-2 md:grid-cols-3 lg:grid-cols-4 gap-4" {
                @for month in overview {
                    (month_card(month, year))
                }
            }
        }
    }
}

fn month_card(month: &MonthOverview, year: i32) -> Markup {
    let comparison_url = format!(
        "{}?year1={year}&month1={}",
        endpoints::COMPARISON_VIEW,
        month.month as u8
    );

    if !month.has_data() {
        return html! {
            div
                class="month-card bg-gray-100 dark:bg-gray-800/50 border border-dashed
                    border-gray-300 dark:border-gray-700 rounded-lg p-4
                    text-gray-500 dark:text-gray-400"
                data-empty="true"
            {
                h4 class="font-semibold" { (month.month) }
                p class="mt-4 text-sm italic" { "No expenses" }
            }
        };
    }

    let period = Period {
        year,
        month: month.month,
    };
    let count_label = if month.summary.count == 1 {
        "1 expense".to_owned()
    } else {
        format!("{} expenses", month.summary.count)
    };

    html! {
        a
            href=(comparison_url)
            class="month-card block bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md hover:shadow-lg
                transition-shadow"
            aria-label=(format!("{period}: {} across {count_label}", format_currency(month.summary.total)))
        {
            h4 class="font-semibold" { (month.month) }
            p class="mt-2 text-2xl font-bold" { (format_currency(month.summary.total)) }
            p class="text-sm text-gray-600 dark:text-gray-400" { (count_label) }
            p class="text-sm text-gray-600 dark:text-gray-400" {
                "Average " (format_currency(month.summary.average))
            }
        }
    }
}
