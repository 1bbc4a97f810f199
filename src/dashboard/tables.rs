//! Table views for the dashboard.

use std::collections::BTreeMap;

use maud::{Markup, html};
use time::{format_description::well_known::Rfc3339, macros::format_description};

use crate::{
    aggregation::Summary,
    expense::{Category, Expense},
    html::{
        CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
};

const TABLE_HEADER_CELL_STYLE: &str = "px-6 py-3";
const TABLE_AMOUNT_CELL_STYLE: &str = "px-6 py-4 text-right whitespace-nowrap";

/// Renders the totals, counts and averages for every expense and for the selected year.
pub(super) fn summary_statistics_table(
    overall: Summary,
    year: i32,
    year_summary: Summary,
) -> Markup {
    let rows = [("All time".to_owned(), overall), (year.to_string(), year_summary)];

    html! {
        div id="summary-statistics" class="w-full" {
            h3 class="text-xl font-semibold mb-4" { "Summary Statistics" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Period" }
                            th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Total" }
                            th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Expenses" }
                            th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Average" }
                        }
                    }
                    tbody {
                        @for (label, summary) in rows {
                            tr class=(TABLE_ROW_STYLE) {
                                th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"} {
                                    (label)
                                }
                                td class=(TABLE_CELL_STYLE) { (format_currency(summary.total)) }
                                td class=(TABLE_CELL_STYLE) { (summary.count) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(summary.average)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the total of each category and its share of `total`.
pub(super) fn category_table(categories: &BTreeMap<Category, f64>, total: f64) -> Markup {
    html! {
        div id="category-breakdown" class="w-full" {
            h3 class="text-xl font-semibold mb-4" { "Category Breakdown" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Total" }
                            th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Share" }
                        }
                    }
                    tbody {
                        @for (category, category_total) in categories {
                            tr class=(TABLE_ROW_STYLE) {
                                th scope="row" class=(TABLE_CELL_STYLE) {
                                    span class=(CATEGORY_BADGE_STYLE) { (category) }
                                }
                                td class=(TABLE_CELL_STYLE) { (format_currency(*category_total)) }
                                td class=(TABLE_CELL_STYLE) { (format_share(*category_total, total)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn format_share(amount: f64, total: f64) -> String {
    if total > 0.0 {
        format!("{:.0}%", amount / total * 100.0)
    } else {
        "0%".to_owned()
    }
}

/// Renders every expense, in the order given.
pub(super) fn expenses_table(expenses: &[Expense]) -> Markup {
    let date_format = format_description!("[year]-[month]-[day]");

    html! {
        section id="expenses" class="w-full mt-8" {
            h3 class="text-xl font-semibold mb-4" { "Expenses" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Title" }
                            th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Category" }
                            th scope="col" class={(TABLE_HEADER_CELL_STYLE) " text-right"} { "Amount" }
                        }
                    }
                    tbody {
                        @if expenses.is_empty() {
                            tr class=(TABLE_ROW_STYLE) {
                                td colspan="4" class={(TABLE_CELL_STYLE) " text-center italic"} {
                                    "No expenses recorded yet."
                                }
                            }
                        }

                        @for expense in expenses {
                            tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id) {
                                td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} {
                                    time datetime=(expense.date.format(&Rfc3339).unwrap_or_default()) {
                                        (expense.date.format(date_format).unwrap_or_default())
                                    }
                                }
                                td class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"} {
                                    (expense.title)
                                }
                                td class=(TABLE_CELL_STYLE) {
                                    span class=(CATEGORY_BADGE_STYLE) { (expense.category) }
                                }
                                td class=(TABLE_AMOUNT_CELL_STYLE) { (format_currency(expense.amount)) }
                            }
                        }
                    }
                }
            }
        }
    }
}
