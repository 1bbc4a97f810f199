//! The API endpoints URIs.
//!
//! For endpoints that take parameters, e.g., '/api/expenses/{expense_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page with the yearly overview, category breakdown and list of expenses.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page comparing the spending of two months.
pub const COMPARISON_VIEW: &str = "/comparison";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to list, create and delete all expenses.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to list the expenses in a single month, the month is 1-12.
pub const EXPENSES_IN_MONTH: &str = "/api/expenses/month/{year}/{month}";
/// The route for the total, count and average of all expenses.
pub const SUMMARY_API: &str = "/api/summary";
/// The route listing the fixed set of expense categories.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route listing the years that can be selected for an overview.
pub const YEARS_API: &str = "/api/years";
/// The route for the month-by-month overview of a year.
pub const OVERVIEW_API: &str = "/api/overview/{year}";
/// The route comparing the totals of two months.
pub const COMPARISON_API: &str = "/api/comparison/{year1}/{month1}/{year2}/{month2}";

/// Replace the parameters in `endpoint_path` with `values`, in order.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters, digits or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/expenses/{expense_id}', '{expense_id}'
/// is the parameter.
///
/// Parameters without a matching value are left in place, and extra values
/// are ignored.
pub fn format_endpoint<T: ToString>(endpoint_path: &str, values: &[T]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut values = values.iter();
    let mut rest = endpoint_path;

    while let Some(param_start) = rest.find('{') {
        let Some(param_length) = rest[param_start..].find('}') else {
            break;
        };
        let param_end = param_start + param_length + 1;

        formatted.push_str(&rest[..param_start]);

        match values.next() {
            Some(value) => formatted.push_str(&value.to_string()),
            None => formatted.push_str(&rest[param_start..param_end]),
        }

        rest = &rest[param_end..];
    }

    formatted.push_str(rest);
    formatted
}
