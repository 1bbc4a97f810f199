//! The expense store: the expense model, its database queries and the JSON
//! endpoints for creating, listing, updating and deleting expenses.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    Category, Expense, ExpenseForm, ExpenseUpdate, NewExpense, create_expense,
    create_expense_table, delete_all_expenses, delete_expense, get_all_expenses, get_expense,
    map_row_to_expense, update_expense,
};
pub(crate) use create_endpoint::create_expense_endpoint;
pub(crate) use delete_endpoint::{delete_all_expenses_endpoint, delete_expense_endpoint};
pub(crate) use edit_endpoint::edit_expense_endpoint;
pub(crate) use list_endpoint::{
    get_expense_endpoint, get_expenses_endpoint, get_expenses_in_month_endpoint,
};
