//! Dashboard module
//!
//! Server rendered pages giving an overview of the user's expenses and a
//! side-by-side comparison of two months.

mod cards;
mod charts;
mod comparison;
mod handlers;
mod tables;

pub use comparison::get_comparison_page;
pub use handlers::get_dashboard_page;
