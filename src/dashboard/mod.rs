//! Dashboard module
//!
//! Provides an overview page with summary cards and charts of the user's
//! accounts, budget and transactions, optionally narrowed to one month, and
//! a fragment with financial advice.

mod advice;
mod cards;
mod chart_data;
mod charts;
mod handlers;
mod tables;

pub use advice::get_advice;
pub use handlers::{DashboardQuery, DashboardState, get_dashboard_page};
