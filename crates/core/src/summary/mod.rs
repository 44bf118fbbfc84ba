//! Summary module - dashboard totals, chart series and spending tips.

mod summary_model;
mod summary_service;

pub use summary_model::{DashboardSummary, MonthlySeries, Totals};
pub use summary_service::{monthly_series, spending_tips, summarize, totals};
