//! Monthly reporting
//!
//! [`window`] validates the month, [`aggregate`] projects orders into daily
//! revenue and product totals, [`workbook`] renders the `.xlsx` export and
//! [`service`] ties them to storage.

pub mod aggregate;
pub mod format;
pub mod service;
pub mod window;
pub mod workbook;

pub use aggregate::{DailyRevenue, MonthlySummary, ProductTotal, aggregate};
pub use service::{ReportFile, ReportService};
pub use window::{MonthQuery, MonthWindow};
