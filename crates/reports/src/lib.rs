//! `polaris-reports`: report aggregation, export rendering and dashboard metrics.
//!
//! A report request is validated up front ([`ReportRequest::parse`]), rows are
//! pulled from the store by the [`ReportAggregator`] into a [`Table`], and the
//! table is rendered by [`export::render`] into an in-memory artifact.

pub mod aggregate;
pub mod dashboard;
pub mod export;
pub mod request;
pub mod table;

pub use aggregate::{FinancialRow, ReportAggregator};
pub use dashboard::{Dashboard, DashboardService, MonthlySales, QuotationCounts};
pub use export::{ExportArtifact, ExportError};
pub use request::{ExportFormat, ReportQuery, ReportRequest, ReportType};
pub use table::{Cell, Report, Table, format_minor};
