//! Rendering of an aggregated [`Report`] into a downloadable artifact.

mod csv;
mod excel;
pub mod pdf;

use thiserror::Error;

use polaris_core::DomainError;

use crate::request::ExportFormat;
use crate::table::Report;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("xlsx: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("pdf: {0}")]
    Pdf(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExportError> for DomainError {
    fn from(e: ExportError) -> Self {
        DomainError::internal(e.to_string())
    }
}

/// File bytes plus the headers a download needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

impl ExportArtifact {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.filename)
    }
}

pub fn render(report: &Report, format: ExportFormat) -> Result<ExportArtifact, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => csv::render(&report.table)?,
        ExportFormat::Excel => excel::render(&report.table)?,
        ExportFormat::Pdf => pdf::render(report)?,
    };
    tracing::debug!(
        report_type = report.report_type.as_str(),
        format = format.extension(),
        bytes = bytes.len(),
        "report rendered"
    );
    Ok(ExportArtifact {
        bytes,
        content_type: format.content_type(),
        filename: format!("{}.{}", report.report_type.file_stem(), format.extension()),
    })
}

#[cfg(test)]
mod tests {
    use polaris_core::DateRange;

    use super::*;
    use crate::request::ReportType;
    use crate::table::{Cell, Table};

    pub(super) fn sample(kind: ReportType, rows: usize) -> Report {
        let mut table = Table::new(kind.columns());
        for n in 0..rows {
            let row = kind
                .columns()
                .iter()
                .enumerate()
                .map(|(i, _)| if i == 0 { Cell::Text(format!("row {n}")) } else { Cell::Money(12_345) })
                .collect();
            table.push(row);
        }
        Report {
            report_type: kind,
            range: DateRange::parse("2024-06-01", "2024-06-30").unwrap(),
            table,
        }
    }

    #[test]
    fn csv_artifact_headers() {
        let artifact = render(&sample(ReportType::Sales, 2), ExportFormat::Csv).unwrap();
        assert_eq!(artifact.filename, "sales_invoice_report.csv");
        assert_eq!(artifact.content_type, "text/csv");
        assert_eq!(artifact.content_disposition(), "attachment; filename=sales_invoice_report.csv");
        let text = String::from_utf8(artifact.bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Invoice No,Project,Customer,Total Amount,Created At"));
        assert_eq!(lines.next(), Some("row 0,123.45,123.45,123.45,123.45"));
    }

    #[test]
    fn excel_artifact_is_a_zip_container() {
        let artifact = render(&sample(ReportType::Inventory, 3), ExportFormat::Excel).unwrap();
        assert_eq!(artifact.filename, "inventory_report.xlsx");
        assert_eq!(&artifact.bytes[..2], b"PK");
    }

    #[test]
    fn pdf_artifact_has_pdf_magic() {
        let artifact = render(&sample(ReportType::Financial, 120), ExportFormat::Pdf).unwrap();
        assert_eq!(artifact.filename, "financial_report.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn render_failures_are_internal() {
        let e: DomainError = ExportError::Pdf("font".into()).into();
        assert_eq!(e.code(), "internal");
    }
}
