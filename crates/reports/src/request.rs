//! Report request parsing.

use serde::Deserialize;

use polaris_core::{DateRange, DomainError, DomainResult};

/// Report category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Customer,
    Inventory,
    Supplier,
    Sales,
    Financial,
}

impl ReportType {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "inventory" => Ok(Self::Inventory),
            "supplier" => Ok(Self::Supplier),
            "sales" => Ok(Self::Sales),
            "financial" => Ok(Self::Financial),
            _ => Err(DomainError::invalid_argument("invalid report type")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Inventory => "inventory",
            Self::Supplier => "supplier",
            Self::Sales => "sales",
            Self::Financial => "financial",
        }
    }

    /// Download name without extension.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Customer => "customer_report",
            Self::Inventory => "inventory_report",
            Self::Supplier => "supplier_report",
            Self::Sales => "sales_invoice_report",
            Self::Financial => "financial_report",
        }
    }

    pub fn title(&self) -> String {
        format!("{} REPORT", self.as_str().to_ascii_uppercase())
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Customer => &["Customer Name", "Organization", "Address", "TIN", "Created At"],
            Self::Inventory => &[
                "SKU",
                "Model Number",
                "Aircon Name",
                "HP",
                "Type",
                "Indoor/Outdoor",
                "Quantity",
                "Price",
                "Created At",
            ],
            Self::Supplier => &["Supplier Code", "Supplier Name", "Organization", "TIN", "Location", "Created At"],
            Self::Sales => &["Invoice No", "Project", "Customer", "Total Amount", "Created At"],
            Self::Financial => &["Category", "Document No", "Project", "Counterpart", "Amount", "Date"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "excel" => Ok(Self::Excel),
            "pdf" => Ok(Self::Pdf),
            _ => Err(DomainError::invalid_argument("unsupported export type")),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pdf => "application/pdf",
        }
    }
}

/// Report request as sent by the caller, with camelCase keys.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub report_type: String,
    pub start_date: String,
    pub end_date: String,
    pub export_type: String,
}

/// A validated report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub range: DateRange,
    pub format: ExportFormat,
}

impl ReportRequest {
    /// Export type first, so an unsupported format fails before anything else.
    pub fn parse(query: &ReportQuery) -> DomainResult<Self> {
        let format = ExportFormat::parse(&query.export_type)?;
        let report_type = ReportType::parse(&query.report_type)?;
        let range = DateRange::parse(&query.start_date, &query.end_date)?;
        Ok(Self { report_type, range, format })
    }
}
