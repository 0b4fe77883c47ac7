//! Report Export Engine
//!
//! One query+assembly pipeline ([`report`]) produces an [`report::OrderReport`]
//! intermediate value; three independent pure renderers consume it. Totals and
//! status labels are computed once in the report, so cross-format consistency
//! holds structurally.

pub mod excel;
pub mod pdf;
pub mod report;
pub mod token_store;
pub mod word;

use crate::utils::AppError;
use crate::utils::time::today_stamp;
use report::OrderReport;

/// Requested document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Pdf,
    Word,
}

impl ExportFormat {
    /// Parse the `format` request value; `None` for anything unknown
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "excel" => Some(ExportFormat::Excel),
            "pdf" => Some(ExportFormat::Pdf),
            "word" => Some(ExportFormat::Word),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Word => "application/msword",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Word => "doc",
        }
    }

    /// Attachment filename stamped with the current date
    pub fn attachment_filename(&self) -> String {
        format!("commandes_{}.{}", today_stamp(), self.extension())
    }
}

/// Render the report in the requested format
pub fn render(format: ExportFormat, report: &OrderReport) -> Result<Vec<u8>, AppError> {
    match format {
        ExportFormat::Excel => excel::render(report),
        ExportFormat::Pdf => pdf::render(report),
        ExportFormat::Word => word::render(report),
    }
}
