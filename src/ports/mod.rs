use serde::Serialize;

use crate::domain::diagnostic::Diagnostic;

pub mod report;

/// Diagnostics for one analyzed file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Renders a batch of per-file reports for the harness to print or write.
pub trait ReportExporter {
    fn render(&self, reports: &[FileReport]) -> anyhow::Result<String>;
}
