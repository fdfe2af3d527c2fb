//! Report exporters: a line-oriented text format for terminals and CI
//! logs, and a JSON format for downstream tooling.

use crate::ports::{FileReport, ReportExporter};

pub struct TextExporter;

impl ReportExporter for TextExporter {
    fn render(&self, reports: &[FileReport]) -> anyhow::Result<String> {
        let mut out = String::new();
        let mut total = 0usize;
        for report in reports {
            for diag in &report.diagnostics {
                out.push_str(&format!(
                    "{}:{}: {} [{}]\n",
                    report.file, diag.line, diag.message, diag.identifier
                ));
                total += 1;
            }
        }
        if total == 0 {
            out.push_str("No hidden global-state dependencies found.\n");
        } else {
            out.push_str(&format!(
                "Found {total} hidden global-state dependenc{}.\n",
                if total == 1 { "y" } else { "ies" }
            ));
        }
        Ok(out)
    }
}

pub struct JsonExporter;

impl ReportExporter for JsonExporter {
    fn render(&self, reports: &[FileReport]) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(reports)?)
    }
}
