//! The analyze use case: run the rule engine over a batch of trees with a
//! shared oracle and hand the rendered report back to the harness.

use rayon::prelude::*;

use crate::domain::engine::RuleEngine;
use crate::domain::scope::TypeOracle;
use crate::ports::{FileReport, ReportExporter};
use crate::domain::ast::AstNode;

pub struct AnalysisOutcome {
    pub rendered: String,
    pub diagnostic_count: usize,
}

pub struct AnalyzeUsecase<'a> {
    pub engine: &'a RuleEngine,
    pub oracle: &'a dyn TypeOracle,
    pub exporter: &'a dyn ReportExporter,
}

impl AnalyzeUsecase<'_> {
    /// Analyze every tree, in input order, each independently. Trees share
    /// no mutable state, so files are processed in parallel.
    pub fn run(&self, sources: &[(String, AstNode)]) -> anyhow::Result<AnalysisOutcome> {
        let engine = self.engine;
        let oracle = self.oracle;
        let reports: Vec<FileReport> = sources
            .par_iter()
            .map(|(file, tree)| FileReport {
                file: file.clone(),
                diagnostics: engine.analyze(tree, oracle),
            })
            .collect();

        let diagnostic_count = reports.iter().map(|r| r.diagnostics.len()).sum();
        let rendered = self.exporter.render(&reports)?;
        Ok(AnalysisOutcome {
            rendered,
            diagnostic_count,
        })
    }
}
