// Diagnostic values produced by rules and consumed by the reporting harness.

use serde::Serialize;

/// One finding: a human-readable message, a stable dotted identifier for
/// downstream tooling/suppression, and the source line it points at.
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub identifier: &'static str,
    pub line: u32,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, identifier: &'static str, line: u32) -> Self {
        Self {
            message: message.into(),
            identifier,
            line,
        }
    }
}
