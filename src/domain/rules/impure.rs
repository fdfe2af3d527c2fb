//! Calls to impure built-in functions inside a function body depend on
//! external state (clock, environment, filesystem, process) without that
//! dependency appearing in the parameter list.

use crate::domain::ast::{AstNode, Callee, NodeKind};
use crate::domain::diagnostic::Diagnostic;
use crate::domain::engine::Rule;
use crate::domain::scope::ScopeContext;

/// Built-in functions whose result depends on state outside the program's
/// data flow. Lowercase; lookups are case-insensitive.
pub const IMPURE_FUNCTIONS: &[&str] = &[
    // Time
    "time",
    "microtime",
    "date",
    "gmdate",
    "getdate",
    // Randomness
    "rand",
    "mt_rand",
    "random_int",
    "random_bytes",
    // Environment / process introspection
    "getenv",
    "apache_getenv",
    "getallheaders",
    "php_uname",
    "sys_getloadavg",
    "uniqid",
    // Filesystem / network I/O
    "file_get_contents",
    "file_put_contents",
    "fopen",
    "fread",
    "fwrite",
    "readfile",
    "move_uploaded_file",
    // Output / session / header mutation
    "header",
    "setcookie",
    "session_start",
    "session_id",
    // Process execution
    "exec",
    "shell_exec",
    "passthru",
    "system",
    "proc_open",
];

/// Flags calls to the fixed impure-function table inside function bodies.
pub struct ImpureFunctionRule;

impl Rule for ImpureFunctionRule {
    fn node_kind(&self) -> NodeKind {
        NodeKind::FunctionCall
    }

    fn check(&self, node: &AstNode, scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
        if scope.function.is_none() {
            return vec![];
        }
        let AstNode::FunctionCall { callee, line, .. } = node else {
            return vec![];
        };
        // Dynamic call targets like `$fn()` are a separate problem, not
        // this rule's.
        let Callee::Name(name) = callee else {
            return vec![];
        };
        if !IMPURE_FUNCTIONS.contains(&name.to_ascii_lowercase().as_str()) {
            return vec![];
        }

        vec![Diagnostic::new(
            format!(
                "Code is calling the impure function \"{name}()\". This creates a \
                 hidden dependency on external state; pass the result as an argument instead."
            ),
            "function.impure",
            *line,
        )]
    }
}
