//! Rules around the `global` keyword and the `$GLOBALS` aggregate.

use std::collections::HashSet;

use crate::domain::ast::{self, AstNode, NodeKind};
use crate::domain::diagnostic::Diagnostic;
use crate::domain::engine::Rule;
use crate::domain::scope::ScopeContext;

/// Flags every `global $x;` declaration. By language construction these only
/// occur inside a function, so no scope exemption applies.
pub struct GlobalDeclarationRule;

impl Rule for GlobalDeclarationRule {
    fn node_kind(&self) -> NodeKind {
        NodeKind::GlobalDecl
    }

    fn check(&self, node: &AstNode, _scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
        let AstNode::GlobalDecl { names, line } = node else {
            return vec![];
        };
        names
            .iter()
            .map(|name| {
                Diagnostic::new(
                    format!(
                        "Code is accessing global variable ${name}. \
                         Use dependency injection instead."
                    ),
                    "access.global",
                    *line,
                )
            })
            .collect()
    }
}

/// Flags writes into the global table, `$GLOBALS['key'] = ...`, at any
/// depth of scope.
pub struct GlobalsTableWriteRule;

impl Rule for GlobalsTableWriteRule {
    fn node_kind(&self) -> NodeKind {
        NodeKind::Assign
    }

    fn check(&self, node: &AstNode, _scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
        let AstNode::Assign { target, line, .. } = node else {
            return vec![];
        };
        let AstNode::IndexFetch { base, index, .. } = target.as_ref() else {
            return vec![];
        };
        let AstNode::Variable { name, .. } = base.as_ref() else {
            return vec![];
        };
        if name != "GLOBALS" {
            return vec![];
        }

        let key = match index.as_deref() {
            Some(AstNode::StringLit { value, .. }) => value.as_str(),
            _ => "unknown",
        };
        vec![Diagnostic::new(
            format!(
                "Code is modifying global variable through $GLOBALS['{key}']. \
                 Use dependency injection instead."
            ),
            "modify.global",
            *line,
        )]
    }
}

/// Flags reassignments of variables that were declared with the `global`
/// keyword anywhere in the same function body.
///
/// Two passes over the body: a declaration may lexically follow code that
/// reads the name, so the collected set must be complete before scanning
/// for writes.
pub struct GloballyDeclaredWriteRule;

impl Rule for GloballyDeclaredWriteRule {
    fn node_kind(&self) -> NodeKind {
        NodeKind::Function
    }

    fn check(&self, node: &AstNode, _scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
        let AstNode::Function { body, .. } = node else {
            return vec![];
        };

        let declared = collect_global_declarations(body);
        if declared.is_empty() {
            return vec![];
        }
        find_assignments_to_globals(body, &declared)
    }
}

/// Pass 1: every name declared via `global` within the body, nested blocks
/// included.
fn collect_global_declarations(body: &[AstNode]) -> HashSet<String> {
    let mut declared = HashSet::new();
    for stmt in body {
        ast::walk(stmt, &mut |node| {
            if let AstNode::GlobalDecl { names, .. } = node {
                declared.extend(names.iter().cloned());
            }
        });
    }
    declared
}

/// Pass 2: assignments whose target is a bare variable in the collected set.
fn find_assignments_to_globals(body: &[AstNode], declared: &HashSet<String>) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for stmt in body {
        ast::walk(stmt, &mut |node| {
            let AstNode::Assign { target, line, .. } = node else {
                return;
            };
            let AstNode::Variable { name, .. } = target.as_ref() else {
                return;
            };
            if declared.contains(name) {
                diags.push(Diagnostic::new(
                    format!(
                        "Code is modifying variable ${name} that was declared with \
                         the \"global\" keyword. Use dependency injection instead."
                    ),
                    "modify.global",
                    *line,
                ));
            }
        });
    }
    diags
}
