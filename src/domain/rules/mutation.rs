//! Fire-and-forget mutator detection.
//!
//! A method call on an object-typed parameter whose return value is
//! discarded is a strong signal that the callee mutates its receiver
//! instead of returning new state. Three heuristics apply in strict
//! priority order, one diagnostic per qualifying call.

use crate::domain::ast::{AstNode, NodeKind};
use crate::domain::diagnostic::Diagnostic;
use crate::domain::engine::Rule;
use crate::domain::scope::{ReturnKind, ScopeContext, SemanticType};

/// Method-name prefixes that suggest mutation. Matched case-sensitively.
pub const MUTATOR_PREFIXES: &[&str] = &[
    "set", "add", "update", "remove", "delete", "modify", "change", "push", "pop", "clear", "reset",
];

/// Flags discarded method calls on object-typed parameters of the
/// enclosing function.
pub struct ImmutableUpdateRule;

impl Rule for ImmutableUpdateRule {
    fn node_kind(&self) -> NodeKind {
        NodeKind::MethodCall
    }

    fn check(&self, node: &AstNode, scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
        let Some(function) = scope.function else {
            return vec![];
        };

        // Only calls whose result is ignored: the immediate syntactic parent
        // must be a bare expression statement.
        if !matches!(scope.parent, Some(AstNode::ExprStmt { .. })) {
            return vec![];
        }

        let AstNode::MethodCall {
            receiver,
            method,
            line,
            ..
        } = node
        else {
            return vec![];
        };
        let AstNode::Variable { name: receiver_name, .. } = receiver.as_ref() else {
            return vec![];
        };
        if function.param(receiver_name).is_none() {
            return vec![];
        }

        let receiver_type = scope.type_of(receiver);
        if !matches!(receiver_type, SemanticType::Object(_)) {
            return vec![];
        }

        // Heuristic 1: a void return type is conclusive evidence of a
        // mutator, regardless of the method name.
        if scope.method_return(&receiver_type, method) == Some(ReturnKind::Void) {
            return vec![Diagnostic::new(
                format!(
                    "Method \"{method}()\" on parameter ${receiver_name} has a void return \
                     type, indicating it mutates state. Functions should return a new state \
                     instead of modifying arguments."
                ),
                "object.mutation.void",
                *line,
            )];
        }

        // Heuristic 2: the method name suggests mutation.
        if MUTATOR_PREFIXES.iter().any(|p| method.starts_with(p)) {
            return vec![Diagnostic::new(
                format!(
                    "Method \"{method}()\" on parameter ${receiver_name} appears to be a \
                     mutator. Functions should return a new state instead of modifying \
                     arguments."
                ),
                "object.mutation.name",
                *line,
            )];
        }

        // Default: any ignored return value from a call on a parameter is a
        // suspected side effect.
        vec![Diagnostic::new(
            format!(
                "The return value of \"{method}()\" on parameter ${receiver_name} was \
                 ignored. This suggests a side-effect (mutation). To ensure predictable \
                 data flow, return a new object with the updated state."
            ),
            "object.mutation.ignored-return",
            *line,
        )]
    }
}
