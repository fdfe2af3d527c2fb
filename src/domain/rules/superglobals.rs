//! Superglobal access and modification rules.
//!
//! Detection is implemented once per direction (read/write) and
//! parameterized by a root-scope exemption flag, covering all four rule
//! variants: access/modify in always/nested-only flavors.

use crate::domain::ast::{AstNode, NodeKind};
use crate::domain::diagnostic::Diagnostic;
use crate::domain::engine::Rule;
use crate::domain::scope::{is_superglobal, ScopeContext};

/// Flags bare references to superglobal variables.
pub struct SuperglobalReadRule {
    /// When set, references at root scope (top-level bootstrap code) are
    /// exempt.
    pub nested_only: bool,
}

impl Rule for SuperglobalReadRule {
    fn node_kind(&self) -> NodeKind {
        NodeKind::Variable
    }

    fn check(&self, node: &AstNode, scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
        if self.nested_only && scope.is_root() {
            return vec![];
        }
        let AstNode::Variable { name, line } = node else {
            return vec![];
        };
        if !is_superglobal(name) {
            return vec![];
        }

        let diag = if self.nested_only {
            Diagnostic::new(
                format!(
                    "Code is accessing superglobal variable ${name} in a nested scope. \
                     Pass the value as an argument instead."
                ),
                "access.superglobal.nested",
                *line,
            )
        } else {
            Diagnostic::new(
                format!(
                    "Code is accessing superglobal variable ${name}. \
                     Pass the value as an argument instead."
                ),
                "access.superglobal",
                *line,
            )
        };
        vec![diag]
    }
}

/// Flags assignments whose target is a superglobal, including writes
/// through arbitrarily deep index chains like `$_SESSION['a']['b'] = $v`.
pub struct SuperglobalWriteRule {
    pub nested_only: bool,
}

impl Rule for SuperglobalWriteRule {
    fn node_kind(&self) -> NodeKind {
        NodeKind::Assign
    }

    fn check(&self, node: &AstNode, scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
        if self.nested_only && scope.is_root() {
            return vec![];
        }
        let AstNode::Assign { target, line, .. } = node else {
            return vec![];
        };

        // Unwrap nested index fetches down to the base identifier; the base
        // being a superglobal is what matters, not the depth of indexing.
        let mut base: &AstNode = target;
        while let AstNode::IndexFetch { base: inner, .. } = base {
            base = inner;
        }
        let AstNode::Variable { name, .. } = base else {
            return vec![];
        };
        if !is_superglobal(name) {
            return vec![];
        }

        let diag = if self.nested_only {
            Diagnostic::new(
                format!(
                    "Code is modifying superglobal variable ${name} in a nested scope. \
                     Use a wrapper service instead."
                ),
                "modify.superglobal.nested",
                *line,
            )
        } else {
            Diagnostic::new(
                format!(
                    "Code is modifying superglobal variable ${name}. \
                     Use a wrapper service instead."
                ),
                "modify.superglobal",
                *line,
            )
        };
        vec![diag]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast::testing::*;
    use crate::domain::engine::RuleEngine;
    use crate::domain::scope::{NullOracle, SUPERGLOBALS};

    fn read_engine(nested_only: bool) -> RuleEngine {
        RuleEngine::with_rules(vec![Box::new(SuperglobalReadRule { nested_only })])
    }

    fn write_engine(nested_only: bool) -> RuleEngine {
        RuleEngine::with_rules(vec![Box::new(SuperglobalWriteRule { nested_only })])
    }

    #[test]
    fn test_every_superglobal_flags_once_inside_a_function() {
        for name in SUPERGLOBALS {
            let tree = program(vec![func(
                "handler",
                vec![],
                vec![expr_stmt(var(name, 3), 3)],
                2,
            )]);
            let diags = read_engine(true).analyze(&tree, &NullOracle);
            assert_eq!(diags.len(), 1, "expected one diagnostic for ${name}");
            assert_eq!(diags[0].identifier, "access.superglobal.nested");
            assert_eq!(diags[0].line, 3);
        }
    }

    #[test]
    fn test_read_inside_class_method_flags() {
        let tree = program(vec![class(
            "Controller",
            vec![func("index", vec![], vec![expr_stmt(var("_POST", 5), 5)], 4)],
            3,
        )]);
        let diags = read_engine(true).analyze(&tree, &NullOracle);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("$_POST"));
    }

    #[test]
    fn test_root_scope_read_exempt_only_for_nested_variant() {
        let tree = program(vec![expr_stmt(var("_GET", 2), 2)]);

        assert!(read_engine(true).analyze(&tree, &NullOracle).is_empty());

        let always = read_engine(false).analyze(&tree, &NullOracle);
        assert_eq!(always.len(), 1);
        assert_eq!(always[0].identifier, "access.superglobal");
    }

    #[test]
    fn test_ordinary_variables_never_flag() {
        let tree = program(vec![func(
            "handler",
            vec![],
            vec![expr_stmt(var("request", 3), 3)],
            2,
        )]);
        assert!(read_engine(false).analyze(&tree, &NullOracle).is_empty());
    }

    #[test]
    fn test_write_unwraps_nested_index_chain() {
        // $_SESSION['user']['id'] = 1;
        let lhs = index(
            index(var("_SESSION", 4), Some(string("user", 4)), 4),
            Some(string("id", 4)),
            4,
        );
        let tree = program(vec![func(
            "login",
            vec![],
            vec![expr_stmt(assign(lhs, int(1, 4), 4), 4)],
            3,
        )]);

        let diags = write_engine(true).analyze(&tree, &NullOracle);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].identifier, "modify.superglobal.nested");
        assert!(diags[0].message.contains("$_SESSION"));
        assert_eq!(diags[0].line, 4);
    }

    #[test]
    fn test_write_at_root_scope() {
        // $_SERVER['X'] = 'y'; at top level.
        let lhs = index(var("_SERVER", 2), Some(string("X", 2)), 2);
        let tree = program(vec![expr_stmt(assign(lhs, string("y", 2), 2), 2)]);

        assert!(write_engine(true).analyze(&tree, &NullOracle).is_empty());

        let always = write_engine(false).analyze(&tree, &NullOracle);
        assert_eq!(always.len(), 1);
        assert_eq!(always[0].identifier, "modify.superglobal");
    }

    #[test]
    fn test_write_to_local_array_is_ignored() {
        let lhs = index(var("data", 3), Some(string("k", 3)), 3);
        let tree = program(vec![func(
            "f",
            vec![],
            vec![expr_stmt(assign(lhs, int(1, 3), 3), 3)],
            2,
        )]);
        assert!(write_engine(false).analyze(&tree, &NullOracle).is_empty());
    }
}
