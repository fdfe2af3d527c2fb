//! Rule protocol and AST dispatcher.
//!
//! The engine walks a tree pre-order and, for every node, invokes every
//! rule registered for that node's kind with a freshly built `ScopeContext`.
//! Diagnostics accumulate in traversal order, then registration order within
//! a node. Rules that cannot classify a node return an empty list; nothing a
//! rule does can abort the walk.

use std::collections::HashMap;

use crate::domain::ast::{AstNode, NodeKind};
use crate::domain::diagnostic::Diagnostic;
use crate::domain::scope::{FunctionInfo, ScopeContext, TypeOracle};

/// The contract every detector implements: the node kind it wants to
/// receive, and a pure processing function from (node, scope) to
/// diagnostics.
pub trait Rule: Send + Sync {
    fn node_kind(&self) -> NodeKind;
    fn check(&self, node: &AstNode, scope: &ScopeContext<'_>) -> Vec<Diagnostic>;
}

/// Registry of rules plus the traversal that feeds them.
///
/// Stateless between `analyze` calls apart from the rules' fixed constant
/// tables, so one engine can serve concurrent analyses of independent trees.
#[derive(Default)]
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
    by_kind: HashMap<NodeKind, Vec<usize>>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        let mut engine = Self::new();
        for rule in rules {
            engine.register(rule);
        }
        engine
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        let kind = rule.node_kind();
        let slot = self.rules.len();
        self.rules.push(rule);
        self.by_kind.entry(kind).or_default().push(slot);
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyze one tree, returning all diagnostics in deterministic order:
    /// pre-order over nodes, registration order within a node.
    pub fn analyze(&self, root: &AstNode, oracle: &dyn TypeOracle) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        let namespace = match root {
            AstNode::Program { namespace, .. } => namespace.as_deref(),
            _ => None,
        };
        self.visit(root, None, namespace, None, None, oracle, &mut out);
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn visit(
        &self,
        node: &AstNode,
        parent: Option<&AstNode>,
        namespace: Option<&str>,
        function: Option<FunctionInfo<'_>>,
        class_name: Option<&str>,
        oracle: &dyn TypeOracle,
        out: &mut Vec<Diagnostic>,
    ) {
        if let Some(slots) = self.by_kind.get(&node.kind()) {
            let scope = ScopeContext::new(function, class_name, parent, oracle);
            for &slot in slots {
                out.extend(self.rules[slot].check(node, &scope));
            }
        }

        match node {
            // A class body opens a new scope: members are outside any
            // enclosing function until a method's own body begins.
            AstNode::Class { name, body, .. } => {
                let fqn = qualify(namespace, name);
                for child in body {
                    self.visit(child, Some(node), namespace, None, Some(&fqn), oracle, out);
                }
            }
            AstNode::Function {
                name,
                params,
                body,
                ..
            } => {
                let info = FunctionInfo {
                    name: name.as_deref(),
                    params,
                };
                for child in body {
                    self.visit(
                        child,
                        Some(node),
                        namespace,
                        Some(info),
                        class_name,
                        oracle,
                        out,
                    );
                }
            }
            _ => {
                for child in node.children() {
                    self.visit(
                        child,
                        Some(node),
                        namespace,
                        function,
                        class_name,
                        oracle,
                        out,
                    );
                }
            }
        }
    }
}

fn qualify(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) => format!("{ns}\\{name}"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast::testing::*;
    use crate::domain::scope::NullOracle;

    /// Records the scope it saw for every variable node.
    struct ScopeProbe;

    impl Rule for ScopeProbe {
        fn node_kind(&self) -> NodeKind {
            NodeKind::Variable
        }

        fn check(&self, node: &AstNode, scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
            let AstNode::Variable { name, line } = node else {
                return vec![];
            };
            let place = match (&scope.function, scope.class_name) {
                (Some(f), Some(c)) => format!("{}::{}", c, f.name.unwrap_or("{closure}")),
                (Some(f), None) => f.name.unwrap_or("{closure}").to_string(),
                (None, Some(c)) => format!("{c}(body)"),
                (None, None) => "root".to_string(),
            };
            vec![Diagnostic::new(format!("{name} in {place}"), "probe", *line)]
        }
    }

    #[test]
    fn test_scope_threading_through_classes_and_functions() {
        let tree = program_ns(
            "App",
            vec![
                expr_stmt(var("top", 2), 2),
                class(
                    "Service",
                    vec![func(
                        "run",
                        vec![],
                        vec![expr_stmt(var("inner", 6), 6)],
                        5,
                    )],
                    4,
                ),
            ],
        );

        let engine = RuleEngine::with_rules(vec![Box::new(ScopeProbe)]);
        let diags = engine.analyze(&tree, &NullOracle);
        let messages: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["top in root", "inner in App\\Service::run"]
        );
    }

    #[test]
    fn test_dispatch_preserves_registration_order_per_node() {
        struct Tagged(&'static str);
        impl Rule for Tagged {
            fn node_kind(&self) -> NodeKind {
                NodeKind::Variable
            }
            fn check(&self, node: &AstNode, _scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
                vec![Diagnostic::new("m", self.0, node.line())]
            }
        }

        let tree = program(vec![expr_stmt(var("a", 2), 2), expr_stmt(var("b", 3), 3)]);
        let engine =
            RuleEngine::with_rules(vec![Box::new(Tagged("first")), Box::new(Tagged("second"))]);
        let diags = engine.analyze(&tree, &NullOracle);
        let order: Vec<(&str, u32)> = diags.iter().map(|d| (d.identifier, d.line)).collect();
        assert_eq!(
            order,
            vec![("first", 2), ("second", 2), ("first", 3), ("second", 3)]
        );
    }

    #[test]
    fn test_parent_is_passed_transiently() {
        struct ParentProbe;
        impl Rule for ParentProbe {
            fn node_kind(&self) -> NodeKind {
                NodeKind::MethodCall
            }
            fn check(&self, node: &AstNode, scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
                let is_stmt = matches!(scope.parent, Some(AstNode::ExprStmt { .. }));
                vec![Diagnostic::new(
                    format!("stmt={is_stmt}"),
                    "parent.probe",
                    node.line(),
                )]
            }
        }

        let discarded = expr_stmt(method_call(var("x", 2), "save", 2), 2);
        let returned = AstNode::Return {
            value: Some(Box::new(method_call(var("x", 3), "save", 3))),
            line: 3,
        };
        let tree = program(vec![func("f", vec![], vec![discarded, returned], 1)]);

        let engine = RuleEngine::with_rules(vec![Box::new(ParentProbe)]);
        let diags = engine.analyze(&tree, &NullOracle);
        let messages: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["stmt=true", "stmt=false"]);
    }
}
