//! Constant-fetch rules: global constants and class constants are both
//! hidden compile-time dependencies when consumed inside a function.

use crate::domain::ast::{AstNode, ClassRef, MemberName, NodeKind};
use crate::domain::diagnostic::Diagnostic;
use crate::domain::engine::Rule;
use crate::domain::scope::ScopeContext;

/// Built-in literal pseudo-constants, never a dependency.
const PSEUDO_CONSTANTS: &[&str] = &["true", "false", "null"];

/// Own-class references, part of the class's implementation rather than a
/// dependency on an external class.
const OWN_CLASS_REFS: &[&str] = &["self", "parent", "static"];

/// Flags fetches of user-defined global constants inside functions.
pub struct GlobalConstantRule;

impl Rule for GlobalConstantRule {
    fn node_kind(&self) -> NodeKind {
        NodeKind::ConstFetch
    }

    fn check(&self, node: &AstNode, scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
        // Constants fetched at top level are fine.
        if scope.function.is_none() {
            return vec![];
        }
        let AstNode::ConstFetch { name, line } = node else {
            return vec![];
        };
        let lower = name.to_ascii_lowercase();
        if PSEUDO_CONSTANTS.contains(&lower.as_str()) {
            return vec![];
        }

        vec![Diagnostic::new(
            format!(
                "Code is accessing global constant \"{name}\". \
                 Pass it as an argument instead to make the dependency explicit."
            ),
            "constant.global",
            *line,
        )]
    }
}

/// Flags fetches of constants on external classes inside functions.
pub struct ClassConstantRule;

impl Rule for ClassConstantRule {
    fn node_kind(&self) -> NodeKind {
        NodeKind::ClassConstFetch
    }

    fn check(&self, node: &AstNode, scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
        if scope.function.is_none() {
            return vec![];
        }
        let AstNode::ClassConstFetch {
            class,
            constant,
            line,
        } = node
        else {
            return vec![];
        };

        // `Foo::class` yields the class name, not a constant value.
        let MemberName::Name(constant_name) = constant else {
            return vec![];
        };
        if constant_name.eq_ignore_ascii_case("class") {
            return vec![];
        }

        // Computed class references are out of scope for this rule.
        let ClassRef::Name(class_name) = class else {
            return vec![];
        };
        if OWN_CLASS_REFS.contains(&class_name.to_ascii_lowercase().as_str()) {
            return vec![];
        }

        let resolved = scope.resolve_class(class_name);
        if scope.class_name == Some(resolved.as_str()) {
            return vec![];
        }

        vec![Diagnostic::new(
            format!(
                "Code is accessing constant {resolved}::{constant_name}. \
                 This creates a hidden dependency; pass the value as an argument instead."
            ),
            "constant.class",
            *line,
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast::testing::*;
    use crate::domain::engine::RuleEngine;
    use crate::domain::scope::{NullOracle, ReturnKind, TypeOracle};

    fn global_engine() -> RuleEngine {
        RuleEngine::with_rules(vec![Box::new(GlobalConstantRule)])
    }

    fn class_engine() -> RuleEngine {
        RuleEngine::with_rules(vec![Box::new(ClassConstantRule)])
    }

    #[test]
    fn test_global_constant_inside_function_flags() {
        let tree = program(vec![func(
            "retry",
            vec![],
            vec![expr_stmt(const_fetch("MAX_RETRIES", 3), 3)],
            2,
        )]);
        let diags = global_engine().analyze(&tree, &NullOracle);

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].identifier, "constant.global");
        assert!(diags[0].message.contains("\"MAX_RETRIES\""));
        assert_eq!(diags[0].line, 3);
    }

    #[test]
    fn test_global_constant_at_root_scope_is_exempt() {
        let tree = program(vec![expr_stmt(const_fetch("MAX_RETRIES", 2), 2)]);
        assert!(global_engine().analyze(&tree, &NullOracle).is_empty());
    }

    #[test]
    fn test_pseudo_constants_exempt_case_insensitively() {
        for name in ["true", "FALSE", "Null"] {
            let tree = program(vec![func(
                "f",
                vec![],
                vec![expr_stmt(const_fetch(name, 3), 3)],
                2,
            )]);
            assert!(
                global_engine().analyze(&tree, &NullOracle).is_empty(),
                "{name} should not flag"
            );
        }
    }

    /// Resolves short names against a single known namespace, standing in
    /// for the project index.
    struct NsOracle;

    impl TypeOracle for NsOracle {
        fn resolve_class(&self, name: &str) -> String {
            let trimmed = name.trim_start_matches('\\');
            if trimmed.contains('\\') {
                trimmed.to_string()
            } else {
                format!("App\\{trimmed}")
            }
        }

        fn method_return(&self, _class: &str, _method: &str) -> Option<ReturnKind> {
            None
        }
    }

    #[test]
    fn test_external_class_constant_flags_with_resolved_name() {
        let tree = program_ns(
            "App",
            vec![func(
                "f",
                vec![],
                vec![expr_stmt(class_const("Config", "TIMEOUT", 3), 3)],
                2,
            )],
        );
        let diags = class_engine().analyze(&tree, &NsOracle);

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].identifier, "constant.class");
        assert!(diags[0].message.contains("App\\Config::TIMEOUT"));
    }

    #[test]
    fn test_own_class_fetch_is_exempt() {
        // Inside App\Config, Config::TIMEOUT resolves to the enclosing class.
        let tree = program_ns(
            "App",
            vec![class(
                "Config",
                vec![func(
                    "timeout",
                    vec![],
                    vec![expr_stmt(class_const("Config", "TIMEOUT", 4), 4)],
                    3,
                )],
                2,
            )],
        );
        assert!(class_engine().analyze(&tree, &NsOracle).is_empty());
    }

    #[test]
    fn test_self_parent_static_are_exempt() {
        for target in ["self", "PARENT", "Static"] {
            let tree = program(vec![class(
                "Child",
                vec![func(
                    "f",
                    vec![],
                    vec![expr_stmt(class_const(target, "LIMIT", 4), 4)],
                    3,
                )],
                2,
            )]);
            assert!(
                class_engine().analyze(&tree, &NullOracle).is_empty(),
                "{target}::LIMIT should not flag"
            );
        }
    }

    #[test]
    fn test_class_name_pseudo_accessor_is_exempt() {
        let tree = program(vec![func(
            "f",
            vec![],
            vec![expr_stmt(class_const("Config", "class", 3), 3)],
            2,
        )]);
        assert!(class_engine().analyze(&tree, &NullOracle).is_empty());
    }

    #[test]
    fn test_dynamic_class_reference_is_ignored() {
        let fetch = AstNode::ClassConstFetch {
            class: ClassRef::Dynamic,
            constant: MemberName::Name("TIMEOUT".to_string()),
            line: 3,
        };
        let tree = program(vec![func("f", vec![], vec![expr_stmt(fetch, 3)], 2)]);
        assert!(class_engine().analyze(&tree, &NullOracle).is_empty());
    }

    #[test]
    fn test_root_scope_class_constant_is_exempt() {
        let tree = program(vec![expr_stmt(class_const("Config", "TIMEOUT", 2), 2)]);
        assert!(class_engine().analyze(&tree, &NsOracle).is_empty());
    }
}
