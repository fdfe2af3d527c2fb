//! Static properties are mutable global state behind a class name.

use crate::domain::ast::{AstNode, ClassRef, MemberName, NodeKind};
use crate::domain::diagnostic::Diagnostic;
use crate::domain::engine::Rule;
use crate::domain::scope::ScopeContext;

/// Flags static property fetches anywhere except pure top-level script
/// code. Even class-body-level access counts: the property is still global
/// state.
pub struct StaticPropertyRule;

impl Rule for StaticPropertyRule {
    fn node_kind(&self) -> NodeKind {
        NodeKind::StaticPropFetch
    }

    fn check(&self, node: &AstNode, scope: &ScopeContext<'_>) -> Vec<Diagnostic> {
        if scope.is_root() {
            return vec![];
        }
        let AstNode::StaticPropFetch {
            class,
            property,
            line,
        } = node
        else {
            return vec![];
        };
        let ClassRef::Name(class_name) = class else {
            return vec![];
        };
        let property_name = match property {
            MemberName::Name(name) => name.as_str(),
            MemberName::Dynamic => "{expression}",
        };

        vec![Diagnostic::new(
            format!(
                "Code is accessing static property {class_name}::${property_name}. \
                 Static properties are global state; pass the value as an argument instead."
            ),
            "property.static",
            *line,
        )]
    }
}
