//! Scope model for globalint.
//!
//! A `ScopeContext` describes the lexical position of one visited node:
//! which function-like and class enclose it, what its syntactic parent is,
//! and a handle to the host's type knowledge through the `TypeOracle` seam.
//! Contexts are built fresh by the dispatcher for every node and discarded
//! after the rule returns.

use crate::domain::ast::{AstNode, Param};

/// The reserved superglobal variable names, available from any scope
/// without explicit passing.
pub const SUPERGLOBALS: &[&str] = &[
    "_GET", "_POST", "_REQUEST", "_SESSION", "_COOKIE", "_FILES", "_ENV", "_SERVER", "GLOBALS",
];

/// Membership test against the fixed superglobal table.
pub fn is_superglobal(name: &str) -> bool {
    SUPERGLOBALS.contains(&name)
}

/// What a method call evaluates to, as far as the rules care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    Void,
    Value,
}

/// The static type of an expression, reduced to the three cases the rules
/// distinguish. `Unknown` means "cannot confirm" and makes rules abstain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticType {
    Object(String),
    Scalar,
    Unknown,
}

/// Host type knowledge the engine is parametric over.
///
/// Implementations must be thread-safe: one oracle is shared across
/// concurrently analyzed trees.
pub trait TypeOracle: Send + Sync {
    /// Resolve a class name as written in source to a fully-qualified name.
    /// Names that cannot be resolved come back unchanged (minus any leading
    /// backslash).
    fn resolve_class(&self, name: &str) -> String;

    /// Declared return kind of `class::method`, or `None` when the method
    /// (or the class) is unknown.
    fn method_return(&self, class: &str, method: &str) -> Option<ReturnKind>;
}

/// Oracle with no knowledge. Every lookup abstains; name resolution only
/// strips the leading backslash of already-qualified names.
pub struct NullOracle;

impl TypeOracle for NullOracle {
    fn resolve_class(&self, name: &str) -> String {
        name.trim_start_matches('\\').to_string()
    }

    fn method_return(&self, _class: &str, _method: &str) -> Option<ReturnKind> {
        None
    }
}

/// The function-like enclosing a visited node.
#[derive(Debug, Clone, Copy)]
pub struct FunctionInfo<'a> {
    pub name: Option<&'a str>,
    pub params: &'a [Param],
}

impl<'a> FunctionInfo<'a> {
    /// The declared parameter with the given name, if any.
    pub fn param(&self, name: &str) -> Option<&'a Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Lexical position of the node currently being visited.
pub struct ScopeContext<'a> {
    /// Innermost enclosing function-like, if any.
    pub function: Option<FunctionInfo<'a>>,
    /// Fully-qualified name of the enclosing class, if any.
    pub class_name: Option<&'a str>,
    /// Immediate syntactic parent of the visited node. Transient; the tree
    /// itself stores no back-edges.
    pub parent: Option<&'a AstNode>,
    oracle: &'a dyn TypeOracle,
}

impl<'a> ScopeContext<'a> {
    pub fn new(
        function: Option<FunctionInfo<'a>>,
        class_name: Option<&'a str>,
        parent: Option<&'a AstNode>,
        oracle: &'a dyn TypeOracle,
    ) -> Self {
        Self {
            function,
            class_name,
            parent,
            oracle,
        }
    }

    /// Root scope: outside any function-like and outside any class body.
    /// Top-level bootstrap code legitimately touches request-global state,
    /// so several rules exempt this position.
    pub fn is_root(&self) -> bool {
        self.function.is_none() && self.class_name.is_none()
    }

    pub fn resolve_class(&self, name: &str) -> String {
        self.oracle.resolve_class(name)
    }

    /// Static type of an expression. Only parameter variables with a type
    /// hint and literals classify; everything else is `Unknown`.
    pub fn type_of(&self, expr: &AstNode) -> SemanticType {
        match expr {
            AstNode::Variable { name, .. } => {
                let hint = self
                    .function
                    .as_ref()
                    .and_then(|f| f.param(name))
                    .and_then(|p| p.type_hint.as_deref());
                match hint {
                    Some(h) if is_scalar_hint(h) => SemanticType::Scalar,
                    Some(h) => SemanticType::Object(self.oracle.resolve_class(h)),
                    None => SemanticType::Unknown,
                }
            }
            AstNode::StringLit { .. } | AstNode::IntLit { .. } => SemanticType::Scalar,
            _ => SemanticType::Unknown,
        }
    }

    /// Declared return kind of `method` on a value of type `ty`.
    pub fn method_return(&self, ty: &SemanticType, method: &str) -> Option<ReturnKind> {
        match ty {
            SemanticType::Object(class) => self.oracle.method_return(class, method),
            _ => None,
        }
    }
}

fn is_scalar_hint(hint: &str) -> bool {
    matches!(
        hint.to_ascii_lowercase().as_str(),
        "int" | "float" | "string" | "bool" | "array" | "callable" | "iterable" | "mixed" | "void"
    )
}
