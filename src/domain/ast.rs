// AST data structures for globalint.
// These types represent parsed PHP code in a form suitable for static analysis.
// The external parser delivers trees in the serde JSON encoding of `AstNode`
// (internally tagged with "kind").

use serde::{Deserialize, Serialize};

/// A reference to a class in source position, e.g. the `Foo` in `Foo::BAR`.
/// `Dynamic` covers computed references like `$className::BAR`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ref", content = "name", rename_all = "snake_case")]
pub enum ClassRef {
    Name(String),
    Dynamic,
}

/// The callee of a function call. `Dynamic` covers `$fn()` style calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ref", content = "name", rename_all = "snake_case")]
pub enum Callee {
    Name(String),
    Dynamic,
}

/// A member name (constant or property) that may itself be a computed
/// expression rather than a literal identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ref", content = "name", rename_all = "snake_case")]
pub enum MemberName {
    Name(String),
    Dynamic,
}

/// A declared parameter of a function-like. The optional type hint is a
/// class name or scalar keyword exactly as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(default)]
    pub type_hint: Option<String>,
}

/// A node in the abstract syntax tree.
///
/// Closed tagged union over the node kinds the rule engine recognizes.
/// Every variant exposes its source line. The tree is owned top-down;
/// parent relationships are passed transiently during traversal, never
/// stored as back-edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AstNode {
    /// A whole analyzed file. `namespace` is the file-level namespace
    /// declaration, if any.
    Program {
        #[serde(default)]
        namespace: Option<String>,
        body: Vec<AstNode>,
        line: u32,
    },
    /// A class declaration. `name` is the short (unqualified) name.
    Class {
        name: String,
        body: Vec<AstNode>,
        line: u32,
    },
    /// Any function-like: named function, method, or closure (`name: None`).
    Function {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        params: Vec<Param>,
        #[serde(default)]
        return_type: Option<String>,
        body: Vec<AstNode>,
        line: u32,
    },
    /// A compound statement (if/loop/try body and the like). The engine only
    /// needs the fact that statements nest, not which construct nests them.
    Block { body: Vec<AstNode>, line: u32 },
    /// A statement that is a bare expression, discarding its value.
    ExprStmt { expr: Box<AstNode>, line: u32 },
    Return {
        #[serde(default)]
        value: Option<Box<AstNode>>,
        line: u32,
    },
    /// A `global $a, $b;` declaration.
    GlobalDecl { names: Vec<String>, line: u32 },
    Variable { name: String, line: u32 },
    Assign {
        target: Box<AstNode>,
        value: Box<AstNode>,
        line: u32,
    },
    /// An array index fetch, `base[index]`. `index: None` covers the `[]`
    /// append form.
    IndexFetch {
        base: Box<AstNode>,
        #[serde(default)]
        index: Option<Box<AstNode>>,
        line: u32,
    },
    MethodCall {
        receiver: Box<AstNode>,
        method: String,
        #[serde(default)]
        args: Vec<AstNode>,
        line: u32,
    },
    FunctionCall {
        callee: Callee,
        #[serde(default)]
        args: Vec<AstNode>,
        line: u32,
    },
    /// A global constant fetch, e.g. `MAX_RETRIES`.
    ConstFetch { name: String, line: u32 },
    /// A class constant fetch, e.g. `Config::TIMEOUT`.
    ClassConstFetch {
        class: ClassRef,
        constant: MemberName,
        line: u32,
    },
    /// A static property fetch, e.g. `Registry::$instances`.
    StaticPropFetch {
        class: ClassRef,
        property: MemberName,
        line: u32,
    },
    StringLit { value: String, line: u32 },
    IntLit { value: i64, line: u32 },
}

/// Discriminant of `AstNode`, used as the rule registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Class,
    Function,
    Block,
    ExprStmt,
    Return,
    GlobalDecl,
    Variable,
    Assign,
    IndexFetch,
    MethodCall,
    FunctionCall,
    ConstFetch,
    ClassConstFetch,
    StaticPropFetch,
    StringLit,
    IntLit,
}

impl AstNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            AstNode::Program { .. } => NodeKind::Program,
            AstNode::Class { .. } => NodeKind::Class,
            AstNode::Function { .. } => NodeKind::Function,
            AstNode::Block { .. } => NodeKind::Block,
            AstNode::ExprStmt { .. } => NodeKind::ExprStmt,
            AstNode::Return { .. } => NodeKind::Return,
            AstNode::GlobalDecl { .. } => NodeKind::GlobalDecl,
            AstNode::Variable { .. } => NodeKind::Variable,
            AstNode::Assign { .. } => NodeKind::Assign,
            AstNode::IndexFetch { .. } => NodeKind::IndexFetch,
            AstNode::MethodCall { .. } => NodeKind::MethodCall,
            AstNode::FunctionCall { .. } => NodeKind::FunctionCall,
            AstNode::ConstFetch { .. } => NodeKind::ConstFetch,
            AstNode::ClassConstFetch { .. } => NodeKind::ClassConstFetch,
            AstNode::StaticPropFetch { .. } => NodeKind::StaticPropFetch,
            AstNode::StringLit { .. } => NodeKind::StringLit,
            AstNode::IntLit { .. } => NodeKind::IntLit,
        }
    }

    /// Source line of this node.
    pub fn line(&self) -> u32 {
        match self {
            AstNode::Program { line, .. }
            | AstNode::Class { line, .. }
            | AstNode::Function { line, .. }
            | AstNode::Block { line, .. }
            | AstNode::ExprStmt { line, .. }
            | AstNode::Return { line, .. }
            | AstNode::GlobalDecl { line, .. }
            | AstNode::Variable { line, .. }
            | AstNode::Assign { line, .. }
            | AstNode::IndexFetch { line, .. }
            | AstNode::MethodCall { line, .. }
            | AstNode::FunctionCall { line, .. }
            | AstNode::ConstFetch { line, .. }
            | AstNode::ClassConstFetch { line, .. }
            | AstNode::StaticPropFetch { line, .. }
            | AstNode::StringLit { line, .. }
            | AstNode::IntLit { line, .. } => *line,
        }
    }

    /// Immediate children in declaration order.
    pub fn children(&self) -> Vec<&AstNode> {
        match self {
            AstNode::Program { body, .. }
            | AstNode::Class { body, .. }
            | AstNode::Function { body, .. }
            | AstNode::Block { body, .. } => body.iter().collect(),
            AstNode::ExprStmt { expr, .. } => vec![expr],
            AstNode::Return { value, .. } => value.iter().map(|v| v.as_ref()).collect(),
            AstNode::Assign { target, value, .. } => vec![target, value],
            AstNode::IndexFetch { base, index, .. } => {
                let mut out: Vec<&AstNode> = vec![base];
                if let Some(ix) = index {
                    out.push(ix);
                }
                out
            }
            AstNode::MethodCall { receiver, args, .. } => {
                let mut out: Vec<&AstNode> = vec![receiver];
                out.extend(args.iter());
                out
            }
            AstNode::FunctionCall { args, .. } => args.iter().collect(),
            AstNode::GlobalDecl { .. }
            | AstNode::Variable { .. }
            | AstNode::ConstFetch { .. }
            | AstNode::ClassConstFetch { .. }
            | AstNode::StaticPropFetch { .. }
            | AstNode::StringLit { .. }
            | AstNode::IntLit { .. } => Vec::new(),
        }
    }
}

/// Pre-order walk over a subtree, invoking `visit` on every node.
pub fn walk<'a>(node: &'a AstNode, visit: &mut impl FnMut(&'a AstNode)) {
    visit(node);
    for child in node.children() {
        walk(child, visit);
    }
}
