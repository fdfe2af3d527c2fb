// Domain layer: the AST model, scope model, and the rule engine itself.

pub mod ast;
pub mod diagnostic;
pub mod engine;
pub mod rules;
pub mod scope;
