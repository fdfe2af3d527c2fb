//! The detection rules.
//!
//! Each rule is an independent value holding only its fixed constant
//! tables, composed through the engine's registry. Two ready-made sets are
//! provided: the default set registers the nested-only superglobal
//! variants (top-level bootstrap code is exempt), the strict set swaps in
//! the always-variants.

pub mod constants;
pub mod globals;
pub mod impure;
pub mod mutation;
pub mod statics;
pub mod superglobals;

pub use constants::{ClassConstantRule, GlobalConstantRule};
pub use globals::{GlobalDeclarationRule, GlobalsTableWriteRule, GloballyDeclaredWriteRule};
pub use impure::{ImpureFunctionRule, IMPURE_FUNCTIONS};
pub use mutation::{ImmutableUpdateRule, MUTATOR_PREFIXES};
pub use statics::StaticPropertyRule;
pub use superglobals::{SuperglobalReadRule, SuperglobalWriteRule};

use crate::domain::engine::Rule;

fn base_set(nested_only: bool) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(GlobalDeclarationRule),
        Box::new(SuperglobalReadRule { nested_only }),
        Box::new(SuperglobalWriteRule { nested_only }),
        Box::new(GlobalsTableWriteRule),
        Box::new(GloballyDeclaredWriteRule),
        Box::new(GlobalConstantRule),
        Box::new(ClassConstantRule),
        Box::new(StaticPropertyRule),
        Box::new(ImpureFunctionRule),
        Box::new(ImmutableUpdateRule),
    ]
}

/// All rules, with root-scope-exempt superglobal variants.
pub fn default_set() -> Vec<Box<dyn Rule>> {
    base_set(true)
}

/// All rules, flagging superglobal use even at root scope.
pub fn strict_set() -> Vec<Box<dyn Rule>> {
    base_set(false)
}
