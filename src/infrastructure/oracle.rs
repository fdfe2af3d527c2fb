//! Project-wide type oracle built from the input trees themselves.
//!
//! Stands in for a host type-checker's reflection: it indexes every class
//! declaration across all analyzed files, recording method return kinds
//! and a short-name lookup for namespace resolution. Built once per run,
//! read concurrently by all analyses.

use std::collections::HashMap;

use dashmap::DashMap;
use rayon::prelude::*;

use crate::domain::ast::{self, AstNode};
use crate::domain::scope::{ReturnKind, TypeOracle};

#[derive(Default)]
pub struct ProjectOracle {
    /// FQN -> method name -> declared return kind.
    classes: DashMap<String, HashMap<String, ReturnKind>>,
    /// Short name -> FQN. First declaration wins; ambiguous short names
    /// stay mapped to their first occurrence and rules stay conservative.
    short_names: DashMap<String, String>,
}

impl ProjectOracle {
    /// Index all class declarations in the given trees, in parallel.
    pub fn build(trees: &[AstNode]) -> Self {
        let oracle = Self::default();
        trees.par_iter().for_each(|tree| oracle.index_tree(tree));
        oracle
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn index_tree(&self, tree: &AstNode) {
        let namespace = match tree {
            AstNode::Program { namespace, .. } => namespace.as_deref(),
            _ => None,
        };
        ast::walk(tree, &mut |node| {
            if let AstNode::Class { name, body, .. } = node {
                self.index_class(namespace, name, body);
            }
        });
    }

    fn index_class(&self, namespace: Option<&str>, name: &str, body: &[AstNode]) {
        let fqn = match namespace {
            Some(ns) => format!("{ns}\\{name}"),
            None => name.to_string(),
        };

        let mut methods = HashMap::new();
        for member in body {
            if let AstNode::Function {
                name: Some(method_name),
                return_type,
                ..
            } = member
            {
                let kind = match return_type.as_deref() {
                    Some(hint) if hint.eq_ignore_ascii_case("void") => ReturnKind::Void,
                    _ => ReturnKind::Value,
                };
                methods.insert(method_name.clone(), kind);
            }
        }

        self.short_names
            .entry(name.to_string())
            .or_insert_with(|| fqn.clone());
        self.classes.insert(fqn, methods);
    }
}

impl TypeOracle for ProjectOracle {
    fn resolve_class(&self, name: &str) -> String {
        let trimmed = name.trim_start_matches('\\');
        if trimmed.contains('\\') {
            return trimmed.to_string();
        }
        match self.short_names.get(trimmed) {
            Some(fqn) => fqn.clone(),
            None => trimmed.to_string(),
        }
    }

    fn method_return(&self, class: &str, method: &str) -> Option<ReturnKind> {
        self.classes
            .get(class)
            .and_then(|methods| methods.get(method).copied())
    }
}
