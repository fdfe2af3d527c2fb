//! AST input. The external PHP parser writes one `*.ast.json` file per
//! source file; this module reads them back into `AstNode` trees.
//!
//! A file that fails to deserialize violates the parser contract and is a
//! fatal integration fault, not a user-code finding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::ast::AstNode;

/// Load one serialized AST file.
pub fn load_tree(path: &Path) -> Result<AstNode> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read AST file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("malformed AST in {}: parser contract violated", path.display()))
}

/// Recursively collect `*.ast.json` files under a directory, in sorted
/// order for deterministic output.
pub fn collect_ast_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    visit_dir(dir, &mut files);
    files.sort();
    files
}

fn visit_dir(dir: &Path, files: &mut Vec<PathBuf>) {
    if dir.ends_with("target") || dir.ends_with(".git") {
        return;
    }
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                visit_dir(&path, files);
            } else if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".ast.json"))
            {
                files.push(path);
            }
        }
    }
}
