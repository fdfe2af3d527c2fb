// Infrastructure implementations for globalint: AST input from disk and
// the project-wide type oracle.

pub mod loader;
pub mod oracle;

pub use loader::{collect_ast_files, load_tree};
pub use oracle::ProjectOracle;
