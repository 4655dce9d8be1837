//! AST parsing and traversal for Java compilation units
pub mod error;
pub mod model;
pub mod parser;
pub mod visitor;

// Re-export main types for convenience
pub use error::AstError;
pub use model::{CallableKind, LineSpan, LogicalOpKind, LoopKind, NodeKind, SourceModel, SourceNode};
pub use parser::JavaParser;
pub use visitor::ComplexityVisitor;
