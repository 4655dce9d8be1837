//! Java parsing via tree-sitter, reduced to the typed [`SourceModel`]
//!
//! The parser is the only place that touches the concrete grammar; everything
//! downstream works on the reduced model. Parse failure is a value-level
//! outcome ([`AstError`]) so callers can degrade instead of aborting.

use once_cell::sync::Lazy;
use tree_sitter::{Language, Node, Parser};

use crate::analysis::ast::error::AstError;
use crate::analysis::ast::model::{
    CallableKind, LineSpan, LogicalOpKind, LoopKind, NodeKind, SourceModel, SourceNode,
};

/// Upper bound on accepted input, matching the style checker's guard
pub const MAX_SOURCE_BYTES: usize = 10_000_000;

// Language construction is not free; build it once and share it between
// parser instances. Parsers themselves are cheap and not thread-safe, so each
// parse call creates its own.
static JAVA: Lazy<Language> = Lazy::new(|| tree_sitter_java::LANGUAGE.into());

/// Parser collaborator for Java compilation units
pub struct JavaParser;

impl JavaParser {
    /// Parse source text into a [`SourceModel`].
    ///
    /// An empty unit parses successfully into an empty model. Inputs over
    /// [`MAX_SOURCE_BYTES`] and units with syntax errors are rejected.
    pub fn parse(source: &str) -> Result<SourceModel, AstError> {
        if source.len() > MAX_SOURCE_BYTES {
            return Err(AstError::SourceTooLarge(source.len()));
        }

        let mut parser = Parser::new();
        parser
            .set_language(&JAVA)
            .map_err(|_| AstError::ParseFailed)?;

        let tree = parser.parse(source, None).ok_or(AstError::ParseFailed)?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(AstError::SyntaxError);
        }

        let mut comments = Vec::new();
        let nodes = reduce_children(root, source, &mut comments);
        Ok(SourceModel { nodes, comments })
    }
}

/// Map a grammar node to a retained kind; `None` means transparent
fn classify(node: Node<'_>, source: &str) -> Option<NodeKind> {
    match node.kind() {
        "method_declaration" => Some(NodeKind::Callable(CallableKind::Method)),
        "constructor_declaration" => Some(NodeKind::Callable(CallableKind::Constructor)),
        "lambda_expression" => Some(NodeKind::Callable(CallableKind::Lambda)),
        "class_declaration" | "interface_declaration" => Some(NodeKind::TypeDeclaration),
        "if_statement" => Some(NodeKind::Conditional),
        "for_statement" => Some(NodeKind::Loop(LoopKind::For)),
        "enhanced_for_statement" => Some(NodeKind::Loop(LoopKind::ForEach)),
        "while_statement" => Some(NodeKind::Loop(LoopKind::While)),
        "do_statement" => Some(NodeKind::Loop(LoopKind::DoWhile)),
        "switch_label" => Some(NodeKind::SwitchLabel {
            default: is_default_label(node, source),
        }),
        "catch_clause" => Some(NodeKind::CatchClause),
        "ternary_expression" => Some(NodeKind::Ternary),
        "binary_expression" => logical_operator(node).map(NodeKind::LogicalOp),
        _ => None,
    }
}

fn is_default_label(node: Node<'_>, source: &str) -> bool {
    node.utf8_text(source.as_bytes())
        .map(|text| text.trim_start().starts_with("default"))
        .unwrap_or(false)
}

fn logical_operator(node: Node<'_>) -> Option<LogicalOpKind> {
    let operator = node.child_by_field_name("operator")?;
    match operator.kind() {
        "&&" => Some(LogicalOpKind::And),
        "||" => Some(LogicalOpKind::Or),
        _ => None,
    }
}

fn span_of(node: Node<'_>) -> LineSpan {
    LineSpan {
        start_line: node.start_position().row as u32 + 1,
        end_line: node.end_position().row as u32 + 1,
    }
}

/// Reduce a grammar subtree: retained nodes keep their relevant descendants,
/// transparent nodes lift theirs, comment spans are collected on the side.
fn reduce_children(node: Node<'_>, source: &str, comments: &mut Vec<LineSpan>) -> Vec<SourceNode> {
    let mut reduced = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(child.kind(), "line_comment" | "block_comment") {
            comments.push(span_of(child));
            continue;
        }
        match classify(child, source) {
            Some(kind) => {
                let children = reduce_children(child, source, comments);
                reduced.push(SourceNode {
                    kind,
                    span: span_of(child),
                    children,
                });
            }
            None => reduced.extend(reduce_children(child, source, comments)),
        }
    }
    reduced
}
