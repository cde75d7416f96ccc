//! Tree-sitter grammars as template parsers.
//!
//! Tree-sitter trees borrow from their `Tree`, while mapping nodes outlive the parse, so
//! the concrete syntax tree is copied into owned [`CstNode`]s.

use crate::error::{ErrorKind, ParseError};
use crate::syntax::{LineCol, SourceLoc, SyntaxNode, TemplateParser};
use std::sync::Arc;
use tree_sitter::{Language, Node, Parser, Point};

/// Owned copy of a tree-sitter node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstNode {
    pub kind: &'static str,
    pub loc: SourceLoc,
    pub byte_range: std::ops::Range<usize>,
    /// Source text, kept for leaves and for text kinds
    pub text: Option<String>,
    is_text: bool,
    /// Named children only; anonymous tokens (punctuation, keywords) are dropped
    pub children: Vec<Arc<CstNode>>,
}

impl CstNode {
    /// First named child of the given kind.
    pub fn child_of_kind(&self, kind: &str) -> Option<&Arc<CstNode>> {
        self.children.iter().find(|c| c.kind == kind)
    }
}

impl SyntaxNode for CstNode {
    fn kind(&self) -> &str {
        self.kind
    }

    fn loc(&self) -> SourceLoc {
        self.loc
    }

    fn text_content(&self) -> Option<&str> {
        if self.is_text { self.text.as_deref() } else { None }
    }
}

/// Parser backed by a tree-sitter grammar
#[derive(Clone)]
pub struct TreeSitterParser {
    language: Language,
    text_kinds: Vec<&'static str>,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            text_kinds: Vec::new(),
        }
    }

    /// Node kinds that hold plain template text, e.g. `["text"]` for an HTML grammar.
    pub fn with_text_kinds(mut self, kinds: &[&'static str]) -> Self {
        self.text_kinds.extend_from_slice(kinds);
        self
    }

    fn convert(&self, node: Node<'_>, source: &str) -> Arc<CstNode> {
        let mut cursor = node.walk();
        let children: Vec<_> = node
            .named_children(&mut cursor)
            .map(|child| self.convert(child, source))
            .collect();

        let is_text = self.text_kinds.contains(&node.kind());
        let text = if is_text || node.named_child_count() == 0 {
            node.utf8_text(source.as_bytes()).ok().map(str::to_string)
        } else {
            None
        };

        Arc::new(CstNode {
            kind: node.kind(),
            loc: SourceLoc::new(line_col(node.start_position()), line_col(node.end_position())),
            byte_range: node.byte_range(),
            text,
            is_text,
            children,
        })
    }
}

impl TemplateParser for TreeSitterParser {
    type Node = Arc<CstNode>;

    fn parse(&self, source: &str) -> Result<Arc<CstNode>, ParseError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language).map_err(|err| {
            ParseError::new(ErrorKind::InvalidSyntax, err.to_string(), SourceLoc::default())
        })?;

        let tree = parser.parse(source, None).ok_or_else(|| {
            ParseError::new(ErrorKind::InvalidSyntax, "parser produced no tree", SourceLoc::default())
        })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(first_error(root).unwrap_or_else(|| {
                ParseError::new(ErrorKind::InvalidSyntax, "syntax error", node_loc(root))
            }));
        }

        Ok(self.convert(root, source))
    }
}

/// Tree-sitter rows are 0-indexed; the parser contract wants 1-indexed lines.
fn line_col(point: Point) -> LineCol {
    LineCol::new(point.row + 1, point.column)
}

fn node_loc(node: Node<'_>) -> SourceLoc {
    SourceLoc::new(line_col(node.start_position()), line_col(node.end_position()))
}

/// Locate the first error or missing node in document order.
fn first_error(node: Node<'_>) -> Option<ParseError> {
    if node.is_missing() {
        return Some(ParseError::new(
            ErrorKind::MissingNode,
            format!("missing `{}`", node.kind()),
            node_loc(node),
        ));
    }
    if node.is_error() {
        let pos = node.start_position();
        return Some(ParseError::new(
            ErrorKind::InvalidSyntax,
            format!("syntax error at line {}, column {}", pos.row + 1, pos.column + 1),
            node_loc(node),
        ));
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}
