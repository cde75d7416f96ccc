//! Contract with the external template parser.
//!
//! The rewriter never looks inside nodes beyond what [`SyntaxNode`] exposes: a type tag,
//! a line/column location, and, for plain text nodes, the literal text.

use crate::error::ParseError;
use std::sync::Arc;

/// Line/column position as reported by a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineCol {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column (0-indexed, in bytes from the start of the line)
    pub column: usize,
}

impl LineCol {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Start and end of a node in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLoc {
    pub start: LineCol,
    pub end: LineCol,
}

impl SourceLoc {
    pub fn new(start: LineCol, end: LineCol) -> Self {
        Self { start, end }
    }
}

/// A node of the input tree.
pub trait SyntaxNode {
    /// Node-type tag, e.g. `"Text"` or `"if_statement"`.
    fn kind(&self) -> &str;

    fn loc(&self) -> SourceLoc;

    /// Literal contents when this is a pure text node, `None` for everything else.
    fn text_content(&self) -> Option<&str> {
        None
    }
}

impl<T: SyntaxNode + ?Sized> SyntaxNode for Arc<T> {
    fn kind(&self) -> &str {
        (**self).kind()
    }

    fn loc(&self) -> SourceLoc {
        (**self).loc()
    }

    fn text_content(&self) -> Option<&str> {
        (**self).text_content()
    }
}

/// Parser trait - converts template source to a tree of nodes
///
/// Mapping nodes keep a handle to the node they describe, so `Node` should be cheap to
/// clone (the built-in parsers hand out `Arc`s).
pub trait TemplateParser {
    type Node: SyntaxNode + Clone;

    fn parse(&self, source: &str) -> Result<Self::Node, ParseError>;
}

impl<P: TemplateParser + ?Sized> TemplateParser for &P {
    type Node = P::Node;

    fn parse(&self, source: &str) -> Result<Self::Node, ParseError> {
        (**self).parse(source)
    }
}
