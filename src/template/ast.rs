use crate::syntax::{LineCol, SourceLoc, SyntaxNode};
use std::sync::Arc;

pub use super::tokenizer::{Position, Span};

/// Shared handle to a node; mapping nodes keep one as their origin.
pub type NodeRef = Arc<TemplateNode>;

/// Template AST node
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNode {
    pub kind: NodeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Root of a parsed template
    Template { body: Vec<NodeRef> },

    /// Literal text between mustaches
    Text { chars: String },

    /// `{{path params...}}`, or `{{{path params...}}}` when `trusting`
    Mustache {
        path: Ident,
        params: Vec<Param>,
        trusting: bool,
    },

    /// `{{#path params...}} program {{else}} inverse {{/path}}`
    Block {
        path: Ident,
        params: Vec<Param>,
        program: Vec<NodeRef>,
        inverse: Option<Vec<NodeRef>>,
    },

    /// `{{! value}}` or `{{!-- value --}}`
    Comment { value: String },
}

/// A name inside a mustache. Names carry no span of their own, only the byte offset
/// where they start in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Path,
    String,
    Number,
}

/// Positional parameter of a mustache or block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub kind: ParamKind,
    /// Unquoted value
    pub value: String,
    /// Byte offset of the parameter in the source (the opening quote for strings)
    pub offset: usize,
    /// Length in the source, quotes included
    pub len: usize,
}

impl TemplateNode {
    pub fn new(kind: NodeKind, span: Span) -> NodeRef {
        Arc::new(Self { kind, span })
    }

    /// Direct children in source order, both branches of a block included.
    pub fn children(&self) -> Vec<&NodeRef> {
        match &self.kind {
            NodeKind::Template { body } => body.iter().collect(),
            NodeKind::Block { program, inverse, .. } => program
                .iter()
                .chain(inverse.iter().flatten())
                .collect(),
            NodeKind::Text { .. } | NodeKind::Mustache { .. } | NodeKind::Comment { .. } => {
                Vec::new()
            }
        }
    }
}

impl SyntaxNode for TemplateNode {
    fn kind(&self) -> &str {
        match self.kind {
            NodeKind::Template { .. } => "Template",
            NodeKind::Text { .. } => "TextNode",
            NodeKind::Mustache { .. } => "MustacheStatement",
            NodeKind::Block { .. } => "BlockStatement",
            NodeKind::Comment { .. } => "CommentStatement",
        }
    }

    fn loc(&self) -> SourceLoc {
        self.span.loc()
    }

    fn text_content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { chars } => Some(chars),
            _ => None,
        }
    }
}

impl Position {
    /// 1-indexed line/column for the parser contract.
    pub fn line_col(&self) -> LineCol {
        LineCol::new(self.line + 1, self.col)
    }
}
