//! Built-in parser for mustache-style templates.
//!
//! Supports text, `{{path params}}`, `{{{raw}}}`, comments, and
//! `{{#name params}} ... {{else}} ... {{/name}}` blocks. Mustache names and parameters are
//! kept as strings with byte offsets rather than nodes, so drivers map them with
//! [`Mapper::identifier`](crate::Mapper::identifier).

pub mod ast;
pub mod tokenizer;
mod tree_builder;

pub use ast::{Ident, NodeKind, NodeRef, Param, ParamKind, TemplateNode};
pub use tokenizer::{Position, Span, Token, tokenize};
use tree_builder::TreeBuilder;

use crate::emit::Mapper;
use crate::error::{CaptureError, ParseError};
use crate::rewrite::{RewriteOptions, RewriteResult, rewrite_with};
use crate::syntax::TemplateParser;

/// Mustache template parser
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSyntax;

impl TemplateSyntax {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateParser for TemplateSyntax {
    type Node = NodeRef;

    fn parse(&self, source: &str) -> Result<NodeRef, ParseError> {
        let tokens = tokenize(source)?;
        TreeBuilder::new(tokens).build()
    }
}

/// Rewrite a mustache template with the built-in parser.
pub fn rewrite_template<F>(source: &str, options: &RewriteOptions, driver: F) -> RewriteResult<NodeRef>
where
    F: FnOnce(&NodeRef, &mut Mapper<'_, NodeRef>) -> Result<(), CaptureError>,
{
    rewrite_with(source, &TemplateSyntax, options, driver)
}
