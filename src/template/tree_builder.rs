use super::ast::*;
use super::tokenizer::Token;
use crate::error::{ErrorKind, ParseError};

/// Builds an AST from a token stream
pub struct TreeBuilder {
    tokens: Vec<Token>,
    pos: usize,
}

impl TreeBuilder {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Build the root `Template` node.
    pub fn build(&mut self) -> Result<NodeRef, ParseError> {
        let start = self.current_span().start;
        let body = self.parse_body()?;

        match self.peek() {
            Some(Token::Else { span }) => Err(ParseError::new(
                ErrorKind::UnexpectedToken,
                "`{{else}}` outside of a block",
                span.loc(),
            )),
            Some(Token::BlockClose { name, span }) => Err(ParseError::new(
                ErrorKind::UnexpectedToken,
                format!("`{{{{/{}}}}}` closes a block that was never opened", name),
                span.loc(),
            )),
            _ => {
                let end = self.current_span().end;
                Ok(TemplateNode::new(NodeKind::Template { body }, Span { start, end }))
            }
        }
    }

    /// Get a span at the current position (for EOF or current token)
    fn current_span(&self) -> Span {
        self.peek().map(Token::span).unwrap_or_default()
    }

    /// Parse nodes until `{{else}}`, a closing tag, or end of input.
    fn parse_body(&mut self) -> Result<Vec<NodeRef>, ParseError> {
        let mut nodes = Vec::new();
        while let Some(node) = self.parse_node()? {
            nodes.push(node);
        }
        Ok(nodes)
    }

    fn parse_node(&mut self) -> Result<Option<NodeRef>, ParseError> {
        let Some(token) = self.peek() else {
            return Ok(None);
        };

        let node = match token {
            Token::Text { text, span } => TemplateNode::new(
                NodeKind::Text {
                    chars: text.clone(),
                },
                *span,
            ),

            Token::Comment { value, span } => TemplateNode::new(
                NodeKind::Comment {
                    value: value.clone(),
                },
                *span,
            ),

            Token::Mustache {
                path,
                params,
                trusting,
                span,
            } => TemplateNode::new(
                NodeKind::Mustache {
                    path: path.clone(),
                    params: params.clone(),
                    trusting: *trusting,
                },
                *span,
            ),

            Token::BlockOpen { path, params, span } => {
                let (path, params, span) = (path.clone(), params.clone(), *span);
                self.advance();
                return self.parse_block(path, params, span).map(Some);
            }

            Token::Else { .. } | Token::BlockClose { .. } | Token::Eof { .. } => {
                return Ok(None);
            }
        };

        self.advance();
        Ok(Some(node))
    }

    fn parse_block(&mut self, path: Ident, params: Vec<Param>, open_span: Span) -> Result<NodeRef, ParseError> {
        let program = self.parse_body()?;

        let inverse = if let Some(Token::Else { .. }) = self.peek() {
            self.advance();
            Some(self.parse_body()?)
        } else {
            None
        };

        let end = self.expect_close(&path.name, &open_span)?;
        Ok(TemplateNode::new(
            NodeKind::Block {
                path,
                params,
                program,
                inverse,
            },
            Span {
                start: open_span.start,
                end,
            },
        ))
    }

    /// Require `{{/name}}` to close a block, returning the position after it.
    fn expect_close(&mut self, name: &str, open_span: &Span) -> Result<Position, ParseError> {
        match self.peek() {
            Some(Token::BlockClose { name: close, span }) if close == name => {
                let end = span.end;
                self.advance();
                Ok(end)
            }
            Some(Token::BlockClose { name: close, span }) => Err(ParseError::new(
                ErrorKind::MismatchedCloseTag,
                format!("`{{{{/{}}}}}` does not match `{{{{#{}}}}}`", close, name),
                span.loc(),
            )
            .with_help(format!("close it with `{{{{/{}}}}}`", name))),
            Some(Token::Else { span }) => Err(ParseError::new(
                ErrorKind::UnexpectedToken,
                format!("`{{{{#{}}}}}` already has an `{{{{else}}}}`", name),
                span.loc(),
            )),
            _ => Err(ParseError::new(
                ErrorKind::UnclosedBlock,
                format!("unclosed block `{{{{#{}}}}}`", name),
                open_span.loc(),
            )
            .with_help(format!("close it with `{{{{/{}}}}}`", name))),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }
}
