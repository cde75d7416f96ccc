use super::ast::{Ident, Param, ParamKind};
use crate::error::{ErrorKind, ParseError};
use crate::syntax::SourceLoc;

/// Position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Byte offset in source
    pub byte: usize,
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in bytes)
    pub col: usize,
}

/// Span in source code (a range from start position to end position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn loc(&self) -> SourceLoc {
        SourceLoc::new(self.start.line_col(), self.end.line_col())
    }
}

/// Tokens produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Raw text between mustaches
    Text { text: String, span: Span },
    /// `{{! ...}}` or `{{!-- ... --}}`
    Comment { value: String, span: Span },
    /// `{{path params}}` or `{{{path params}}}`
    Mustache {
        path: Ident,
        params: Vec<Param>,
        trusting: bool,
        span: Span,
    },
    /// `{{#path params}}`
    BlockOpen {
        path: Ident,
        params: Vec<Param>,
        span: Span,
    },
    /// `{{else}}`
    Else { span: Span },
    /// `{{/name}}`
    BlockClose { name: String, span: Span },
    /// End of file
    Eof { position: Position },
}

impl Token {
    pub fn span(&self) -> Span {
        match self {
            Token::Text { span, .. } => *span,
            Token::Comment { span, .. } => *span,
            Token::Mustache { span, .. } => *span,
            Token::BlockOpen { span, .. } => *span,
            Token::Else { span } => *span,
            Token::BlockClose { span, .. } => *span,
            Token::Eof { position } => Span {
                start: *position,
                end: *position,
            },
        }
    }
}

/// Tokenizer for mustache templates
pub struct Tokenizer<'a> {
    source: &'a str,
    position: Position,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: Position::default(),
        }
    }

    /// Tokenize the entire source
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        while !self.at_eof() {
            if self.rest().starts_with("{{") {
                tokens.push(self.tokenize_mustache()?);
            } else {
                tokens.push(self.tokenize_text());
            }
        }

        tokens.push(Token::Eof {
            position: self.position,
        });
        Ok(tokens)
    }

    fn tokenize_text(&mut self) -> Token {
        let start = self.position;
        let len = self.rest().find("{{").unwrap_or(self.rest().len());
        let text = self.rest()[..len].to_string();
        self.advance_by(len);
        Token::Text {
            text,
            span: Span {
                start,
                end: self.position,
            },
        }
    }

    fn tokenize_mustache(&mut self) -> Result<Token, ParseError> {
        let start = self.position;

        if self.rest().starts_with("{{!--") {
            return self.tokenize_comment(start, "{{!--", "--}}");
        }
        if self.rest().starts_with("{{!") {
            return self.tokenize_comment(start, "{{!", "}}");
        }

        let trusting = self.rest().starts_with("{{{");
        let close = if trusting { "}}}" } else { "}}" };
        self.advance_by(if trusting { 3 } else { 2 });

        let sigil = if trusting { None } else { self.peek_char().filter(|c| matches!(*c, '#' | '/')) };
        if sigil.is_some() {
            self.advance();
        }

        self.skip_whitespace();
        let path = self.consume_word();
        let mut params = Vec::new();
        loop {
            self.skip_whitespace();
            if self.at_eof() || self.rest().starts_with(close) {
                break;
            }
            match self.tokenize_param(start)? {
                Some(param) => params.push(param),
                None => break,
            }
        }

        if !self.rest().starts_with(close) {
            return Err(ParseError::new(
                ErrorKind::UnclosedMustache,
                format!("expected `{}` to close this mustache", close),
                Span {
                    start,
                    end: self.position,
                }
                .loc(),
            ));
        }
        self.advance_by(close.len());
        let span = Span {
            start,
            end: self.position,
        };

        if path.name.is_empty() {
            return Err(ParseError::new(ErrorKind::InvalidSyntax, "empty mustache", span.loc())
                .with_help("put a name or path between the braces"));
        }

        let token = match sigil {
            Some('#') => Token::BlockOpen { path, params, span },
            Some(_) => {
                if let Some(param) = params.first() {
                    return Err(ParseError::new(
                        ErrorKind::UnexpectedToken,
                        format!("unexpected `{}` in closing tag", param.value),
                        span.loc(),
                    ));
                }
                Token::BlockClose {
                    name: path.name,
                    span,
                }
            }
            None if !trusting && path.name == "else" && params.is_empty() => Token::Else { span },
            None => Token::Mustache {
                path,
                params,
                trusting,
                span,
            },
        };
        Ok(token)
    }

    fn tokenize_comment(&mut self, start: Position, open: &str, close: &str) -> Result<Token, ParseError> {
        self.advance_by(open.len());
        let Some(len) = self.rest().find(close) else {
            self.advance_by(self.rest().len());
            return Err(ParseError::new(
                ErrorKind::UnclosedComment,
                "comment is never closed",
                Span {
                    start,
                    end: self.position,
                }
                .loc(),
            )
            .with_help(format!("close it with `{}`", close)));
        };
        let value = self.rest()[..len].to_string();
        self.advance_by(len + close.len());
        Ok(Token::Comment {
            value,
            span: Span {
                start,
                end: self.position,
            },
        })
    }

    fn tokenize_param(&mut self, mustache_start: Position) -> Result<Option<Param>, ParseError> {
        let offset = self.position.byte;
        match self.peek_char() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let Some(len) = self.rest().find(quote) else {
                    return Err(ParseError::new(
                        ErrorKind::UnclosedMustache,
                        "string literal is never closed",
                        Span {
                            start: mustache_start,
                            end: self.position,
                        }
                        .loc(),
                    ));
                };
                let value = self.rest()[..len].to_string();
                self.advance_by(len + 1);
                Ok(Some(Param {
                    kind: ParamKind::String,
                    value,
                    offset,
                    len: self.position.byte - offset,
                }))
            }
            Some('}') => {
                // A lone brace that does not start the closing delimiter
                Err(ParseError::new(
                    ErrorKind::UnexpectedToken,
                    "unexpected `}`",
                    Span {
                        start: self.position,
                        end: self.position,
                    }
                    .loc(),
                ))
            }
            Some(_) => {
                let word = self.consume_word();
                if word.name.is_empty() {
                    return Ok(None);
                }
                let is_number = word
                    .name
                    .trim_start_matches('-')
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_digit());
                Ok(Some(Param {
                    kind: if is_number { ParamKind::Number } else { ParamKind::Path },
                    len: word.name.len(),
                    value: word.name,
                    offset,
                }))
            }
            None => Ok(None),
        }
    }

    /// Consume a path or literal word: everything up to whitespace or a brace.
    fn consume_word(&mut self) -> Ident {
        let offset = self.position.byte;
        let len = self
            .rest()
            .find(|c: char| c.is_whitespace() || c == '}' || c == '{')
            .unwrap_or(self.rest().len());
        let name = self.rest()[..len].to_string();
        self.advance_by(len);
        Ident { name, offset }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position.byte..]
    }

    fn at_eof(&self) -> bool {
        self.position.byte >= self.source.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        let Some(ch) = self.peek_char() else { return };
        let char_len = ch.len_utf8();

        self.position.byte += char_len;

        if ch == '\n' {
            self.position.line += 1;
            self.position.col = 0;
        } else {
            self.position.col += char_len;
        }
    }

    /// Advance over `len` bytes, which must end on a char boundary.
    fn advance_by(&mut self, len: usize) {
        let target = self.position.byte + len;
        while self.position.byte < target && !self.at_eof() {
            self.advance();
        }
    }
}

/// Tokenize a template
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Tokenizer::new(source).tokenize()
}
