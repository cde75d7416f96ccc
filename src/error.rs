use crate::line_index::LineOffsetIndex;
use crate::range::Range;
use crate::syntax::SourceLoc;
use serde::Serialize;
use thiserror::Error;

/// Kind of parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnclosedBlock,
    UnclosedMustache,
    UnclosedComment,
    MismatchedCloseTag,
    UnexpectedToken,
    InvalidSyntax,
    MissingNode,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnclosedBlock => "Unclosed block",
            ErrorKind::UnclosedMustache => "Unclosed mustache",
            ErrorKind::UnclosedComment => "Unclosed comment",
            ErrorKind::MismatchedCloseTag => "Mismatched close tag",
            ErrorKind::UnexpectedToken => "Unexpected token",
            ErrorKind::InvalidSyntax => "Invalid syntax",
            ErrorKind::MissingNode => "Missing node",
        }
    }
}

/// Error during parsing
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: SourceLoc,
    pub help: Option<String>,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: SourceLoc) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            help: None,
        }
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Failure returned by a driver callback.
///
/// Returning one from inside [`Mapper::for_node`](crate::Mapper::for_node) rolls back
/// everything that scope emitted and records the message against the node's range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CaptureError {
    pub message: String,
}

impl CaptureError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<String> for CaptureError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for CaptureError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<ParseError> for CaptureError {
    fn from(err: ParseError) -> Self {
        Self { message: err.message }
    }
}

/// A diagnostic collected during a rewrite, located in the template source.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct RewriteError {
    pub message: String,
    pub location: Range,
}

impl RewriteError {
    pub fn new(message: impl Into<String>, location: Range) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }

    /// Render the error with the offending source line underlined.
    pub fn render(&self, source: &str, filename: &str) -> String {
        let index = LineOffsetIndex::new(source);
        let start = index.line_col(self.location.start);
        let end = index.line_col(self.location.end);

        let mut output = String::new();
        output.push_str(&format!(
            " file: {}:{}:{}\n",
            filename,
            start.line,
            start.column + 1
        ));
        output.push_str(&format!("error: {}\n", self.message));

        if let Some(source_line) = index.line_text(start.line) {
            let line_num_width = format!("{}", start.line).len().max(2);
            output.push_str(&format!("{:>width$} |\n", "", width = line_num_width));
            output.push_str(&format!(
                "{:>width$} | {}\n",
                start.line,
                source_line,
                width = line_num_width
            ));

            let underline_start = start.column.min(source_line.len());
            let underline_len = if end.line == start.line {
                end.column.saturating_sub(start.column).max(1)
            } else {
                source_line.len().saturating_sub(underline_start).max(1)
            };
            output.push_str(&format!(
                "{:>width$} | {}{}\n",
                "",
                " ".repeat(underline_start),
                "^".repeat(underline_len),
                width = line_num_width
            ));
        }

        output
    }
}

/// Accumulates capture failures in the order they happen.
#[derive(Debug, Default)]
pub(crate) struct ErrorCollector {
    errors: Vec<RewriteError>,
    max_errors: Option<usize>,
    suppressed: usize,
}

impl ErrorCollector {
    pub(crate) fn new(max_errors: Option<usize>) -> Self {
        Self {
            errors: Vec::new(),
            max_errors,
            suppressed: 0,
        }
    }

    pub(crate) fn record(&mut self, message: String, location: Range) {
        if self.max_errors.is_some_and(|max| self.errors.len() >= max) {
            if self.suppressed == 0 {
                tracing::warn!(
                    limit = self.errors.len(),
                    "error limit reached, further capture failures are not reported"
                );
            }
            self.suppressed += 1;
            return;
        }
        self.errors.push(RewriteError { message, location });
    }

    pub(crate) fn finish(self) -> (Vec<RewriteError>, usize) {
        (self.errors, self.suppressed)
    }
}
