//! Emission buffer and scoped capture.
//!
//! A driver walks the input tree and writes output through a [`Mapper`]. Every
//! [`for_node`](Mapper::for_node) call opens a scope; when the callback returns, the
//! scope either becomes a [`MappingNode`] in its parent (if it emitted anything), vanishes
//! (if it emitted nothing), or is rolled back (if the callback failed).
//!
//! All scopes write into one buffer, so a scope's captured text is always the suffix of
//! the buffer starting at the offset where it opened. Committing is then free and rolling
//! back is a truncate.

use crate::error::{CaptureError, ErrorCollector, RewriteError};
use crate::line_index::LineOffsetIndex;
use crate::mapping::{MappingNode, Origin};
use crate::range::Range;
use crate::rewrite::RewriteOptions;
use crate::syntax::SyntaxNode;

/// An open capture scope.
#[derive(Debug)]
struct Scope<N> {
    /// Output offset when the scope opened
    start: usize,
    /// Mapping nodes committed by nested scopes, in output order
    children: Vec<MappingNode<N>>,
    /// Indentation state when the scope opened, restored on rollback
    indent_len: usize,
    needs_indent: bool,
}

impl<N> Scope<N> {
    fn new(start: usize, indent_len: usize, needs_indent: bool) -> Self {
        Self {
            start,
            children: Vec::new(),
            indent_len,
            needs_indent,
        }
    }
}

/// The capability handed to a rewrite driver.
///
/// The driver only ever sees `&mut Mapper`, inside the rewrite call that created it, so
/// it cannot outlive the session it writes into.
pub struct Mapper<'a, N> {
    index: LineOffsetIndex<'a>,
    code: String,
    /// Open scopes; the root scope sits at the bottom and is never popped.
    scopes: Vec<Scope<N>>,
    indent: String,
    indent_unit: String,
    needs_indent: bool,
    errors: ErrorCollector,
}

impl<'a, N: SyntaxNode + Clone> Mapper<'a, N> {
    pub(crate) fn new(source: &'a str, options: &RewriteOptions) -> Self {
        Self {
            index: LineOffsetIndex::new(source),
            code: String::new(),
            scopes: vec![Scope::new(0, 0, false)],
            indent: String::new(),
            indent_unit: options.indent_unit.clone(),
            needs_indent: false,
            errors: ErrorCollector::new(options.max_errors),
        }
    }

    /// Source range of `node`, without emitting anything.
    pub fn range_for_node(&self, node: &N) -> Range {
        self.index.locate(node)
    }

    /// Current offset in the output.
    pub fn output_offset(&self) -> usize {
        self.code.len()
    }

    /// Number of scopes currently open, not counting the root.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Increase indentation for lines started after the next newline.
    pub fn indent(&mut self) {
        self.indent.push_str(&self.indent_unit);
    }

    pub fn dedent(&mut self) {
        let len = self.indent.len().saturating_sub(self.indent_unit.len());
        self.indent.truncate(len);
    }

    pub fn newline(&mut self) {
        self.code.push('\n');
        self.needs_indent = true;
    }

    /// Append `value` verbatim, preceded by the indentation if a line was just started.
    pub fn text(&mut self, value: &str) {
        if self.needs_indent {
            self.code.push_str(&self.indent);
            self.needs_indent = false;
        }
        self.code.push_str(value);
    }

    /// Emit `value` as a mapped identifier covering `source_offset..source_offset + len`.
    ///
    /// `source_length` defaults to the length of `value`, for names that appear verbatim
    /// in the source.
    pub fn identifier(&mut self, value: &str, source_offset: usize, source_length: Option<usize>) {
        let length = source_length.unwrap_or(value.len());
        let source_range = Range::new(source_offset, source_offset + length);
        self.capture_mapping(source_range, Origin::Identifier(value.to_string()), |mapper| {
            mapper.text(value);
            Ok(())
        });
    }

    /// Run `callback`, attributing everything it emits to `node`.
    ///
    /// Returns the output range of the committed mapping node, or `None` when the callback
    /// emitted nothing or failed. A failure is recorded and does not propagate.
    pub fn for_node<F>(&mut self, node: &N, callback: F) -> Option<Range>
    where
        F: FnOnce(&mut Self) -> Result<(), CaptureError>,
    {
        let source_range = self.range_for_node(node);
        self.capture_mapping(source_range, Origin::Node(node.clone()), callback)
    }

    fn capture_mapping<F>(&mut self, source_range: Range, origin: Origin<N>, callback: F) -> Option<Range>
    where
        F: FnOnce(&mut Self) -> Result<(), CaptureError>,
    {
        let start = self.code.len();
        let depth = self.scopes.len();
        self.scopes
            .push(Scope::new(start, self.indent.len(), self.needs_indent));

        let result = callback(self);

        debug_assert_eq!(self.scopes.len(), depth + 1, "nested capture left a scope open");
        let scope = self.scopes.pop().expect("capture scope is open");

        match result {
            Ok(()) => {
                let end = self.code.len();
                if end == start {
                    return None;
                }
                let output_range = Range::new(start, end);
                tracing::trace!(
                    kind = origin.kind(),
                    ?source_range,
                    ?output_range,
                    "commit mapping"
                );
                let node = MappingNode::new(output_range, source_range, scope.children, origin);
                self.current_scope().children.push(node);
                Some(output_range)
            }
            Err(err) => {
                tracing::debug!(
                    kind = origin.kind(),
                    ?source_range,
                    discarded = self.code.len() - start,
                    "capture failed, rolling back: {}",
                    err.message
                );
                self.code.truncate(scope.start);
                self.indent.truncate(scope.indent_len);
                self.needs_indent = scope.needs_indent;
                self.errors.record(err.message, source_range);
                None
            }
        }
    }

    /// Record an error against a source range without opening a scope.
    pub(crate) fn record_error(&mut self, message: String, location: Range) {
        self.errors.record(message, location);
    }

    fn current_scope(&mut self) -> &mut Scope<N> {
        self.scopes.last_mut().expect("root scope is always open")
    }

    /// Close the session: generated code, the root scope's mapping nodes, collected
    /// errors and the number of errors suppressed by the cap.
    pub(crate) fn finish(mut self) -> (String, Vec<MappingNode<N>>, Vec<RewriteError>, usize) {
        debug_assert_eq!(self.scopes.len(), 1, "rewrite finished with capture scopes still open");
        let root = self.scopes.pop().expect("root scope is always open");
        let (errors, suppressed) = self.errors.finish();
        (self.code, root.children, errors, suppressed)
    }
}
