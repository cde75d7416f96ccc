use crate::emit::Mapper;
use crate::error::{CaptureError, RewriteError};
use crate::mapping::{MappingNode, Origin};
use crate::range::Range;
use crate::syntax::{SyntaxNode, TemplateParser};
use serde::Serialize;

/// Configuration for a rewrite.
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// String added by each `indent()` (default: two spaces)
    pub indent_unit: String,
    /// Stop recording capture failures after this many (default: unlimited)
    pub max_errors: Option<usize>,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            indent_unit: "  ".to_string(),
            max_errors: None,
        }
    }
}

/// Generated code plus the tree explaining it.
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "N: SyntaxNode"))]
pub struct Rewritten<N> {
    pub code: String,
    pub mapping: MappingNode<N>,
}

/// Outcome of a rewrite.
///
/// `result` is `None` only when the template could not be parsed. Otherwise it is present
/// even when `errors` is not empty: failed nodes are left out, the rest is kept.
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "N: SyntaxNode"))]
pub struct RewriteResult<N> {
    pub errors: Vec<RewriteError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Rewritten<N>>,
    /// Capture failures dropped because `max_errors` was reached
    #[serde(skip_serializing_if = "is_zero")]
    pub suppressed_errors: usize,
}

impl<N> RewriteResult<N> {
    pub fn code(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.code.as_str())
    }

    pub fn mapping(&self) -> Option<&MappingNode<N>> {
        self.result.as_ref().map(|r| &r.mapping)
    }
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Rewrite `source` with default options.
///
/// `driver` is called once with the parsed tree and decides what gets emitted. See
/// [`Mapper`] for the operations available to it.
pub fn rewrite<P, F>(source: &str, parser: &P, driver: F) -> RewriteResult<P::Node>
where
    P: TemplateParser + ?Sized,
    F: FnOnce(&P::Node, &mut Mapper<'_, P::Node>) -> Result<(), CaptureError>,
{
    rewrite_with(source, parser, &RewriteOptions::default(), driver)
}

/// Rewrite `source` with explicit options.
pub fn rewrite_with<P, F>(
    source: &str,
    parser: &P,
    options: &RewriteOptions,
    driver: F,
) -> RewriteResult<P::Node>
where
    P: TemplateParser + ?Sized,
    F: FnOnce(&P::Node, &mut Mapper<'_, P::Node>) -> Result<(), CaptureError>,
{
    let ast = match parser.parse(source) {
        Ok(ast) => ast,
        Err(err) => {
            tracing::debug!(kind = err.kind.as_str(), "template failed to parse: {}", err);
            return RewriteResult {
                errors: vec![RewriteError::new(err.message, Range::of(source))],
                result: None,
                suppressed_errors: 0,
            };
        }
    };

    let mut mapper = Mapper::new(source, options);
    // The root stands for the whole input, even when the parser's root node starts after
    // leading trivia.
    let source_range = Range::of(source);

    // Failures outside any node scope have nothing to roll back to; keep what was
    // committed and report against the whole template.
    if let Err(err) = driver(&ast, &mut mapper) {
        tracing::debug!("driver failed outside of a node scope: {}", err);
        mapper.record_error(err.message, source_range);
    }

    let (code, children, errors, suppressed_errors) = mapper.finish();
    tracing::debug!(
        output_len = code.len(),
        errors = errors.len(),
        suppressed_errors,
        "rewrite finished"
    );

    let mapping = MappingNode::new(Range::of(&code), source_range, children, Origin::Node(ast));
    RewriteResult {
        errors,
        result: Some(Rewritten { code, mapping }),
        suppressed_errors,
    }
}
