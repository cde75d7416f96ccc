//! Rewrite templates into derived code while recording where every piece of output came
//! from.
//!
//! A caller supplies a parser and a driver. The driver walks the parsed tree and emits
//! output through a [`Mapper`]; wrapping an emission in [`Mapper::for_node`] attributes it
//! to that node. The result is the generated code plus a [`MappingNode`] tree that
//! translates positions between the two texts in either direction.
//!
//! ```
//! use hyper_rewrite::template::{NodeKind, TemplateSyntax};
//! use hyper_rewrite::{rewrite, Range};
//!
//! let result = rewrite("Hi {{name}}", &TemplateSyntax, |root, mapper| {
//!     let NodeKind::Template { body } = &root.kind else { return Ok(()) };
//!     for node in body {
//!         if let NodeKind::Mustache { path, .. } = &node.kind {
//!             mapper.for_node(node, |m| {
//!                 m.text("emit(");
//!                 m.identifier(&path.name, path.offset, None);
//!                 m.text(");");
//!                 Ok(())
//!             });
//!         }
//!     }
//!     Ok(())
//! });
//!
//! let rewritten = result.result.unwrap();
//! assert_eq!(rewritten.code, "emit(name);");
//! let hit = rewritten.mapping.narrowest_for_output(Range::new(5, 9));
//! assert_eq!(hit.source_range, Range::new(5, 9));
//! ```

pub mod emit;
pub mod error;
pub mod line_index;
pub mod mapping;
pub mod range;
pub mod rewrite;
pub mod syntax;
pub mod template;
pub mod treesitter;

pub use emit::Mapper;
pub use error::{CaptureError, ErrorKind, ParseError, RewriteError};
pub use line_index::LineOffsetIndex;
pub use mapping::{MappingNode, Origin, Walk};
pub use range::Range;
pub use rewrite::{RewriteOptions, RewriteResult, Rewritten, rewrite, rewrite_with};
pub use syntax::{LineCol, SourceLoc, SyntaxNode, TemplateParser};
