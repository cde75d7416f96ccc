//! Reference driver shared by the integration tests: turns a mustache template into a
//! TypeScript render function.

#![allow(dead_code)]

use hyper_rewrite::template::{Ident, NodeKind, NodeRef, Param, ParamKind, TemplateSyntax};
use hyper_rewrite::{CaptureError, Mapper, RewriteResult, rewrite};
use std::path::{Path, PathBuf};

const HELPERS: &[&str] = &["upper", "lower", "join"];

pub fn rewrite_ts(source: &str) -> RewriteResult<NodeRef> {
    rewrite(source, &TemplateSyntax, drive)
}

pub fn drive(root: &NodeRef, m: &mut Mapper<'_, NodeRef>) -> Result<(), CaptureError> {
    let NodeKind::Template { body } = &root.kind else {
        return Err("expected a template root".into());
    };
    m.for_node(root, |m| {
        m.text("export default function template(ctx) {");
        block_body(m, body);
        Ok(())
    });
    Ok(())
}

/// Emit one statement per node, each on its own line.
fn statements(m: &mut Mapper<'_, NodeRef>, nodes: &[NodeRef]) {
    for node in nodes {
        if m.for_node(node, |m| statement(m, node)).is_some() {
            m.newline();
        }
    }
}

fn block_body(m: &mut Mapper<'_, NodeRef>, nodes: &[NodeRef]) {
    m.indent();
    m.newline();
    statements(m, nodes);
    m.dedent();
    m.text("}");
}

fn statement(m: &mut Mapper<'_, NodeRef>, node: &NodeRef) -> Result<(), CaptureError> {
    match &node.kind {
        NodeKind::Text { chars } => {
            if !chars.trim().is_empty() {
                m.text(&format!("emit({chars:?});"));
            }
            Ok(())
        }
        NodeKind::Comment { .. } => Ok(()),
        NodeKind::Mustache {
            path,
            params,
            trusting,
        } => {
            m.text(if *trusting { "emitRaw(" } else { "emit(" });
            if params.is_empty() {
                m.text("ctx.");
                m.identifier(&path.name, path.offset, None);
            } else {
                helper_call(m, path, params)?;
            }
            m.text(");");
            Ok(())
        }
        NodeKind::Block {
            path,
            params,
            program,
            inverse,
        } => block(m, path, params, program, inverse.as_deref()),
        NodeKind::Template { .. } => Err("nested template".into()),
    }
}

fn helper_call(m: &mut Mapper<'_, NodeRef>, path: &Ident, params: &[Param]) -> Result<(), CaptureError> {
    if !HELPERS.contains(&path.name.as_str()) {
        return Err(CaptureError::new(format!("unknown helper `{}`", path.name)));
    }
    m.text("helpers.");
    m.identifier(&path.name, path.offset, None);
    m.text("(");
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            m.text(", ");
        }
        expression(m, param);
    }
    m.text(")");
    Ok(())
}

fn expression(m: &mut Mapper<'_, NodeRef>, param: &Param) {
    match param.kind {
        ParamKind::Path => {
            m.text("ctx.");
            m.identifier(&param.value, param.offset, Some(param.len));
        }
        ParamKind::String => m.text(&format!("{:?}", param.value)),
        ParamKind::Number => m.text(&param.value),
    }
}

fn block(
    m: &mut Mapper<'_, NodeRef>,
    path: &Ident,
    params: &[Param],
    program: &[NodeRef],
    inverse: Option<&[NodeRef]>,
) -> Result<(), CaptureError> {
    let [condition] = params else {
        return Err(CaptureError::new(format!(
            "`{{{{#{}}}}}` takes exactly one argument",
            path.name
        )));
    };
    match path.name.as_str() {
        "if" => m.text("if ("),
        "unless" => m.text("if (!"),
        "each" => {
            if inverse.is_some() {
                return Err("`{{else}}` is not supported in `{{#each}}`".into());
            }
            m.text("for (const item of ");
        }
        other => return Err(CaptureError::new(format!("unknown block helper `{other}`"))),
    }
    expression(m, condition);
    m.text(") {");
    block_body(m, program);
    if let Some(inverse) = inverse {
        m.text(" else {");
        block_body(m, inverse);
    }
    Ok(())
}

/// Collect all .hbs fixtures
pub fn fixture_files() -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut files: Vec<_> = walkdir::WalkDir::new(&dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|s| s == "hbs"))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}
