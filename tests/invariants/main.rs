//! Structural checks on the mapping tree of every fixture.
//!
//! Run with: cargo test --test invariants

#[path = "../common/mod.rs"]
mod common;

use hyper_rewrite::template::NodeRef;
use hyper_rewrite::{MappingNode, Range};
use libtest_mimic::{Arguments, Failed, Trial};
use std::fs;
use std::path::{Path, PathBuf};

type Check = fn(&str, &str, &MappingNode<NodeRef>) -> Result<(), Failed>;

const CHECKS: &[(&str, Check)] = &[
    ("containment", check_containment),
    ("text_consistency", check_text_consistency),
    ("no_empty_nodes", check_no_empty_nodes),
];

fn main() {
    let args = Arguments::from_args();
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let pattern = root.join("tests/fixtures/**/*.hbs");

    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .filter_map(Result::ok)
        .collect();
    files.sort();

    let mut trials = Vec::new();
    for path in files {
        let stem = path
            .strip_prefix(root.join("tests/fixtures"))
            .unwrap_or(path.as_path())
            .with_extension("")
            .to_string_lossy()
            .replace('\\', "/");
        for &(check_name, check) in CHECKS {
            let path = path.clone();
            trials.push(Trial::test(format!("{stem}::{check_name}"), move || {
                run_check(&path, check)
            }));
        }
    }

    libtest_mimic::run(&args, trials).exit();
}

fn run_check(path: &Path, check: Check) -> Result<(), Failed> {
    let source = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let result = common::rewrite_ts(&source);
    match result.result {
        Some(rewritten) => check(&source, &rewritten.code, &rewritten.mapping),
        // Unparseable fixtures have no tree to check
        None => Ok(()),
    }
}

/// Children sit inside their parent on both sides; siblings never overlap in the output.
fn check_containment(_source: &str, code: &str, root: &MappingNode<NodeRef>) -> Result<(), Failed> {
    for node in root.walk() {
        let mut previous: Option<Range> = None;
        for child in node.children() {
            if !node.output_range.contains(child.output_range) {
                return Err(format!(
                    "output {:?} of {} escapes parent {:?}",
                    child.output_range,
                    child.origin.kind(),
                    node.output_range
                )
                .into());
            }
            if !node.source_range.contains(child.source_range) {
                return Err(format!(
                    "source {:?} of {} escapes parent {:?}",
                    child.source_range,
                    child.origin.kind(),
                    node.source_range
                )
                .into());
            }
            if let Some(prev) = previous {
                if prev.end > child.output_range.start {
                    return Err(format!(
                        "siblings overlap at {:?} in {:?}",
                        child.output_range,
                        child.output_range.slice(code)
                    )
                    .into());
                }
            }
            previous = Some(child.output_range);
        }
    }
    Ok(())
}

/// The root covers exactly the generated code, and rebuilding it from the tree (children
/// in order, gaps between them owned by the enclosing node) gives the code back.
fn check_text_consistency(_source: &str, code: &str, root: &MappingNode<NodeRef>) -> Result<(), Failed> {
    if root.output_range != Range::of(code) {
        return Err(format!("root covers {:?}, code is {} bytes", root.output_range, code.len()).into());
    }
    let rebuilt = rebuild(code, root)?;
    if rebuilt != code {
        return Err(format!("tree rebuilds {rebuilt:?}, code is {code:?}").into());
    }
    Ok(())
}

fn rebuild(code: &str, node: &MappingNode<NodeRef>) -> Result<String, Failed> {
    let range = node.output_range;
    if range.end > code.len() {
        return Err(format!("{range:?} runs past the end of the code").into());
    }
    let mut text = String::new();
    let mut cursor = range.start;
    for child in node.children() {
        if child.output_range.start < cursor || child.output_range.end > range.end {
            return Err(format!("{:?} is out of order inside {range:?}", child.output_range).into());
        }
        text.push_str(&code[cursor..child.output_range.start]);
        text.push_str(&rebuild(code, child)?);
        cursor = child.output_range.end;
    }
    text.push_str(&code[cursor..range.end]);
    Ok(text)
}

fn check_no_empty_nodes(_source: &str, _code: &str, root: &MappingNode<NodeRef>) -> Result<(), Failed> {
    // Only the root may be empty, and only when nothing was emitted
    match root.walk().skip(1).find(|n| n.output_range.is_empty()) {
        Some(node) => Err(format!("empty mapping node for {}", node.origin.kind()).into()),
        None => Ok(()),
    }
}
