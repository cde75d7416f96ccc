mod common;

use common::rewrite_ts;
use hyper_rewrite::template::{NodeKind, TemplateSyntax};
use hyper_rewrite::{Origin, Range, RewriteError, RewriteOptions, SyntaxNode, rewrite, rewrite_with};
use pretty_assertions::assert_eq;

#[test]
fn test_static_text_is_identity() {
    let source = "abc";
    let result = rewrite(source, &TemplateSyntax, |root, m| {
        m.for_node(root, |m| {
            m.text("abc");
            Ok(())
        });
        Ok(())
    });

    assert!(result.errors.is_empty());
    let rewritten = result.result.unwrap();
    assert_eq!(rewritten.code, source);
    assert_eq!(rewritten.mapping.output_range, Range::new(0, 3));
    assert_eq!(rewritten.mapping.children.len(), 1);
    assert_eq!(rewritten.mapping.children[0].output_range, Range::new(0, 3));
    assert_eq!(rewritten.mapping.children[0].source_range, Range::new(0, 3));
}

#[test]
fn test_nested_failure_keeps_outer_output() {
    let source = "a{{b}}";
    let result = rewrite(source, &TemplateSyntax, |root, m| {
        m.for_node(root, |m| {
            m.text("x");
            for child in root.children() {
                if matches!(child.kind, NodeKind::Mustache { .. }) {
                    m.for_node(child, |m| {
                        m.text("partial output");
                        Err("boom".into())
                    });
                }
            }
            Ok(())
        });
        Ok(())
    });

    assert_eq!(result.code(), Some("x"));
    assert_eq!(result.errors, vec![RewriteError::new("boom", Range::new(1, 6))]);
    let mapping = result.mapping().unwrap();
    assert_eq!(mapping.children.len(), 1);
    assert!(mapping.children[0].children.is_empty());
}

#[test]
fn test_unparseable_template() {
    let result = rewrite_ts("{{#if}}");
    assert!(result.result.is_none());
    assert_eq!(
        result.errors,
        vec![RewriteError::new("unclosed block `{{#if}}`", Range::new(0, 7))]
    );
}

#[test]
fn test_empty_callbacks_leave_no_nodes() {
    let result = rewrite("{{! only a comment }}", &TemplateSyntax, |root, m| {
        for child in root.children() {
            m.for_node(child, |_| Ok(()));
        }
        Ok(())
    });

    let rewritten = result.result.unwrap();
    assert_eq!(rewritten.code, "");
    assert!(rewritten.mapping.children.is_empty());
    assert_eq!(rewritten.mapping.output_range, Range::new(0, 0));
}

#[test]
fn test_mapping_translates_both_ways() {
    let source = "Hello {{name}}!\n";
    let result = rewrite_ts(source);
    let rewritten = result.result.unwrap();
    let code = &rewritten.code;

    let name_in_code = code.find("name").unwrap();
    let hit = rewritten
        .mapping
        .narrowest_for_output(Range::new(name_in_code, name_in_code + 4));
    assert_eq!(hit.origin.as_identifier(), Some("name"));
    assert_eq!(hit.source_range.slice(source), "name");

    let back = rewritten.mapping.narrowest_for_source(Range::new(8, 12));
    assert_eq!(back.output_range.slice(code), "name");

    // Text nodes map from their trimmed source
    let text = rewritten.mapping.narrowest_for_source(Range::new(0, 5));
    assert_eq!(text.origin.kind(), "TextNode");
    assert_eq!(text.source_range.slice(source), "Hello");
    assert!(text.output_range.slice(code).ends_with("emit(\"Hello \");"));
}

#[test]
fn test_failures_are_collected_in_order() {
    let source = "{{shout a}}{{ok}}{{scream b}}";
    let result = rewrite_ts(source);

    assert_eq!(
        result.errors,
        vec![
            RewriteError::new("unknown helper `shout`", Range::new(0, 11)),
            RewriteError::new("unknown helper `scream`", Range::new(17, 29)),
        ]
    );
    let code = result.code().unwrap();
    assert!(code.contains("emit(ctx.ok);"));
    assert!(!code.contains("shout"));
}

#[test]
fn test_error_cap_counts_suppressed() {
    let options = RewriteOptions {
        max_errors: Some(1),
        ..RewriteOptions::default()
    };
    let result = rewrite_with(
        "{{shout a}}{{scream b}}{{yell c}}",
        &TemplateSyntax,
        &options,
        common::drive,
    );
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.suppressed_errors, 2);
}

#[test]
fn test_result_serializes_to_json() {
    let source = "{{name}}";
    let result = rewrite(source, &TemplateSyntax, |root, m| {
        for child in root.children() {
            if let NodeKind::Mustache { path, .. } = &child.kind {
                m.for_node(child, |m| {
                    m.text("emit(");
                    m.identifier(&path.name, path.offset, None);
                    m.text(")");
                    Ok(())
                });
            }
        }
        Ok(())
    });

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "errors": [],
            "result": {
                "code": "emit(name)",
                "mapping": {
                    "output_range": {"start": 0, "end": 10},
                    "source_range": {"start": 0, "end": 8},
                    "origin": {"node": "Template"},
                    "children": [{
                        "output_range": {"start": 0, "end": 10},
                        "source_range": {"start": 0, "end": 8},
                        "origin": {"node": "MustacheStatement"},
                        "children": [{
                            "output_range": {"start": 5, "end": 9},
                            "source_range": {"start": 2, "end": 6},
                            "origin": {"identifier": "name"},
                            "children": [],
                        }],
                    }],
                },
            },
        })
    );

    let rewritten = result.result.unwrap();
    assert_eq!(
        rewritten.mapping.to_debug_string(source, &rewritten.code),
        "Template [0..8] \"{{name}}\" => [0..10] \"emit(name)\"\n\
         \x20\x20MustacheStatement [0..8] \"{{name}}\" => [0..10] \"emit(name)\"\n\
         \x20\x20\x20\x20Identifier(name) [2..6] \"name\" => [5..9] \"name\"\n"
    );
}

#[test]
fn test_failed_parse_serializes_without_result() {
    let result = rewrite_ts("{{#each xs}}");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "errors": [{
                "message": "unclosed block `{{#each}}`",
                "location": {"start": 0, "end": 12},
            }],
        })
    );
}

#[test]
fn test_utf16_ranges_for_editors() {
    let source = "é {{name}}";
    let rewritten = rewrite_ts(source).result.unwrap();
    let hit = rewritten.mapping.narrowest_for_source(Range::new(5, 9));
    assert_eq!(hit.origin, Origin::Identifier("name".to_string()));
    assert_eq!(hit.source_range.to_utf16(source), Range::new(4, 8));
}

#[test]
fn test_error_render_points_at_source() {
    let source = "{{! greeting }}\nHi {{{bio}}}\n{{shout name}}\n";
    let result = rewrite_ts(source);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].render(source, "partial.hbs"),
        " file: partial.hbs:3:1\n\
         error: unknown helper `shout`\n   |\n 3 | {{shout name}}\n   | ^^^^^^^^^^^^^^\n"
    );
}

#[test]
fn test_root_origin_is_the_template() {
    let rewritten = rewrite_ts("x").result.unwrap();
    let root = rewritten.mapping.origin.as_node().unwrap();
    assert_eq!(root.kind(), "Template");
    assert_eq!(rewritten.mapping.output_range, Range::of(&rewritten.code));
}
