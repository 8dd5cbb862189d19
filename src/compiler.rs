//! Blueprint → layout text compiler.
//!
//! [`compile_astro`] is a pure function: equal blueprints always produce
//! byte-identical text, so compiled layouts diff cleanly under version
//! control. The output carries a marker pair for every region even when
//! the region is empty, so the parser and validator can locate all five
//! regions unconditionally.
//!
//! The compiler trusts its input. Attribute values and raw markup are
//! emitted as supplied (re-indented only, never escaped); sanitization is
//! the editor layer's responsibility, as is keeping prop defaults coherent
//! with their declared types.

use crate::blueprint::{
    AttrList, BodyNode, HeadNode, ImportSpec, LayoutBlueprint, PropValue, TitleSource,
};
use crate::markers::{begin_comment, end_comment, CommentStyle, SLOT_PLACEHOLDER};

/// The right-hand side of the props destructure line.
pub const PROPS_SOURCE: &str = "Astro.props";

const HEAD_INDENT: &str = "    ";
const BODY_INDENT: &str = "    ";

/// Renders a blueprint into a complete layout file.
pub fn compile_astro(blueprint: &LayoutBlueprint) -> String {
    let mut out = String::new();

    render_frontmatter(&mut out, blueprint);

    out.push_str("<!DOCTYPE html>\n");
    out.push_str(&format!("<html{}>\n", render_attrs(&html_attrs(blueprint))));

    out.push_str("  <head>\n");
    push_marker_line(
        &mut out,
        HEAD_INDENT,
        &begin_comment(CommentStyle::Markup, "head", false),
    );
    for node in &blueprint.head {
        render_head_node(&mut out, node);
    }
    push_marker_line(
        &mut out,
        HEAD_INDENT,
        &end_comment(CommentStyle::Markup, "head"),
    );
    out.push_str("  </head>\n");

    out.push_str("  <body>\n");
    push_marker_line(
        &mut out,
        BODY_INDENT,
        &begin_comment(CommentStyle::Markup, "pre-content", false),
    );
    for node in &blueprint.pre_content {
        render_body_node(&mut out, node);
    }
    push_marker_line(
        &mut out,
        BODY_INDENT,
        &end_comment(CommentStyle::Markup, "pre-content"),
    );

    let slot = &blueprint.content_slot;
    push_marker_line(
        &mut out,
        BODY_INDENT,
        &begin_comment(CommentStyle::Markup, &slot.name, slot.single),
    );
    out.push_str(BODY_INDENT);
    out.push_str(SLOT_PLACEHOLDER);
    out.push('\n');
    push_marker_line(
        &mut out,
        BODY_INDENT,
        &end_comment(CommentStyle::Markup, &slot.name),
    );

    push_marker_line(
        &mut out,
        BODY_INDENT,
        &begin_comment(CommentStyle::Markup, "post-content", false),
    );
    for node in &blueprint.post_content {
        render_body_node(&mut out, node);
    }
    push_marker_line(
        &mut out,
        BODY_INDENT,
        &end_comment(CommentStyle::Markup, "post-content"),
    );
    out.push_str("  </body>\n");

    out.push_str("</html>\n");
    out
}

fn render_frontmatter(out: &mut String, blueprint: &LayoutBlueprint) {
    out.push_str("---\n");

    out.push_str(&begin_comment(CommentStyle::Frontmatter, "imports", false));
    out.push('\n');
    for import in &blueprint.imports {
        render_import(out, import);
    }
    out.push_str(&end_comment(CommentStyle::Frontmatter, "imports"));
    out.push('\n');

    if !blueprint.props.is_empty() {
        render_props_destructure(out, blueprint);
    }

    out.push_str(&begin_comment(CommentStyle::Frontmatter, "props", false));
    out.push('\n');
    // The authoritative prop types on re-parse. serde preserves PropMap
    // insertion order, keeping output deterministic.
    let json = serde_json::to_string(&blueprint.props).unwrap_or_else(|_| "{}".to_string());
    out.push_str(&format!("/* {} */\n", json));
    out.push_str(&end_comment(CommentStyle::Frontmatter, "props"));
    out.push('\n');

    out.push_str("---\n");
}

fn render_import(out: &mut String, import: &ImportSpec) {
    out.push_str(&format!(
        "import {} from \"{}\";\n",
        import.binding, import.from
    ));
}

fn render_props_destructure(out: &mut String, blueprint: &LayoutBlueprint) {
    let bindings: Vec<String> = blueprint
        .props
        .iter()
        .map(|(name, spec)| match &spec.default {
            Some(value) => format!("{} = {}", name, value.to_literal()),
            None => name.to_string(),
        })
        .collect();
    out.push_str(&format!(
        "const {{ {} }} = {};\n",
        bindings.join(", "),
        PROPS_SOURCE
    ));
}

fn html_attrs(blueprint: &LayoutBlueprint) -> AttrList {
    if blueprint.html_attrs.is_empty() {
        [("lang".to_string(), Some("en".to_string()))]
            .into_iter()
            .collect()
    } else {
        blueprint.html_attrs.clone()
    }
}

/// Renders an attribute list with a leading space per attribute.
fn render_attrs(attrs: &AttrList) -> String {
    let mut s = String::new();
    for (key, value) in attrs.iter() {
        match value {
            Some(v) => s.push_str(&format!(" {}=\"{}\"", key, v)),
            None => s.push_str(&format!(" {}", key)),
        }
    }
    s
}

fn render_head_node(out: &mut String, node: &HeadNode) {
    match node {
        HeadNode::Meta { attrs } => {
            out.push_str(HEAD_INDENT);
            out.push_str(&format!("<meta{} />\n", render_attrs(attrs)));
        }
        HeadNode::Title { source } => {
            out.push_str(HEAD_INDENT);
            match source {
                TitleSource::Literal(text) => out.push_str(&format!("<title>{}</title>\n", text)),
                TitleSource::Prop(name) => out.push_str(&format!("<title>{{{}}}</title>\n", name)),
            }
        }
        HeadNode::Raw { markup } => push_raw(out, markup, HEAD_INDENT),
    }
}

fn render_body_node(out: &mut String, node: &BodyNode) {
    match node {
        BodyNode::Component { name, props } => {
            out.push_str(BODY_INDENT);
            out.push_str(&format!("<{}{} />\n", name, render_component_props(props)));
        }
        BodyNode::Raw { markup } => push_raw(out, markup, BODY_INDENT),
    }
}

/// Strings render as quoted attributes, numbers and booleans as expression
/// props (`count={3}`), matching how the editor writes component usage.
fn render_component_props(props: &[(String, PropValue)]) -> String {
    let mut s = String::new();
    for (name, value) in props {
        match value {
            PropValue::String(_) => s.push_str(&format!(" {}={}", name, value.to_literal())),
            PropValue::Number(_) | PropValue::Bool(_) => {
                s.push_str(&format!(" {}={{{}}}", name, value.to_literal()))
            }
        }
    }
    s
}

fn push_marker_line(out: &mut String, indent: &str, comment: &str) {
    out.push_str(indent);
    out.push_str(comment);
    out.push('\n');
}

/// Emits a raw markup block, re-indented to the region's indent with its
/// internal relative indentation preserved.
fn push_raw(out: &mut String, markup: &str, indent: &str) {
    for line in dedent(markup) {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(indent);
            out.push_str(&line);
            out.push('\n');
        }
    }
}

/// Strips the common leading whitespace of all non-empty lines.
///
/// Counted in characters, not bytes: indentation may contain multi-byte
/// whitespace such as U+00A0, and slicing at a byte offset could land
/// inside a character.
pub(crate) fn dedent(block: &str) -> Vec<String> {
    let lines: Vec<&str> = block.lines().collect();
    let common = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l.chars().skip(common).collect()
            }
        })
        .collect()
}
