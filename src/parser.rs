//! Layout text → blueprint parser.
//!
//! [`parse_astro_to_blueprint`] is the editor's "is this file one of ours"
//! gate: it returns `None` when the text carries no content-slot marker,
//! since arbitrary component files may share no other structure with a
//! compiled layout. Everything past the gate degrades gracefully — a
//! missing region becomes an empty collection, an unparseable props marker
//! is ignored, an import line that doesn't match the grammar is dropped.
//! Hand-edited files should yield a best-effort blueprint, not a crash.
//!
//! Prop types are recovered with two-tier precedence: the JSON props
//! marker is authoritative, and a destructure-line scan fills in any keys
//! the marker doesn't know about. Hand-added bindings therefore survive a
//! parse even when the marker was not updated, and recompiling regenerates
//! a consistent marker from the merged map.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::blueprint::{
    AttrList, BodyNode, ContentSlot, HeadNode, ImportSpec, LayoutBlueprint, PropMap, PropSpec,
    PropType, PropValue,
};
use crate::compiler::dedent;
use crate::markers::{
    find_region, region_text, regions_of, CommentStyle, Region, RESERVED_REGIONS,
};

/// The blueprint name is not recoverable from compiled text; parsed
/// blueprints all carry this placeholder. Callers that need a human name
/// must track it out-of-band.
pub const PARSED_BLUEPRINT_NAME: &str = "Imported Layout";

static SLOT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<slot\s*/?>").unwrap());

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^import\s+([A-Za-z_$][\w$]*)\s+from\s+"([^"]+)"\s*;?\s*$"#).unwrap()
});

static FRONTMATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^---\r?\n(.*?)\r?\n---").unwrap());

static DESTRUCTURE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"const\s*\{([^}]*)\}\s*=\s*Astro\.props").unwrap());

static BINDING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([A-Za-z_$][\w$]*)\s*(?:=\s*("(?:[^"\\]|\\.)*"|-?\d+(?:\.\d+)?|true|false))?$"#)
        .unwrap()
});

static HTML_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<html\b([^>]*)>").unwrap());

static ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z_:][\w:.-]*)(?:="([^"]*)")?"#).unwrap());

static META_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<meta\b\s*(.*?)\s*/?>$").unwrap());

static TITLE_PROP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<title>\{\s*([A-Za-z_$][\w$]*)\s*\}</title>$").unwrap());

static TITLE_LIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<title>(.*)</title>$").unwrap());

static COMPONENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<([A-Z][A-Za-z0-9_]*)\b\s*(.*?)\s*/>$").unwrap());

static COMPONENT_PROP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][\w-]*)=(?:"((?:[^"\\]|\\.)*)"|\{\s*([^}]*?)\s*\})"#).unwrap()
});

/// Extracts a blueprint from previously-compiled (or hand-authored,
/// marker-annotated) layout text. Returns `None` when the text has no
/// content-slot marker and is therefore not blueprint-compatible.
pub fn parse_astro_to_blueprint(text: &str) -> Option<LayoutBlueprint> {
    let regions = regions_of(text);

    // The slot is the one markup-style region with a caller-chosen name
    // that wraps a slot placeholder. Slot-count enforcement belongs to the
    // validator; the parser tolerantly takes the first.
    let slot_region = regions.iter().find(|r| {
        r.style == CommentStyle::Markup
            && !RESERVED_REGIONS.contains(&r.name.as_str())
            && SLOT_RE.is_match(region_text(text, r))
    })?;

    let mut blueprint = LayoutBlueprint::new(PARSED_BLUEPRINT_NAME);
    blueprint.content_slot = ContentSlot {
        name: slot_region.name.clone(),
        single: slot_region.single,
    };

    if let Some(region) = find_region(&regions, "imports") {
        blueprint.imports = parse_imports(region_text(text, region));
    }

    blueprint.props = parse_props(text, &regions);

    if let Some(attrs) = parse_html_attrs(text) {
        blueprint.html_attrs = attrs;
    }

    if let Some(region) = find_region(&regions, "head") {
        blueprint.head = parse_head_region(region_text(text, region));
    }
    if let Some(region) = find_region(&regions, "pre-content") {
        blueprint.pre_content = parse_body_region(region_text(text, region));
    }
    if let Some(region) = find_region(&regions, "post-content") {
        blueprint.post_content = parse_body_region(region_text(text, region));
    }

    Some(blueprint)
}

/// Matches each line against the `import X from "path";` grammar.
/// Non-matching lines are dropped.
fn parse_imports(content: &str) -> Vec<ImportSpec> {
    content
        .lines()
        .filter_map(|line| {
            let caps = IMPORT_RE.captures(line.trim())?;
            Some(ImportSpec::new(&caps[1], &caps[2]))
        })
        .collect()
}

/// Two-tier props recovery: JSON marker entries win, destructure-scan
/// entries fill the gaps.
fn parse_props(text: &str, regions: &[Region]) -> PropMap {
    let mut props = find_region(regions, "props")
        .and_then(|region| parse_props_marker(region_text(text, region)))
        .unwrap_or_default();
    props.merge_missing(scan_destructure(frontmatter_of(text)));
    props
}

/// Reads the JSON payload out of the props marker region. The payload sits
/// inside its own block comment; an unparseable payload yields `None`.
fn parse_props_marker(content: &str) -> Option<PropMap> {
    let payload: String = content
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches("/*")
                .trim_end_matches("*/")
                .trim()
        })
        .collect::<Vec<_>>()
        .join("");
    serde_json::from_str(&payload).ok()
}

fn frontmatter_of(text: &str) -> &str {
    FRONTMATTER_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text)
}

/// Infers a `PropSpec` per destructured binding from the literal type of
/// its default. Bindings without a default infer `string` with no default.
///
/// Each comma-separated segment must match the binding grammar as a
/// whole; a binding with an unrepresentable default (`items = null`,
/// `tags = []`) is dropped rather than misread as extra bindings.
fn scan_destructure(frontmatter: &str) -> PropMap {
    let Some(caps) = DESTRUCTURE_RE.captures(frontmatter) else {
        return PropMap::new();
    };
    let mut props = PropMap::new();
    for segment in split_bindings(&caps[1]) {
        let Some(binding) = BINDING_RE.captures(segment.trim()) else {
            continue;
        };
        let name = binding[1].to_string();
        let spec = match binding.get(2) {
            Some(lit) => match infer_literal(lit.as_str()) {
                Some(value) => PropSpec::with_default(value.prop_type(), value),
                None => continue,
            },
            None => PropSpec::new(PropType::String),
        };
        props.insert(name, spec);
    }
    props
}

/// Splits a destructure body on commas outside string literals, so a
/// string default containing a comma stays in one segment.
fn split_bindings(body: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in body.chars() {
        match c {
            '\\' if in_string && !escaped => {
                current.push(c);
                escaped = true;
                continue;
            }
            '"' if !escaped => {
                in_string = !in_string;
                current.push(c);
            }
            ',' if !in_string => {
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
        escaped = false;
    }
    segments.push(current);
    segments
}

/// `string` if quoted, `boolean` if `true`/`false`, `number` if a numeric
/// literal.
fn infer_literal(lit: &str) -> Option<PropValue> {
    if lit.starts_with('"') {
        return serde_json::from_str::<String>(lit)
            .ok()
            .map(PropValue::String);
    }
    match lit {
        "true" => Some(PropValue::Bool(true)),
        "false" => Some(PropValue::Bool(false)),
        _ => lit.parse::<f64>().ok().map(PropValue::Number),
    }
}

/// Locates the root element's opening tag anywhere in the document and
/// splits its attribute list.
fn parse_html_attrs(text: &str) -> Option<AttrList> {
    let caps = HTML_OPEN_RE.captures(text)?;
    Some(parse_attr_list(&caps[1]))
}

fn parse_attr_list(fragment: &str) -> AttrList {
    ATTR_RE
        .captures_iter(fragment)
        .map(|caps| {
            let key = caps[1].to_string();
            let value = caps.get(2).map(|m| m.as_str().to_string());
            (key, value)
        })
        .collect()
}

/// Decomposes a head region into meta / title / raw nodes. Consecutive
/// unrecognized lines collapse into a single raw node.
fn parse_head_region(content: &str) -> Vec<HeadNode> {
    let mut nodes = Vec::new();
    let mut raw_run: Vec<&str> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            // A blank line inside a raw run is part of the markup; one
            // between nodes is formatting and drops.
            if !raw_run.is_empty() {
                raw_run.push(line);
            }
            continue;
        }
        if let Some(caps) = META_RE.captures(trimmed) {
            flush_raw(&mut raw_run, &mut nodes, |markup| HeadNode::Raw { markup });
            nodes.push(HeadNode::Meta {
                attrs: parse_attr_list(&caps[1]),
            });
        } else if let Some(caps) = TITLE_PROP_RE.captures(trimmed) {
            flush_raw(&mut raw_run, &mut nodes, |markup| HeadNode::Raw { markup });
            nodes.push(HeadNode::title_prop(&caps[1]));
        } else if let Some(caps) = TITLE_LIT_RE.captures(trimmed) {
            flush_raw(&mut raw_run, &mut nodes, |markup| HeadNode::Raw { markup });
            nodes.push(HeadNode::title_literal(&caps[1]));
        } else {
            raw_run.push(line);
        }
    }
    flush_raw(&mut raw_run, &mut nodes, |markup| HeadNode::Raw { markup });
    nodes
}

/// Decomposes a body region into component / raw nodes. Self-closing
/// `<Identifier ... />` tags become components; everything else collects
/// into raw runs.
fn parse_body_region(content: &str) -> Vec<BodyNode> {
    let mut nodes = Vec::new();
    let mut raw_run: Vec<&str> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !raw_run.is_empty() {
                raw_run.push(line);
            }
            continue;
        }
        if let Some(caps) = COMPONENT_RE.captures(trimmed) {
            flush_raw(&mut raw_run, &mut nodes, |markup| BodyNode::Raw { markup });
            nodes.push(BodyNode::Component {
                name: caps[1].to_string(),
                props: parse_component_props(&caps[2]),
            });
        } else {
            raw_run.push(line);
        }
    }
    flush_raw(&mut raw_run, &mut nodes, |markup| BodyNode::Raw { markup });
    nodes
}

fn parse_component_props(fragment: &str) -> Vec<(String, PropValue)> {
    COMPONENT_PROP_RE
        .captures_iter(fragment)
        .filter_map(|caps| {
            let name = caps[1].to_string();
            let value = if let Some(quoted) = caps.get(2) {
                serde_json::from_str::<String>(&format!("\"{}\"", quoted.as_str()))
                    .map(PropValue::String)
                    .unwrap_or_else(|_| PropValue::String(quoted.as_str().to_string()))
            } else {
                infer_literal(caps.get(3)?.as_str())?
            };
            Some((name, value))
        })
        .collect()
}

/// Drains accumulated raw lines into one node, dedented so the compiler
/// can re-indent cleanly on the way back out. Blank lines trailing the
/// run are formatting, not markup, and are trimmed off.
fn flush_raw<N>(raw_run: &mut Vec<&str>, nodes: &mut Vec<N>, make: impl FnOnce(String) -> N) {
    while raw_run.last().map_or(false, |l| l.trim().is_empty()) {
        raw_run.pop();
    }
    if raw_run.is_empty() {
        return;
    }
    let markup = dedent(&raw_run.join("\n")).join("\n");
    raw_run.clear();
    nodes.push(make(markup));
}
