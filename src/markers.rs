//! Marker grammar and region scanner.
//!
//! Compiled layout files carry machine-readable region markers so the
//! parser and validator can locate every region independently of its
//! contents. Two comment styles exist for the two halves of the file:
//!
//! - frontmatter style, for the `imports` and `props` regions:
//!   `/* lamina:begin name="imports" */` ... `/* lamina:end name="imports" */`
//! - markup style, for `head`, `pre-content`, `post-content`, and the
//!   content slot: `<!-- lamina:begin name="head" -->` ...
//!   `<!-- lamina:end name="head" -->`
//!
//! A slot begin marker may additionally carry a bare `single` flag token.
//!
//! Discovery is a single forward scan over the text producing a flat list
//! of marker tokens, which are then paired into regions. Malformed marker
//! comments are skipped, never an error: hand-edited files degrade to
//! missing regions rather than failing outright.

/// The tag every marker comment carries.
pub const MARKER_TAG: &str = "lamina";

/// The slot-injection placeholder emitted inside the content-slot region.
pub const SLOT_PLACEHOLDER: &str = "<slot />";

/// Region names reserved by the compiler. The content slot is the one
/// markup-style region whose name is caller-chosen.
pub const RESERVED_REGIONS: [&str; 5] = ["imports", "props", "head", "pre-content", "post-content"];

/// A byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Begin,
    End,
}

/// Which comment syntax a marker uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* ... */`, inside the frontmatter fence.
    Frontmatter,
    /// `<!-- ... -->`, inside the document markup.
    Markup,
}

impl CommentStyle {
    fn closer(self) -> &'static str {
        match self {
            CommentStyle::Frontmatter => "*/",
            CommentStyle::Markup => "-->",
        }
    }
}

/// One marker comment found in the text.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub style: CommentStyle,
    pub name: String,
    pub single: bool,
    /// The whole comment, opener through closer.
    pub span: Span,
}

/// A begin/end marker pair and the content between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub single: bool,
    pub style: CommentStyle,
    /// Content bounds: just past the begin comment to the start of the
    /// end comment.
    pub content: Span,
}

/// Renders a begin marker comment (without trailing newline).
pub fn begin_comment(style: CommentStyle, name: &str, single: bool) -> String {
    let flag = if single { " single" } else { "" };
    match style {
        CommentStyle::Frontmatter => {
            format!("/* {}:begin name=\"{}\"{} */", MARKER_TAG, name, flag)
        }
        CommentStyle::Markup => format!("<!-- {}:begin name=\"{}\"{} -->", MARKER_TAG, name, flag),
    }
}

/// Renders an end marker comment (without trailing newline).
pub fn end_comment(style: CommentStyle, name: &str) -> String {
    match style {
        CommentStyle::Frontmatter => format!("/* {}:end name=\"{}\" */", MARKER_TAG, name),
        CommentStyle::Markup => format!("<!-- {}:end name=\"{}\" -->", MARKER_TAG, name),
    }
}

/// Scans `text` once, left to right, collecting every well-formed marker
/// comment. Anything that looks like a marker but fails the grammar is
/// skipped silently.
pub fn scan_markers(text: &str) -> Vec<Marker> {
    let needle = format!("{}:", MARKER_TAG);
    let mut markers = Vec::new();
    let mut pos = 0;

    while let Some(rel) = text[pos..].find(&needle) {
        let tag_at = pos + rel;
        // Resume after this occurrence no matter what; a malformed marker
        // must not stall the scan.
        pos = tag_at + needle.len();

        let Some((style, open_at)) = comment_opener_before(text, tag_at) else {
            continue;
        };

        let rest = &text[tag_at + needle.len()..];
        let (kind, kind_len) = if rest.starts_with("begin") {
            (MarkerKind::Begin, "begin".len())
        } else if rest.starts_with("end") {
            (MarkerKind::End, "end".len())
        } else {
            continue;
        };

        let Some(close_rel) = rest.find(style.closer()) else {
            continue;
        };
        if close_rel < kind_len {
            continue;
        }
        let body = &rest[kind_len..close_rel];
        let Some(name) = attribute_value(body, "name") else {
            continue;
        };
        let single = body.split_whitespace().any(|tok| tok == "single");

        let end = tag_at + needle.len() + close_rel + style.closer().len();
        markers.push(Marker {
            kind,
            style,
            name,
            single,
            span: Span::new(open_at, end),
        });
        pos = end;
    }

    markers
}

/// Pairs each begin marker with the next end marker of the same name.
/// Unmatched markers are dropped.
pub fn pair_regions(markers: &[Marker]) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut consumed = vec![false; markers.len()];

    for (i, begin) in markers.iter().enumerate() {
        if begin.kind != MarkerKind::Begin || consumed[i] {
            continue;
        }
        let found = markers
            .iter()
            .enumerate()
            .skip(i + 1)
            .find(|(j, m)| !consumed[*j] && m.kind == MarkerKind::End && m.name == begin.name);
        let Some((j, end)) = found else {
            continue;
        };
        consumed[i] = true;
        consumed[j] = true;
        regions.push(Region {
            name: begin.name.clone(),
            single: begin.single,
            style: begin.style,
            content: Span::new(begin.span.end, end.span.start),
        });
    }

    regions
}

/// Convenience: scan and pair in one call.
pub fn regions_of(text: &str) -> Vec<Region> {
    pair_regions(&scan_markers(text))
}

/// Finds the first region with the given name.
pub fn find_region<'a>(regions: &'a [Region], name: &str) -> Option<&'a Region> {
    regions.iter().find(|r| r.name == name)
}

/// The raw text between a region's markers.
pub fn region_text<'a>(text: &'a str, region: &Region) -> &'a str {
    &text[region.content.start..region.content.end]
}

/// The comment opener immediately preceding `tag_at`, allowing only
/// whitespace between opener and tag.
fn comment_opener_before(text: &str, tag_at: usize) -> Option<(CommentStyle, usize)> {
    let head = text[..tag_at].trim_end();
    if head.ends_with("<!--") {
        Some((CommentStyle::Markup, head.len() - "<!--".len()))
    } else if head.ends_with("/*") {
        Some((CommentStyle::Frontmatter, head.len() - "/*".len()))
    } else {
        None
    }
}

/// Extracts `key="value"` from a marker body.
fn attribute_value(body: &str, key: &str) -> Option<String> {
    let pattern = format!("{}=\"", key);
    let after = body.split(&pattern).nth(1)?;
    let value = after.split('"').next()?;
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_both_comment_styles() {
        let text = "/* lamina:begin name=\"imports\" */\nimport A from \"a\";\n/* lamina:end name=\"imports\" */\n<!-- lamina:begin name=\"head\" -->\nx\n<!-- lamina:end name=\"head\" -->";
        let markers = scan_markers(text);
        assert_eq!(markers.len(), 4);
        assert_eq!(markers[0].style, CommentStyle::Frontmatter);
        assert_eq!(markers[0].name, "imports");
        assert_eq!(markers[2].style, CommentStyle::Markup);
        assert_eq!(markers[2].name, "head");
    }

    #[test]
    fn pairs_content_between_markers() {
        let text = "<!-- lamina:begin name=\"head\" -->\nhello\n<!-- lamina:end name=\"head\" -->";
        let regions = regions_of(text);
        assert_eq!(regions.len(), 1);
        assert_eq!(region_text(text, &regions[0]).trim(), "hello");
    }

    #[test]
    fn single_flag_is_recovered() {
        let text = "<!-- lamina:begin name=\"default\" single -->\n<slot />\n<!-- lamina:end name=\"default\" -->";
        let regions = regions_of(text);
        assert_eq!(regions.len(), 1);
        assert!(regions[0].single);
        assert_eq!(regions[0].name, "default");
    }

    #[test]
    fn malformed_markers_are_skipped() {
        let text = "lamina:begin name=\"x\"\n<!-- lamina:begin -->\n<!-- lamina:begin name=\"ok\" -->\n<!-- lamina:end name=\"ok\" -->";
        let regions = regions_of(text);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "ok");
    }

    #[test]
    fn unmatched_begin_is_dropped() {
        let text = "<!-- lamina:begin name=\"a\" -->\n<!-- lamina:begin name=\"b\" -->\n<!-- lamina:end name=\"b\" -->";
        let regions = regions_of(text);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "b");
    }

    #[test]
    fn rendered_comments_scan_back() {
        let begin = begin_comment(CommentStyle::Markup, "pre-content", false);
        let end = end_comment(CommentStyle::Markup, "pre-content");
        let text = format!("{}\nstuff\n{}", begin, end);
        let regions = regions_of(&text);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "pre-content");
        assert!(!regions[0].single);
    }
}
