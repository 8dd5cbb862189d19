// tests/validator_tests.rs

use lamina::compiler::compile_astro;
use lamina::validator::validate_astro_layout;
use lamina::{BodyNode, HeadNode, ImportSpec, LayoutBlueprint, PropSpec, PropType, PropValue};

fn golden_text() -> String {
    let mut blueprint = LayoutBlueprint::new("Golden Layout");
    blueprint.imports = vec![
        ImportSpec::new("Header", "../components/Header.astro"),
        ImportSpec::new("Footer", "../components/Footer.astro"),
    ];
    blueprint.props.insert(
        "title",
        PropSpec::with_default(
            PropType::String,
            PropValue::String("My Awesome Site".to_string()),
        ),
    );
    blueprint.head = vec![HeadNode::raw("<meta charset=\"utf-8\" />")];
    blueprint.pre_content = vec![BodyNode::component("Header")];
    blueprint.post_content = vec![BodyNode::component("Footer")];
    compile_astro(&blueprint)
}

#[test]
fn golden_text_validates_clean() {
    let report = validate_astro_layout(&golden_text());
    assert!(report.ok(), "unexpected errors: {:?}", report.errors);
    assert!(report.errors.is_empty());
}

#[test]
fn removing_the_slot_placeholder_fails_with_exactly_one() {
    let text = golden_text().replace("<slot />", "");
    let report = validate_astro_layout(&text);
    assert!(!report.ok());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("exactly one"));
    assert!(report.errors[0].contains("slot"));
    assert!(report.errors[0].contains("0"));
}

#[test]
fn duplicating_the_slot_placeholder_fails_with_exactly_one() {
    let text = golden_text().replace("<slot />", "<slot />\n    <slot />");
    let report = validate_astro_layout(&text);
    assert!(!report.ok());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("exactly one"));
    assert!(report.errors[0].contains("2"));
}

#[test]
fn html_tag_injected_into_pre_content_is_forbidden() {
    let text = golden_text().replace("<Header />", "<html>\n    <Header />\n    </html>");
    let report = validate_astro_layout(&text);
    assert!(!report.ok());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("Forbidden tag"));
    assert!(report.errors[0].contains("pre-content"));
}

#[test]
fn body_tag_injected_into_head_region_is_forbidden() {
    let text = golden_text().replace(
        "<meta charset=\"utf-8\" />",
        "<body class=\"oops\"></body>",
    );
    let report = validate_astro_layout(&text);
    assert!(!report.ok());
    assert!(report.errors[0].contains("Forbidden tag"));
    assert!(report.errors[0].contains("head"));
}

#[test]
fn structural_tags_outside_editable_regions_are_fine() {
    // The document's own <html>/<head>/<body> skeleton must not trip the
    // forbidden-tag check.
    let report = validate_astro_layout(&golden_text());
    assert!(report.ok());
}

#[test]
fn only_the_first_forbidden_tag_is_reported() {
    let text = golden_text()
        .replace("<Header />", "<html></html>")
        .replace("<Footer />", "<body></body>");
    let report = validate_astro_layout(&text);
    let forbidden: Vec<_> = report
        .errors
        .iter()
        .filter(|e| e.contains("Forbidden tag"))
        .collect();
    assert_eq!(forbidden.len(), 1);
    assert!(forbidden[0].contains("pre-content"));
}

#[test]
fn missing_structural_elements_each_report_independently() {
    let report = validate_astro_layout("");
    assert!(!report.ok());
    assert_eq!(report.errors.len(), 5);
    assert!(report.errors[0].contains("document type"));
    assert!(report.errors[1].contains("<html>"));
    assert!(report.errors[2].contains("<head>"));
    assert!(report.errors[3].contains("<body>"));
    assert!(report.errors[4].contains("exactly one"));
}

#[test]
fn missing_doctype_alone_is_the_only_error() {
    let text = golden_text().replace("<!DOCTYPE html>\n", "");
    let report = validate_astro_layout(&text);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("document type"));
}

#[test]
fn header_component_does_not_trip_the_head_tag_check() {
    // <Header /> shares a prefix with <head> apart from case; the
    // forbidden-tag scan must not confuse them, nor flag <header>.
    let text = golden_text().replace("<Footer />", "<header>x</header>");
    let report = validate_astro_layout(&text);
    assert!(report.ok(), "unexpected errors: {:?}", report.errors);
}

#[test]
fn validator_never_panics_on_garbage() {
    for text in ["", "<", "<!--", "lamina:begin", "<slot", "\u{0}\u{1}"] {
        let _ = validate_astro_layout(text);
    }
}
