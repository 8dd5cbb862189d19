//! Structural validation of compiled or hand-edited layout text.
//!
//! [`validate_astro_layout`] is the sole correctness gate before a layout
//! is persisted: the editor runs it before every save and blocks the save
//! when any check fails. It is pure and never panics; every failure is a
//! human-readable message in the returned report.
//!
//! All checks run independently (no short-circuiting between them), except
//! the forbidden-tag scan, which reports only the first offender across
//! the three editable regions.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markers::{find_region, region_text, regions_of};

static DOCTYPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<!doctype\s+html").unwrap());
static HTML_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<html[\s>]").unwrap());
static HEAD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<head[\s>]").unwrap());
static BODY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<body[\s>]").unwrap());
static SLOT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<slot\s*/?>").unwrap());

/// Structural tags that would corrupt the outer document if pasted into an
/// editable region.
static FORBIDDEN_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?(?:html|head|body)\b").unwrap());

/// The regions a user can paste arbitrary markup into.
const EDITABLE_REGIONS: [&str; 3] = ["head", "pre-content", "post-content"];

/// The outcome of validating one layout text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// True when no check failed.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ok() {
            write!(f, "layout is structurally valid")
        } else {
            write!(f, "{}", self.errors.join("\n"))
        }
    }
}

/// Checks layout text against the structural invariants. All checks are
/// evaluated; messages accumulate in check order.
pub fn validate_astro_layout(text: &str) -> ValidationReport {
    let mut errors = Vec::new();

    if !DOCTYPE_RE.is_match(text) {
        errors.push("Missing document type declaration (<!DOCTYPE html>).".to_string());
    }
    if !HTML_RE.is_match(text) {
        errors.push("Missing root <html> element.".to_string());
    }
    if !HEAD_RE.is_match(text) {
        errors.push("Missing <head> element.".to_string());
    }
    if !BODY_RE.is_match(text) {
        errors.push("Missing <body> element.".to_string());
    }

    let slot_count = SLOT_RE.find_iter(text).count();
    if slot_count != 1 {
        errors.push(format!(
            "Expected exactly one <slot /> placeholder, found {}.",
            slot_count
        ));
    }

    if let Some(message) = find_forbidden_tag(text) {
        errors.push(message);
    }

    ValidationReport { errors }
}

/// Scans the editable regions for structural tags, reporting the first
/// offender only. The same tags outside these regions are the document's
/// own skeleton and are fine.
fn find_forbidden_tag(text: &str) -> Option<String> {
    let regions = regions_of(text);
    for name in EDITABLE_REGIONS {
        let Some(region) = find_region(&regions, name) else {
            continue;
        };
        if let Some(found) = FORBIDDEN_TAG_RE.find(region_text(text, region)) {
            return Some(format!(
                "Forbidden tag {}> inside editable region \"{}\".",
                found.as_str(),
                name
            ));
        }
    }
    None
}
