//! Errors for the CLI boundary.
//!
//! The core triad never throws: the parser signals an unrecognized file
//! with `None` and the validator accumulates plain messages. `LaminaError`
//! exists for the layer that touches the filesystem and has to explain
//! failures to a person, with miette codes and help text.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum LaminaError {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(lamina::io::read))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}'")]
    #[diagnostic(code(lamina::io::write))]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not a blueprint-compatible layout")]
    #[diagnostic(
        code(lamina::parse::unrecognized),
        help("No content-slot marker was found. This file cannot be opened in the visual editor; edit it as raw text instead.")
    )]
    UnrecognizedFormat { path: String },

    #[error("layout failed validation with {count} error(s)")]
    #[diagnostic(
        code(lamina::validate::structural),
        help("Fix the reported structural problems before saving the layout.")
    )]
    Invalid { count: usize },

    #[error("failed to encode blueprint as JSON")]
    #[diagnostic(code(lamina::json::encode))]
    Json(#[from] serde_json::Error),
}

/// Prints a LaminaError with full miette diagnostics.
///
/// Use this for user-facing error display in CLI contexts.
pub fn print_error(error: LaminaError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
