//! Lamina: a blueprint round-trip engine for Astro layout files.
//!
//! A layout lives in two forms. Editors work on a structured
//! [`LayoutBlueprint`] (imports, typed props, head nodes, body regions,
//! one content slot); repositories store the compiled text form, an Astro
//! component file with embedded machine-readable region markers. This
//! crate owns the translation between the two:
//!
//! - [`compile_astro`] renders a blueprint into deterministic layout text,
//! - [`parse_astro_to_blueprint`] recovers a blueprint from layout text
//!   (`None` for files that are not blueprint-compatible),
//! - [`validate_astro_layout`] checks text against the structural
//!   invariants before it is persisted.
//!
//! All three are pure, synchronous text transformations with no I/O and no
//! shared state; they can be called concurrently without coordination.
//! Compile and parse are near-inverses: compile → parse → compile is
//! idempotent at the text level.

pub use crate::blueprint::{
    AttrList, BodyNode, ContentSlot, HeadNode, ImportSpec, LayoutBlueprint, PropMap, PropSpec,
    PropType, PropValue, TitleSource,
};
pub use crate::compiler::compile_astro;
pub use crate::errors::LaminaError;
pub use crate::parser::parse_astro_to_blueprint;
pub use crate::validator::{validate_astro_layout, ValidationReport};

pub mod blueprint;
pub mod cli;
pub mod compiler;
pub mod errors;
pub mod markers;
pub mod parser;
pub mod validator;
