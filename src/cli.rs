//! The Lamina command-line interface.
//!
//! The editor application talks to the library directly; this binary is
//! the standalone way to work with layout files on disk. All file I/O
//! lives here — the core functions stay string-in, string-out.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::compiler::compile_astro;
use crate::errors::{print_error, LaminaError};
use crate::parser::parse_astro_to_blueprint;
use crate::validator::validate_astro_layout;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "lamina",
    version,
    about = "Compile, parse, and validate marker-delimited Astro layout files."
)]
pub struct LaminaArgs {
    #[command(subcommand)]
    pub command: ArgsCommand,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum ArgsCommand {
    /// Check a layout file against the structural invariants.
    Validate {
        /// The layout file to validate.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Extract the blueprint from a layout file and print it as JSON.
    Parse {
        /// The layout file to parse.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Parse a layout file and recompile it, normalizing markers and
    /// indentation.
    Normalize {
        /// The layout file to normalize.
        #[arg(required = true)]
        file: PathBuf,
        /// Rewrite the file in place instead of printing to stdout.
        #[arg(long)]
        write: bool,
    },
}

/// The main entry point for the CLI.
pub fn run() {
    let args = LaminaArgs::parse();

    let result = match args.command {
        ArgsCommand::Validate { file } => handle_validate(&file),
        ArgsCommand::Parse { file } => handle_parse(&file),
        ArgsCommand::Normalize { file, write } => handle_normalize(&file, write),
    };

    if let Err(e) = result {
        print_error(e);
        process::exit(1);
    }
}

fn handle_validate(path: &Path) -> Result<(), LaminaError> {
    let text = read_layout(path)?;
    let report = validate_astro_layout(&text);

    let mut stdout = stdout_stream();
    if report.ok() {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        println!("OK: {}", path.display());
        let _ = stdout.reset();
        return Ok(());
    }

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    println!("INVALID: {}", path.display());
    let _ = stdout.reset();
    for error in &report.errors {
        println!("  - {}", error);
    }
    Err(LaminaError::Invalid {
        count: report.errors.len(),
    })
}

fn handle_parse(path: &Path) -> Result<(), LaminaError> {
    let text = read_layout(path)?;
    let blueprint =
        parse_astro_to_blueprint(&text).ok_or_else(|| LaminaError::UnrecognizedFormat {
            path: path.display().to_string(),
        })?;
    println!("{}", serde_json::to_string_pretty(&blueprint)?);
    Ok(())
}

fn handle_normalize(path: &Path, write: bool) -> Result<(), LaminaError> {
    let text = read_layout(path)?;
    let blueprint =
        parse_astro_to_blueprint(&text).ok_or_else(|| LaminaError::UnrecognizedFormat {
            path: path.display().to_string(),
        })?;
    let normalized = compile_astro(&blueprint);

    if write {
        fs::write(path, &normalized).map_err(|source| LaminaError::Write {
            path: path.display().to_string(),
            source,
        })?;
        println!("normalized {}", path.display());
    } else {
        print!("{}", normalized);
    }
    Ok(())
}

fn read_layout(path: &Path) -> Result<String, LaminaError> {
    fs::read_to_string(path).map_err(|source| LaminaError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn stdout_stream() -> StandardStream {
    let choice = if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}
