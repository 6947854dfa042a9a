//! Exsketch CLI library
//!
//! This module contains the core CLI logic: load the configuration, apply a
//! scene file to a sketch builder, and save the resulting document.

pub mod error_adapter;
pub mod scene;

mod args;
mod config;
mod error;

pub use args::Args;
pub use error::CliError;

use std::{fs, path::PathBuf};

use log::info;

use exsketch::SketchBuilder;

use scene::Scene;

/// Run the Exsketch CLI application
///
/// Reads the scene named by `args.input`, builds it with the loaded
/// configuration, and writes the document to `args.output`. Returns the path
/// actually written, which carries the `.excalidraw` extension.
///
/// # Errors
///
/// Returns `CliError` for:
/// - Configuration loading errors
/// - Scene read or parse errors
/// - Invalid elements or references in the scene
/// - Document write errors
pub fn run(args: &Args) -> Result<PathBuf, CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scene"
    );

    let sketch_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input).map_err(|source| CliError::Input {
        path: PathBuf::from(&args.input),
        source,
    })?;
    let scene = Scene::parse(&source)?;

    let mut builder = SketchBuilder::new(sketch_config)?;
    scene.apply(&mut builder)?;

    let path = builder.save(&args.output)?;

    info!(
        output_file = path.display().to_string(),
        elements = builder.len();
        "Sketch exported successfully"
    );

    Ok(path)
}
