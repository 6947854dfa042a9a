//! Error type for the CLI.

use std::{io, path::PathBuf};

use thiserror::Error;

use exsketch::SketchError;

use crate::{config::ConfigError, scene::SceneError};

/// Everything that can stop a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Sketch(#[from] SketchError),

    #[error("Failed to read scene {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
