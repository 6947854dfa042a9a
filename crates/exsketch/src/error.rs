//! Error types for Exsketch operations.
//!
//! This module provides the main error type [`SketchError`] which wraps the
//! failures that can occur while building or saving a sketch. Every builder
//! operation validates its input before registering anything, so an error
//! never leaves a half-built element behind.

use std::io;

use thiserror::Error;

use exsketch_core::{
    element::GeometryError,
    identifier::{ElementId, GroupId},
    style::StyleError,
};

/// The main error type for Exsketch operations.
#[derive(Debug, Error)]
pub enum SketchError {
    /// An unknown style key or malformed style value, either in the builder
    /// configuration or in a per-call override.
    #[error("Configuration error: {0}")]
    Configuration(#[from] StyleError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),

    #[error("Unknown group: {0}")]
    UnknownGroup(GroupId),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
