//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! This module provides the bridge between the CLI's standard error types and
//! miette's rich diagnostic formatting. Scene syntax errors carry the scene
//! source and point at the offending span; every other error gets a code and,
//! where the fix is predictable, a help line.

use std::fmt;

use miette::{Diagnostic, LabeledSpan, SourceSpan};

use exsketch::SketchError;

use crate::{CliError, config::ConfigError, scene::SceneError};

/// Adapter rendering a [`CliError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

fn sketch_code(err: &SketchError) -> &'static str {
    match err {
        SketchError::Configuration(_) => "exsketch::style",
        SketchError::Geometry(_) => "exsketch::geometry",
        SketchError::UnknownElement(_) | SketchError::UnknownGroup(_) => "exsketch::reference",
        SketchError::Io(_) => "exsketch::io",
        SketchError::Serialize(_) => "exsketch::serialize",
    }
}

fn sketch_help(err: &SketchError) -> Option<&'static str> {
    match err {
        SketchError::Configuration(_) => Some(
            "style keys use the editor's camelCase names, e.g. strokeColor, fillStyle or fontSize",
        ),
        SketchError::Geometry(_) => Some(
            "sizes and padding must be non-negative, and bound elements need distinct centers",
        ),
        _ => None,
    }
}

impl Diagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Config(_) => "exsketch::config",
            CliError::Input { .. } => "exsketch::io",
            CliError::Scene(SceneError::Element { source, .. }) => sketch_code(source),
            CliError::Scene(_) => "exsketch::scene",
            CliError::Sketch(err) => sketch_code(err),
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Config(ConfigError::MissingFile(_)) => {
                Some("pass an existing file to --config, or omit it to use the defaults")
            }
            CliError::Config(ConfigError::Parse { .. }) => Some(
                "known fields are source, background_color, grid_size, seed and [defaults]",
            ),
            CliError::Scene(SceneError::UnknownName { .. }) => {
                Some("elements must be named with `name = \"...\"` before they are referenced")
            }
            CliError::Scene(SceneError::DuplicateName(_)) => {
                Some("element names must be unique within a scene")
            }
            CliError::Scene(SceneError::Element { source, .. }) => sketch_help(source),
            CliError::Sketch(err) => sketch_help(err),
            _ => None,
        };
        help.map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            CliError::Scene(SceneError::Parse { src, .. }) => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self.0 {
            CliError::Scene(SceneError::Parse {
                message,
                span: Some(span),
                ..
            }) => {
                let span = SourceSpan::from(span.clone());
                Some(Box::new(std::iter::once(
                    LabeledSpan::new_primary_with_span(Some(message.clone()), span),
                )))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use exsketch::{element::GeometryError, identifier::ElementId};

    use super::*;
    use crate::scene::Scene;

    #[test]
    fn test_parse_error_points_at_source() {
        let err = CliError::from(Scene::parse("[[shape]]\nx = \"left\"\n").unwrap_err());
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "exsketch::scene");
        assert!(adapter.source_code().is_some());

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
    }

    #[test]
    fn test_missing_config_has_help() {
        let err = CliError::from(ConfigError::MissingFile(PathBuf::from("nope.toml")));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "exsketch::config");
        assert!(adapter.help().is_some());
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_element_error_uses_sketch_code() {
        let err = CliError::from(SceneError::Element {
            entry: "`a`".to_string(),
            source: SketchError::Geometry(GeometryError::InvalidPadding(-1.0)),
        });
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "exsketch::geometry");
        assert!(adapter.help().is_some());
    }

    #[test]
    fn test_display_passes_through() {
        let err = CliError::from(SketchError::UnknownElement(ElementId::new("ghost")));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.to_string(), "Unknown element: ghost");
        assert_eq!(adapter.code().unwrap().to_string(), "exsketch::reference");
        assert!(adapter.help().is_none());
    }
}
