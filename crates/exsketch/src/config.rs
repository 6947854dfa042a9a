//! Configuration types for sketch building.
//!
//! [`SketchConfig`] controls the document metadata, custom style defaults and
//! whether identifiers and seeds are random or reproducible. It implements
//! [`serde::Deserialize`] with every field optional, so it can be loaded from
//! a partial TOML or JSON file.
//!
//! # Example
//!
//! ```
//! # use exsketch::config::SketchConfig;
//! # use exsketch::style::Style;
//! let config = SketchConfig::default()
//!     .with_seed(42)
//!     .with_defaults(Style::new().with("roughness", 0));
//!
//! assert_eq!(config.seed(), Some(42));
//! assert_eq!(config.background_color(), "#ffffff");
//! ```

use serde::Deserialize;

use exsketch_core::style::Style;

/// Value of the document `source` field unless configured otherwise.
pub const DEFAULT_SOURCE: &str = "exsketch";

/// Canvas background unless configured otherwise.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_background_color() -> String {
    DEFAULT_BACKGROUND_COLOR.to_string()
}

/// Top-level sketch configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SketchConfig {
    /// Value written to the document's `source` field.
    #[serde(default = "default_source")]
    source: String,

    /// Canvas background color, as a CSS color string.
    #[serde(default = "default_background_color")]
    background_color: String,

    /// Editor grid size, or `None` for no grid.
    #[serde(default)]
    grid_size: Option<u32>,

    /// When set, identifiers are sequential and element seeds are drawn from
    /// an RNG seeded with this value, so the same program always produces the
    /// same document.
    #[serde(default)]
    seed: Option<u64>,

    /// Custom style defaults layered over the built-in profiles.
    #[serde(default)]
    defaults: Style,
}

impl SketchConfig {
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn with_grid_size(mut self, grid_size: Option<u32>) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_defaults(mut self, defaults: Style) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn grid_size(&self) -> Option<u32> {
        self.grid_size
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the custom style defaults.
    pub fn defaults(&self) -> &Style {
        &self.defaults
    }
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            background_color: default_background_color(),
            grid_size: None,
            seed: None,
            defaults: Style::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SketchConfig::default();
        assert_eq!(config.source(), DEFAULT_SOURCE);
        assert_eq!(config.background_color(), DEFAULT_BACKGROUND_COLOR);
        assert_eq!(config.grid_size(), None);
        assert_eq!(config.seed(), None);
        assert!(config.defaults().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: SketchConfig = serde_json::from_str(
            r##"{ "grid_size": 20, "defaults": { "strokeColor": "#1971c2" } }"##,
        )
        .unwrap();

        assert_eq!(config.grid_size(), Some(20));
        assert_eq!(config.source(), DEFAULT_SOURCE);
        assert_eq!(
            config.defaults().get("strokeColor").and_then(|v| v.as_str()),
            Some("#1971c2")
        );
    }

    #[test]
    fn test_deserialize_rejects_unknown_field() {
        let result: Result<SketchConfig, _> = serde_json::from_str(r#"{ "colour": "red" }"#);
        assert!(result.is_err());
    }
}
