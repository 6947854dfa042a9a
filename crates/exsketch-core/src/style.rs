//! Style property bags and per-family default profiles.
//!
//! Excalidraw elements carry a flat set of styling properties (`strokeColor`,
//! `fillStyle`, `roughness`, ...). This module models them as an ordered
//! [`Style`] map of JSON values, and groups the recognized keys into three
//! [`StyleFamily`] profiles:
//!
//! | Family | Used by | Keys |
//! |--------|---------|------|
//! | [`StyleFamily::Box`] | rectangle, diamond, ellipse | the shared base keys |
//! | [`StyleFamily::Line`] | line, arrow | base keys + arrowheads, `lastCommittedPoint` |
//! | [`StyleFamily::Text`] | text | base keys + font and alignment keys |
//!
//! The line and text profiles are layered over the box profile, so a custom
//! default for a base key such as `strokeColor` affects every family.
//!
//! # Validation
//!
//! [`StyleProfiles::resolve`] merges per-call overrides over a family's
//! defaults. Keys the family does not know are rejected with
//! [`StyleError::UnknownKey`], and values are checked with
//! [`validate_value`]: colors must parse, enumerations must name a known
//! variant, and numeric keys must hold numbers in range.
//!
//! ```
//! use exsketch_core::style::{Style, StyleFamily, StyleProfiles};
//!
//! let profiles = StyleProfiles::standard();
//! let overrides = Style::new().with("strokeColor", "#e03131");
//!
//! let resolved = profiles.resolve(StyleFamily::Box, &overrides).unwrap();
//! assert_eq!(resolved.get("strokeColor").unwrap(), "#e03131");
//! assert_eq!(resolved.get("opacity").unwrap(), 100);
//!
//! // Text keys are not valid on a rectangle.
//! let bad = Style::new().with("fontSize", 16);
//! assert!(profiles.resolve(StyleFamily::Box, &bad).is_err());
//! ```

use std::fmt;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::{color::parse_color, element::Arrowhead};

pub const ANGLE: &str = "angle";
pub const STROKE_COLOR: &str = "strokeColor";
pub const BACKGROUND_COLOR: &str = "backgroundColor";
pub const FILL_STYLE: &str = "fillStyle";
pub const STROKE_WIDTH: &str = "strokeWidth";
pub const STROKE_STYLE: &str = "strokeStyle";
pub const ROUGHNESS: &str = "roughness";
pub const OPACITY: &str = "opacity";
pub const ROUNDNESS: &str = "roundness";
pub const LINK: &str = "link";
pub const LOCKED: &str = "locked";

pub const START_ARROWHEAD: &str = "startArrowhead";
pub const END_ARROWHEAD: &str = "endArrowhead";
pub const LAST_COMMITTED_POINT: &str = "lastCommittedPoint";

pub const FONT_SIZE: &str = "fontSize";
pub const FONT_FAMILY: &str = "fontFamily";
pub const TEXT_ALIGN: &str = "textAlign";
pub const VERTICAL_ALIGN: &str = "verticalAlign";
pub const LINE_HEIGHT: &str = "lineHeight";
pub const CONTAINER_ID: &str = "containerId";

const FILL_STYLES: &[&str] = &[
    "hachure",
    "cross-hatch",
    "solid",
    "zigzag",
    "dots",
    "dashed",
    "zigzag-line",
];
const STROKE_STYLES: &[&str] = &["solid", "dashed", "dotted"];
const TEXT_ALIGNS: &[&str] = &["left", "center", "right"];
const VERTICAL_ALIGNS: &[&str] = &["top", "middle", "bottom"];

/// The three families of elements that share a style profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleFamily {
    /// Rectangles, diamonds and ellipses.
    Box,
    /// Lines and arrows.
    Line,
    /// Text.
    Text,
}

impl fmt::Display for StyleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Box => "box",
            Self::Line => "line",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

/// Errors raised while building or resolving styles.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("style key `{key}` is not recognized for {family} elements")]
    UnknownKey { key: String, family: StyleFamily },

    #[error("default style key `{key}` is not used by any element family")]
    UnusedDefault { key: String },

    #[error("invalid value for style key `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// An ordered bag of style properties.
///
/// Keys keep insertion order so exported documents are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style {
    entries: IndexMap<String, Value>,
}

impl Style {
    /// Creates an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this style with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the numeric value of `key` as `f32`, if present and numeric.
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(Value::as_f64).map(|v| v as f32)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a copy of this style with `overrides` layered on top.
    ///
    /// Keys present in both take the override's value; new keys are appended.
    pub fn merged(&self, overrides: &Style) -> Style {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            merged.insert(key, value.clone());
        }
        merged
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Style {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Default style profiles for the three element families.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleProfiles {
    boxed: Style,
    line: Style,
    text: Style,
}

impl StyleProfiles {
    /// Returns the built-in profiles.
    pub fn standard() -> Self {
        let boxed = Style::new()
            .with(ANGLE, 0)
            .with(STROKE_COLOR, "#000000")
            .with(BACKGROUND_COLOR, "transparent")
            .with(FILL_STYLE, "hachure")
            .with(STROKE_WIDTH, 1)
            .with(STROKE_STYLE, "solid")
            .with(ROUGHNESS, 1)
            .with(OPACITY, 100)
            .with(ROUNDNESS, Value::Null)
            .with(LINK, Value::Null)
            .with(LOCKED, false);

        let line = boxed.merged(
            &Style::new()
                .with(ROUNDNESS, json!({ "type": 2 }))
                .with(START_ARROWHEAD, Value::Null)
                .with(END_ARROWHEAD, Value::Null)
                .with(LAST_COMMITTED_POINT, Value::Null),
        );

        let text = boxed.merged(
            &Style::new()
                .with(FONT_SIZE, 20)
                .with(FONT_FAMILY, 1)
                .with(TEXT_ALIGN, "center")
                .with(VERTICAL_ALIGN, "middle")
                .with(LINE_HEIGHT, 1.25)
                .with(CONTAINER_ID, Value::Null),
        );

        Self { boxed, line, text }
    }

    /// Returns the built-in profiles with `custom` defaults applied.
    ///
    /// Each custom key is written into every profile that already knows it.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::UnusedDefault`] if a key is not part of any
    /// profile, or [`StyleError::InvalidValue`] if its value is malformed.
    pub fn with_custom_defaults(custom: &Style) -> Result<Self, StyleError> {
        let mut profiles = Self::standard();

        for (key, value) in custom.iter() {
            validate_value(key, value)?;

            let mut used = false;
            for profile in [&mut profiles.boxed, &mut profiles.line, &mut profiles.text] {
                if profile.contains_key(key) {
                    profile.insert(key, value.clone());
                    used = true;
                }
            }

            if !used {
                return Err(StyleError::UnusedDefault {
                    key: key.to_string(),
                });
            }
            debug!(key; "Applied custom style default");
        }

        Ok(profiles)
    }

    /// Returns the default profile of `family`.
    pub fn profile(&self, family: StyleFamily) -> &Style {
        match family {
            StyleFamily::Box => &self.boxed,
            StyleFamily::Line => &self.line,
            StyleFamily::Text => &self.text,
        }
    }

    /// Layers `overrides` over the defaults of `family`.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::UnknownKey`] for a key outside the family's
    /// profile and [`StyleError::InvalidValue`] for a malformed value.
    pub fn resolve(&self, family: StyleFamily, overrides: &Style) -> Result<Style, StyleError> {
        let profile = self.profile(family);

        for (key, value) in overrides.iter() {
            if !profile.contains_key(key) {
                return Err(StyleError::UnknownKey {
                    key: key.to_string(),
                    family,
                });
            }
            validate_value(key, value)?;
        }

        Ok(profile.merged(overrides))
    }
}

impl Default for StyleProfiles {
    fn default() -> Self {
        Self::standard()
    }
}

/// Checks that `value` is acceptable for the style key `key`.
///
/// Keys without a known constraint are accepted as-is.
pub fn validate_value(key: &str, value: &Value) -> Result<(), StyleError> {
    let invalid = |reason: String| StyleError::InvalidValue {
        key: key.to_string(),
        reason,
    };

    match key {
        STROKE_COLOR | BACKGROUND_COLOR => {
            let color = value
                .as_str()
                .ok_or_else(|| invalid(format!("expected a color string, got {value}")))?;
            parse_color(color).map_err(invalid)?;
        }
        FILL_STYLE => one_of(value, FILL_STYLES).map_err(invalid)?,
        STROKE_STYLE => one_of(value, STROKE_STYLES).map_err(invalid)?,
        TEXT_ALIGN => one_of(value, TEXT_ALIGNS).map_err(invalid)?,
        VERTICAL_ALIGN => one_of(value, VERTICAL_ALIGNS).map_err(invalid)?,
        OPACITY => number_in(value, 0.0, 100.0).map_err(invalid)?,
        STROKE_WIDTH | ROUGHNESS => number_in(value, 0.0, f64::MAX).map_err(invalid)?,
        FONT_SIZE | LINE_HEIGHT => {
            number_in(value, f64::MIN_POSITIVE, f64::MAX).map_err(invalid)?
        }
        ANGLE => number_in(value, f64::MIN, f64::MAX).map_err(invalid)?,
        FONT_FAMILY => match value.as_u64() {
            Some(family) if family >= 1 => {}
            _ => return Err(invalid(format!("expected a positive integer, got {value}"))),
        },
        LOCKED => {
            if !value.is_boolean() {
                return Err(invalid(format!("expected a boolean, got {value}")));
            }
        }
        LINK | CONTAINER_ID => {
            if !(value.is_null() || value.is_string()) {
                return Err(invalid(format!("expected a string or null, got {value}")));
            }
        }
        ROUNDNESS => {
            if !(value.is_null() || value.is_object()) {
                return Err(invalid(format!("expected an object or null, got {value}")));
            }
        }
        START_ARROWHEAD | END_ARROWHEAD => {
            Arrowhead::from_style_value(value).map_err(invalid)?;
        }
        _ => {}
    }

    Ok(())
}

fn one_of(value: &Value, allowed: &[&str]) -> Result<(), String> {
    match value.as_str() {
        Some(s) if allowed.contains(&s) => Ok(()),
        _ => Err(format!(
            "expected one of {}, got {value}",
            allowed.join(", ")
        )),
    }
}

fn number_in(value: &Value, min: f64, max: f64) -> Result<(), String> {
    match value.as_f64() {
        Some(n) if n.is_finite() && n >= min && n <= max => Ok(()),
        Some(n) => Err(format!("{n} is out of range")),
        None => Err(format!("expected a number, got {value}")),
    }
}
