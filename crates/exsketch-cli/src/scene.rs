//! Scene files: a TOML description of the elements to draw.
//!
//! A scene is a set of arrays of tables, applied in this order:
//!
//! - `[[shape]]`: `kind` (rectangle, diamond, ellipse), `x`, `y`, `width`,
//!   `height`
//! - `[[text]]`: `content`, `x`, `y`, and optionally `width` and `height`
//! - `[[text_box]]`: `content`, `x`, `y`, `text_style`, `rect_style`
//! - `[[line]]`: `variant` (line, arrow, double-arrow) and absolute `points`
//! - `[[arrow]]`: a bound arrow `from` one named element `to` another, with
//!   an optional `variant` and `padding`
//! - `[[group]]`: named `members`, optionally wrapped in a `bounding` shape
//!
//! Every table may carry a `name`, used by later tables to refer to the
//! element, and a `style` table of overrides.
//!
//! ```toml
//! [[shape]]
//! name = "client"
//! x = 100
//! y = 100
//! width = 80
//! height = 50
//! style = { strokeColor = "#1971c2" }
//!
//! [[shape]]
//! name = "server"
//! kind = "ellipse"
//! x = 300
//! y = 100
//! width = 80
//! height = 50
//!
//! [[arrow]]
//! from = "client"
//! to = "server"
//! ```

use std::{collections::HashMap, ops::Range};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use exsketch::{
    DEFAULT_PADDING, SketchBuilder, SketchError,
    element::{LineVariant, ShapeKind},
    geometry::{Point, Size},
    identifier::ElementId,
    style::Style,
};

/// Errors raised while reading or applying a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Failed to parse scene: {message}")]
    Parse {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Duplicate element name `{0}`")]
    DuplicateName(String),

    #[error("{entry} refers to unknown element `{name}`")]
    UnknownName { entry: String, name: String },

    #[error("Invalid value in {entry}: {reason}")]
    InvalidValue { entry: String, reason: String },

    #[error("Failed to create {entry}: {source}")]
    Element {
        entry: String,
        #[source]
        source: SketchError,
    },
}

fn default_padding() -> f32 {
    DEFAULT_PADDING
}

fn default_shape_kind() -> String {
    ShapeKind::Rectangle.to_string()
}

fn default_line_variant() -> String {
    "line".to_string()
}

fn default_arrow_variant() -> String {
    "arrow".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShapeEntry {
    name: Option<String>,
    #[serde(default = "default_shape_kind")]
    kind: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(default)]
    style: Style,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TextEntry {
    name: Option<String>,
    content: String,
    x: f32,
    y: f32,
    width: Option<f32>,
    height: Option<f32>,
    #[serde(default)]
    style: Style,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TextBoxEntry {
    name: Option<String>,
    content: String,
    x: f32,
    y: f32,
    #[serde(default)]
    text_style: Style,
    #[serde(default)]
    rect_style: Style,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LineEntry {
    name: Option<String>,
    #[serde(default = "default_line_variant")]
    variant: String,
    points: Vec<[f32; 2]>,
    #[serde(default)]
    style: Style,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArrowEntry {
    name: Option<String>,
    from: String,
    to: String,
    #[serde(default = "default_arrow_variant")]
    variant: String,
    #[serde(default = "default_padding")]
    padding: f32,
    #[serde(default)]
    style: Style,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupEntry {
    name: Option<String>,
    members: Vec<String>,
    bounding: Option<String>,
    #[serde(default = "default_padding")]
    padding: f32,
    #[serde(default)]
    style: Style,
}

/// A parsed scene, ready to be applied to a [`SketchBuilder`].
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    #[serde(default)]
    shape: Vec<ShapeEntry>,
    #[serde(default)]
    text: Vec<TextEntry>,
    #[serde(default)]
    text_box: Vec<TextBoxEntry>,
    #[serde(default)]
    line: Vec<LineEntry>,
    #[serde(default)]
    arrow: Vec<ArrowEntry>,
    #[serde(default)]
    group: Vec<GroupEntry>,
}

/// Tracks element names while a scene is applied.
#[derive(Debug, Default)]
struct Names(HashMap<String, ElementId>);

impl Names {
    fn ensure_free(&self, name: Option<&String>) -> Result<(), SceneError> {
        match name {
            Some(name) if self.0.contains_key(name) => Err(SceneError::DuplicateName(name.clone())),
            _ => Ok(()),
        }
    }

    fn insert(&mut self, name: Option<&String>, id: ElementId) {
        if let Some(name) = name {
            self.0.insert(name.clone(), id);
        }
    }

    fn resolve(&self, entry: &str, name: &str) -> Result<&ElementId, SceneError> {
        self.0.get(name).ok_or_else(|| SceneError::UnknownName {
            entry: entry.to_string(),
            name: name.to_string(),
        })
    }
}

/// Describes an entry for error messages: its name, or its table and
/// position when unnamed.
fn describe(table: &str, index: usize, name: Option<&String>) -> String {
    match name {
        Some(name) => format!("`{name}`"),
        None => format!("{table} #{}", index + 1),
    }
}

fn invalid(entry: &str) -> impl Fn(String) -> SceneError + '_ {
    move |reason| SceneError::InvalidValue {
        entry: entry.to_string(),
        reason,
    }
}

fn element(entry: &str) -> impl Fn(SketchError) -> SceneError + '_ {
    move |source| SceneError::Element {
        entry: entry.to_string(),
        source,
    }
}

impl Scene {
    /// Parse a scene from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Parse`] with the offending span when the source
    /// is not valid TOML or does not match the scene layout.
    pub fn parse(src: &str) -> Result<Self, SceneError> {
        toml::from_str(src).map_err(|err| SceneError::Parse {
            message: err.message().to_string(),
            span: err.span(),
            src: src.to_string(),
        })
    }

    /// Returns how many entries the scene declares.
    pub fn len(&self) -> usize {
        self.shape.len()
            + self.text.len()
            + self.text_box.len()
            + self.line.len()
            + self.arrow.len()
            + self.group.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create every element of the scene in `builder`.
    ///
    /// # Errors
    ///
    /// Returns the first failing entry's error. Entries before it have
    /// already been added to `builder`.
    pub fn apply(&self, builder: &mut SketchBuilder) -> Result<(), SceneError> {
        let mut names = Names::default();

        for (index, entry) in self.shape.iter().enumerate() {
            let label = describe("shape", index, entry.name.as_ref());
            names.ensure_free(entry.name.as_ref())?;
            let kind: ShapeKind = entry.kind.parse().map_err(invalid(&label))?;
            let id = builder
                .shape(
                    kind,
                    Point::new(entry.x, entry.y),
                    Size::new(entry.width, entry.height),
                    &entry.style,
                )
                .map_err(element(&label))?;
            names.insert(entry.name.as_ref(), id);
        }

        for (index, entry) in self.text.iter().enumerate() {
            let label = describe("text", index, entry.name.as_ref());
            names.ensure_free(entry.name.as_ref())?;
            let center = Point::new(entry.x, entry.y);
            let id = match (entry.width, entry.height) {
                (None, None) => builder.text(&entry.content, center, &entry.style),
                (Some(width), Some(height)) => builder.text_with_size(
                    &entry.content,
                    center,
                    Size::new(width, height),
                    &entry.style,
                ),
                _ => {
                    return Err(invalid(&label)(
                        "`width` and `height` must be given together".to_string(),
                    ));
                }
            }
            .map_err(element(&label))?;
            names.insert(entry.name.as_ref(), id);
        }

        for (index, entry) in self.text_box.iter().enumerate() {
            let label = describe("text_box", index, entry.name.as_ref());
            names.ensure_free(entry.name.as_ref())?;
            let id = builder
                .create_text_box(
                    &entry.content,
                    Point::new(entry.x, entry.y),
                    &entry.text_style,
                    &entry.rect_style,
                )
                .map_err(element(&label))?;
            names.insert(entry.name.as_ref(), id);
        }

        for (index, entry) in self.line.iter().enumerate() {
            let label = describe("line", index, entry.name.as_ref());
            names.ensure_free(entry.name.as_ref())?;
            let variant: LineVariant = entry.variant.parse().map_err(invalid(&label))?;
            let points: Vec<Point> = entry.points.iter().map(|&[x, y]| Point::new(x, y)).collect();
            let id = builder
                .polyline(variant, &points, &entry.style)
                .map_err(element(&label))?;
            names.insert(entry.name.as_ref(), id);
        }

        for (index, entry) in self.arrow.iter().enumerate() {
            let label = describe("arrow", index, entry.name.as_ref());
            names.ensure_free(entry.name.as_ref())?;
            let variant: LineVariant = entry.variant.parse().map_err(invalid(&label))?;
            let from = names.resolve(&label, &entry.from)?;
            let to = names.resolve(&label, &entry.to)?;
            let id = builder
                .create_binding_arrows(from, to, variant, entry.padding, &entry.style)
                .map_err(element(&label))?;
            names.insert(entry.name.as_ref(), id);
        }

        for (index, entry) in self.group.iter().enumerate() {
            let label = describe("group", index, entry.name.as_ref());
            names.ensure_free(entry.name.as_ref())?;
            let kind = entry
                .bounding
                .as_deref()
                .map(str::parse::<ShapeKind>)
                .transpose()
                .map_err(invalid(&label))?;
            let members = entry
                .members
                .iter()
                .map(|member| names.resolve(&label, member).cloned())
                .collect::<Result<Vec<_>, _>>()?;

            let group = builder.group(&members).map_err(element(&label))?;
            if let Some(kind) = kind {
                let id = builder
                    .create_group_bounding_element(&group, kind, entry.padding, &entry.style)
                    .map_err(element(&label))?;
                names.insert(entry.name.as_ref(), id);
            }
        }

        debug!(entries = self.len(), elements = builder.len(); "Scene applied");
        Ok(())
    }
}
