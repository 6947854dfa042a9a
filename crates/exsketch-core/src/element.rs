//! The element model: shapes, text and lines.
//!
//! Every drawable element shares an [`ElementCommon`] (identity, geometry,
//! style, group membership) and implements the [`Primitive`] trait, which
//! provides the geometric queries used when composing elements:
//!
//! - [`Primitive::center`] and [`Primitive::bounds`]
//! - [`Primitive::edge_midpoint`], the point where a ray cast from the center
//!   at a given angle leaves the element's outline (grown by a padding)
//!
//! Elements turned by their `angle` style are handled by every query:
//! outlines are intersected in the element's own frame and the result is
//! turned back around the center.
//!
//! The concrete element types live in submodules:
//!
//! - [`Shape`] - rectangles, diamonds and ellipses
//! - [`Text`] - a text block whose size is estimated from its content
//! - [`Line`] - lines and arrows with optional bindings to other elements
//!
//! [`Element`] is the closed sum of the three and is what a sketch stores.

use std::fmt;

use rand::Rng;
use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::{
    geometry::{Bounds, Point, Size, decimal_f64},
    identifier::{ElementId, GroupId},
    style::{ANGLE, Style},
};

mod line;
mod shape;
mod text;

pub use line::{Arrowhead, Binding, Line, LineVariant};
pub use shape::{Shape, ShapeKind};
pub use text::Text;

/// Geometry errors raised when constructing elements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("element size must be non-negative, got {width}x{height}")]
    NegativeSize { width: f32, height: f32 },

    #[error("element geometry must be finite, got {0}")]
    NonFinite(String),

    #[error("a line needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("padding must be a non-negative finite number, got {0}")]
    InvalidPadding(f32),

    #[error("cannot bind an arrow between elements whose centers coincide at ({x}, {y})")]
    CoincidentCenters { x: f32, y: f32 },
}

/// Discriminates the six element types Excalidraw understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Diamond,
    Ellipse,
    Text,
    Line,
    Arrow,
}

impl ElementKind {
    /// Returns the `type` string used in exported documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Diamond => "diamond",
            Self::Ellipse => "ellipse",
            Self::Text => "text",
            Self::Line => "line",
            Self::Arrow => "arrow",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Random values Excalidraw uses to keep the hand-drawn look of an element
/// stable between renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seeds {
    seed: i32,
    version_nonce: i32,
}

impl Seeds {
    pub fn new(seed: i32, version_nonce: i32) -> Self {
        Self {
            seed,
            version_nonce,
        }
    }

    /// Draws a fresh pair of positive seeds from `rng`.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            seed: rng.random_range(1..i32::MAX),
            version_nonce: rng.random_range(1..i32::MAX),
        }
    }

    pub fn seed(self) -> i32 {
        self.seed
    }

    pub fn version_nonce(self) -> i32 {
        self.version_nonce
    }
}

/// A reference from an element to a line bound to it, emitted as the
/// `boundElements` entries of the element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundElement {
    id: ElementId,
    #[serde(rename = "type")]
    kind: ElementKind,
}

impl BoundElement {
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        Self { id, kind }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }
}

/// State shared by every element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementCommon {
    id: ElementId,
    center: Point,
    size: Size,
    style: Style,
    group_ids: Vec<GroupId>,
    seeds: Seeds,
}

impl ElementCommon {
    /// Creates the shared element state.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if the center or size is NaN or
    /// infinite, and [`GeometryError::NegativeSize`] for a negative dimension.
    pub fn new(
        id: ElementId,
        center: Point,
        size: Size,
        style: Style,
        seeds: Seeds,
    ) -> Result<Self, GeometryError> {
        Self::check(center, size)?;

        Ok(Self {
            id,
            center,
            size,
            style,
            group_ids: Vec::new(),
            seeds,
        })
    }

    /// Checks the geometry [`ElementCommon::new`] would accept, without
    /// building anything.
    pub fn check(center: Point, size: Size) -> Result<(), GeometryError> {
        if !center.is_finite() {
            return Err(GeometryError::NonFinite(format!("center {center:?}")));
        }
        if !(size.width().is_finite() && size.height().is_finite()) {
            return Err(GeometryError::NonFinite(format!("size {size:?}")));
        }
        if size.width() < 0.0 || size.height() < 0.0 {
            return Err(GeometryError::NegativeSize {
                width: size.width(),
                height: size.height(),
            });
        }
        Ok(())
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub(crate) fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    pub fn group_ids(&self) -> &[GroupId] {
        &self.group_ids
    }

    pub fn seeds(&self) -> Seeds {
        self.seeds
    }
}

/// Geometric and export behavior shared by all elements.
pub trait Primitive {
    /// Returns the shared element state.
    fn common(&self) -> &ElementCommon;

    /// Returns the element type.
    fn kind(&self) -> ElementKind;

    /// Finds where a ray leaving the center at `angle` (radians, 0 along +x)
    /// crosses the unrotated outline grown outward by `padding`.
    ///
    /// The default treats the element as its bounding rectangle.
    fn outline_point(&self, angle: f32, padding: f32) -> Point {
        shape::rectangle_edge_point(self.center(), self.size(), angle, padding)
    }

    /// Finds where a ray leaving the center at `angle` (radians, 0 along +x)
    /// crosses the element's outline as drawn, grown outward by `padding`.
    fn edge_midpoint(&self, angle: f32, padding: f32) -> Point {
        let rotation = self.rotation();
        if rotation == 0.0 {
            return self.outline_point(angle, padding);
        }
        self.outline_point(angle - rotation, padding)
            .rotate_around(self.center(), rotation)
    }

    /// Returns the clockwise rotation of the element in radians, read from
    /// its `angle` style.
    fn rotation(&self) -> f32 {
        self.style().get_f32(ANGLE).unwrap_or(0.0)
    }

    /// Returns the exported `x`/`y` of the element.
    ///
    /// Boxes and text are positioned by the top-left corner of their
    /// unrotated box; the editor turns them around the center.
    fn origin(&self) -> Point {
        Bounds::new_from_center(self.center(), self.size()).min_point()
    }

    /// Writes the fields specific to this element type.
    fn write_fields(&self, _fields: &mut Map<String, Value>) {}

    fn id(&self) -> &ElementId {
        self.common().id()
    }

    fn center(&self) -> Point {
        self.common().center()
    }

    fn size(&self) -> Size {
        self.common().size()
    }

    /// Returns the axis-aligned box covering the element as drawn.
    fn bounds(&self) -> Bounds {
        Bounds::new_from_center(self.center(), self.size().rotated_extents(self.rotation()))
    }

    fn style(&self) -> &Style {
        self.common().style()
    }

    fn group_ids(&self) -> &[GroupId] {
        self.common().group_ids()
    }

    /// Serializes the element into an Excalidraw element object.
    ///
    /// `bound_elements` lists the lines bound to this element; it is
    /// emitted as `null` when empty.
    fn to_json(&self, bound_elements: &[BoundElement]) -> Value {
        let common = self.common();
        let origin = self.origin();
        let size = self.size();

        let mut fields = Map::new();
        fields.insert("id".into(), json!(common.id()));
        fields.insert("type".into(), json!(self.kind()));
        fields.insert("x".into(), json!(decimal_f64(origin.x())));
        fields.insert("y".into(), json!(decimal_f64(origin.y())));
        fields.insert("width".into(), json!(decimal_f64(size.width())));
        fields.insert("height".into(), json!(decimal_f64(size.height())));
        for (key, value) in common.style().iter() {
            fields.insert(key.to_string(), value.clone());
        }
        fields.insert("groupIds".into(), json!(common.group_ids()));
        fields.insert("seed".into(), json!(common.seeds().seed()));
        fields.insert("version".into(), json!(1));
        fields.insert(
            "versionNonce".into(),
            json!(common.seeds().version_nonce()),
        );
        fields.insert("isDeleted".into(), json!(false));
        let bound = if bound_elements.is_empty() {
            Value::Null
        } else {
            json!(bound_elements)
        };
        fields.insert("boundElements".into(), bound);
        fields.insert("updated".into(), json!(1));

        self.write_fields(&mut fields);
        Value::Object(fields)
    }
}

/// Any element a sketch can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Shape(Shape),
    Text(Text),
    Line(Line),
}

impl Element {
    fn as_primitive(&self) -> &dyn Primitive {
        match self {
            Self::Shape(shape) => shape,
            Self::Text(text) => text,
            Self::Line(line) => line,
        }
    }

    fn common_mut(&mut self) -> &mut ElementCommon {
        match self {
            Self::Shape(shape) => shape.common_mut(),
            Self::Text(text) => text.common_mut(),
            Self::Line(line) => line.common_mut(),
        }
    }

    /// Appends `group` to the element's group memberships.
    ///
    /// Memberships are append-only; adding the same group twice is a no-op.
    pub fn add_group(&mut self, group: GroupId) {
        let group_ids = &mut self.common_mut().group_ids;
        if !group_ids.contains(&group) {
            group_ids.push(group);
        }
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            Self::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Self::Line(line) => Some(line),
            _ => None,
        }
    }
}

impl Primitive for Element {
    fn common(&self) -> &ElementCommon {
        self.as_primitive().common()
    }

    fn kind(&self) -> ElementKind {
        self.as_primitive().kind()
    }

    fn outline_point(&self, angle: f32, padding: f32) -> Point {
        self.as_primitive().outline_point(angle, padding)
    }

    fn origin(&self) -> Point {
        self.as_primitive().origin()
    }

    fn write_fields(&self, fields: &mut Map<String, Value>) {
        self.as_primitive().write_fields(fields);
    }
}

impl From<Shape> for Element {
    fn from(shape: Shape) -> Self {
        Self::Shape(shape)
    }
}

impl From<Text> for Element {
    fn from(text: Text) -> Self {
        Self::Text(text)
    }
}

impl From<Line> for Element {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}
