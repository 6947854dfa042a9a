//! Lines and arrows.
//!
//! A [`Line`] is a polyline of at least two points. Its first point is its
//! origin: points are stored relative to it, and it is what Excalidraw uses as
//! the element's `x`/`y`. Plain lines, arrows and double-headed arrows are the
//! same element with different [`Arrowhead`]s, selected by [`LineVariant`].
//!
//! Either end of a line can be bound to another element with a [`Binding`].
//! A binding only records the target's identifier; the target itself is never
//! modified and must outlive the binding for the document to stay coherent.

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::{
    element::{ElementCommon, ElementKind, GeometryError, Primitive},
    geometry::{Bounds, Point, Size, decimal_f64},
    identifier::ElementId,
    style::{END_ARROWHEAD, START_ARROWHEAD, Style},
};

/// Decoration drawn at a line end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrowhead {
    Arrow,
    Bar,
    Dot,
    Triangle,
}

impl Arrowhead {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arrow => "arrow",
            Self::Bar => "bar",
            Self::Dot => "dot",
            Self::Triangle => "triangle",
        }
    }

    /// Reads an optional arrowhead from a style value, where `null` means none.
    pub fn from_style_value(value: &Value) -> Result<Option<Self>, String> {
        match value {
            Value::Null => Ok(None),
            Value::String(name) => name.parse().map(Some),
            other => Err(format!("expected an arrowhead name or null, got {other}")),
        }
    }
}

impl FromStr for Arrowhead {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arrow" => Ok(Self::Arrow),
            "bar" => Ok(Self::Bar),
            "dot" => Ok(Self::Dot),
            "triangle" => Ok(Self::Triangle),
            _ => Err(format!(
                "invalid arrowhead `{s}`, valid values: arrow, bar, dot, triangle"
            )),
        }
    }
}

impl fmt::Display for Arrowhead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three named line configurations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineVariant {
    /// No arrowheads, exported as a `line` element.
    Line,
    /// An arrowhead at the end.
    #[default]
    Arrow,
    /// Arrowheads at both ends.
    DoubleArrow,
}

impl LineVariant {
    /// Returns the element type this variant is exported as.
    pub fn kind(self) -> ElementKind {
        match self {
            Self::Line => ElementKind::Line,
            Self::Arrow | Self::DoubleArrow => ElementKind::Arrow,
        }
    }

    /// Returns the style entries this variant imposes on its arrowheads.
    ///
    /// Plain lines impose nothing, so the profile defaults apply.
    pub fn arrowhead_style(self) -> Style {
        match self {
            Self::Line => Style::new(),
            Self::Arrow => Style::new().with(END_ARROWHEAD, Arrowhead::Arrow.as_str()),
            Self::DoubleArrow => Style::new()
                .with(START_ARROWHEAD, Arrowhead::Arrow.as_str())
                .with(END_ARROWHEAD, Arrowhead::Arrow.as_str()),
        }
    }
}

impl FromStr for LineVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(Self::Line),
            "arrow" => Ok(Self::Arrow),
            "double-arrow" | "double_arrow" => Ok(Self::DoubleArrow),
            _ => Err(format!(
                "invalid line variant `{s}`, valid values: line, arrow, double-arrow"
            )),
        }
    }
}

/// A non-owning attachment of a line end to another element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    element_id: ElementId,
    #[serde(serialize_with = "serialize_decimal")]
    focus: f32,
    #[serde(serialize_with = "serialize_decimal")]
    gap: f32,
}

fn serialize_decimal<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(decimal_f64(*value))
}

impl Binding {
    /// Binds to `element_id`, keeping `gap` units between the line end and
    /// the element's outline.
    pub fn new(element_id: ElementId, gap: f32) -> Self {
        Self {
            element_id,
            focus: 0.0,
            gap,
        }
    }

    pub fn element_id(&self) -> &ElementId {
        &self.element_id
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }
}

/// A polyline or arrow.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    kind: ElementKind,
    origin: Point,
    points: Vec<Point>,
    start_arrowhead: Option<Arrowhead>,
    end_arrowhead: Option<Arrowhead>,
    start_binding: Option<Binding>,
    end_binding: Option<Binding>,
    common: ElementCommon,
}

impl Line {
    /// Computes the center and size of the polyline through `points`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewPoints`] for fewer than two points and
    /// [`GeometryError::NonFinite`] if any coordinate is NaN or infinite.
    pub fn frame(points: &[Point]) -> Result<(Point, Size), GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(GeometryError::NonFinite(format!("point {bad:?}")));
        }

        let bounds = Bounds::from_points(points.iter().copied())
            .ok_or(GeometryError::TooFewPoints(0))?;
        Ok((bounds.center(), bounds.to_size()))
    }

    /// Creates a line through the absolute `points`.
    ///
    /// `common` must have been built from [`Line::frame`] of the same points.
    /// The arrowheads are taken out of the `startArrowhead`/`endArrowhead`
    /// style entries, which are expected to be validated already.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewPoints`] for fewer than two points.
    pub fn new(
        variant: LineVariant,
        points: &[Point],
        mut common: ElementCommon,
    ) -> Result<Self, GeometryError> {
        let origin = *points
            .first()
            .ok_or(GeometryError::TooFewPoints(points.len()))?;
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }

        let style = common.style_mut();
        let start_arrowhead = take_arrowhead(style, START_ARROWHEAD);
        let end_arrowhead = take_arrowhead(style, END_ARROWHEAD);

        Ok(Self {
            kind: variant.kind(),
            origin,
            points: points.iter().map(|p| p.sub_point(origin)).collect(),
            start_arrowhead,
            end_arrowhead,
            start_binding: None,
            end_binding: None,
            common,
        })
    }

    /// Returns the points relative to the line's origin.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the absolute position of the first point.
    pub fn start(&self) -> Point {
        self.origin
    }

    /// Returns the absolute position of the last point.
    pub fn end(&self) -> Point {
        self.points
            .last()
            .map_or(self.origin, |p| p.add_point(self.origin))
    }

    pub fn start_arrowhead(&self) -> Option<Arrowhead> {
        self.start_arrowhead
    }

    pub fn end_arrowhead(&self) -> Option<Arrowhead> {
        self.end_arrowhead
    }

    pub fn start_binding(&self) -> Option<&Binding> {
        self.start_binding.as_ref()
    }

    pub fn end_binding(&self) -> Option<&Binding> {
        self.end_binding.as_ref()
    }

    /// Binds the start of the line to `target`.
    pub fn set_start_binding(&mut self, target: &ElementId, gap: f32) {
        self.start_binding = Some(Binding::new(target.clone(), gap));
    }

    /// Binds the end of the line to `target`.
    pub fn set_end_binding(&mut self, target: &ElementId, gap: f32) {
        self.end_binding = Some(Binding::new(target.clone(), gap));
    }

    /// Returns the identifiers of the elements this line is bound to.
    pub fn bound_targets(&self) -> impl Iterator<Item = &ElementId> {
        self.start_binding
            .iter()
            .chain(self.end_binding.iter())
            .map(Binding::element_id)
    }

    pub(super) fn common_mut(&mut self) -> &mut ElementCommon {
        &mut self.common
    }
}

fn take_arrowhead(style: &mut Style, key: &str) -> Option<Arrowhead> {
    style
        .remove(key)
        .and_then(|value| Arrowhead::from_style_value(&value).ok().flatten())
}

impl Primitive for Line {
    fn common(&self) -> &ElementCommon {
        &self.common
    }

    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn write_fields(&self, fields: &mut Map<String, Value>) {
        let points: Vec<[f64; 2]> = self
            .points
            .iter()
            .map(|p| [decimal_f64(p.x()), decimal_f64(p.y())])
            .collect();
        fields.insert("points".into(), json!(points));
        fields.insert("startBinding".into(), json!(self.start_binding));
        fields.insert("endBinding".into(), json!(self.end_binding));
        fields.insert("startArrowhead".into(), json!(self.start_arrowhead));
        fields.insert("endArrowhead".into(), json!(self.end_arrowhead));
    }
}
