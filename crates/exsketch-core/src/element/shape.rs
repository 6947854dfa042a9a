//! Box-like shapes: rectangles, diamonds and ellipses.

use std::{fmt, str::FromStr};

use crate::{
    element::{ElementCommon, ElementKind, Primitive},
    geometry::{Point, Size, normalize_angle},
};

/// Direction components smaller than this are treated as exactly zero, so
/// axis-aligned rays never divide by a vanishing sine or cosine.
const AXIS_EPSILON: f32 = 1e-6;

/// The outline of a [`Shape`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Diamond,
    Ellipse,
}

impl From<ShapeKind> for ElementKind {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Rectangle => ElementKind::Rectangle,
            ShapeKind::Diamond => ElementKind::Diamond,
            ShapeKind::Ellipse => ElementKind::Ellipse,
        }
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rectangle" => Ok(Self::Rectangle),
            "diamond" => Ok(Self::Diamond),
            "ellipse" => Ok(Self::Ellipse),
            _ => Err(format!(
                "invalid shape `{s}`, valid values: rectangle, diamond, ellipse"
            )),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ElementKind::from(*self).as_str())
    }
}

/// A rectangle, diamond or ellipse centered on its position.
///
/// The kind is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    common: ElementCommon,
}

impl Shape {
    pub fn new(kind: ShapeKind, common: ElementCommon) -> Self {
        Self { kind, common }
    }

    pub fn shape_kind(&self) -> ShapeKind {
        self.kind
    }

    pub(super) fn common_mut(&mut self) -> &mut ElementCommon {
        &mut self.common
    }
}

impl Primitive for Shape {
    fn common(&self) -> &ElementCommon {
        &self.common
    }

    fn kind(&self) -> ElementKind {
        self.kind.into()
    }

    fn outline_point(&self, angle: f32, padding: f32) -> Point {
        let center = self.center();
        let size = self.size();
        match self.kind {
            ShapeKind::Rectangle => rectangle_edge_point(center, size, angle, padding),
            ShapeKind::Diamond => diamond_edge_point(center, size, angle, padding),
            ShapeKind::Ellipse => ellipse_edge_point(center, size, angle, padding),
        }
    }
}

/// Intersects a ray from `center` at `angle` with the rectangle of `size`
/// grown by `padding` on every side.
pub(crate) fn rectangle_edge_point(center: Point, size: Size, angle: f32, padding: f32) -> Point {
    let (half_width, half_height) = size.padded_half_extents(padding);
    let (sin, cos) = normalize_angle(angle).sin_cos();

    // Vertical ray: only the top or bottom edge can be hit
    if cos.abs() < AXIS_EPSILON {
        return Point::new(center.x(), center.y() + half_height.copysign(sin));
    }
    // Horizontal ray: only the left or right edge can be hit
    if sin.abs() < AXIS_EPSILON {
        return Point::new(center.x() + half_width.copysign(cos), center.y());
    }

    // Distance along the ray to the nearer of the vertical and horizontal edges
    let t = (half_width / cos.abs()).min(half_height / sin.abs());

    Point::new(cos.mul_add(t, center.x()), sin.mul_add(t, center.y()))
}

/// Intersects a ray from `center` at `angle` with the diamond inscribed in
/// the rectangle of `size` grown by `padding`.
///
/// The diamond's boundary is `|x| / a + |y| / b = 1` with `a`, `b` the padded
/// half extents, so the ray `t * (cos, sin)` meets it at
/// `t = 1 / (|cos| / a + |sin| / b)`.
fn diamond_edge_point(center: Point, size: Size, angle: f32, padding: f32) -> Point {
    let (half_width, half_height) = size.padded_half_extents(padding);
    let (sin, cos) = normalize_angle(angle).sin_cos();

    let denominator = axis_ratio(cos.abs(), half_width) + axis_ratio(sin.abs(), half_height);
    if !denominator.is_finite() || denominator <= 0.0 {
        // Collapsed diamond along the ray's direction
        return center;
    }

    let t = denominator.recip();
    Point::new(cos.mul_add(t, center.x()), sin.mul_add(t, center.y()))
}

fn axis_ratio(component: f32, half_extent: f32) -> f32 {
    if component < AXIS_EPSILON {
        0.0
    } else if half_extent <= 0.0 {
        f32::INFINITY
    } else {
        component / half_extent
    }
}

/// Intersects a ray from `center` at `angle` with the ellipse whose
/// semi-axes are the padded half extents of `size`.
///
/// Uses the parametric angle `t = atan2(a·sinθ, b·cosθ)`, for which
/// `(a·cos t, b·sin t)` lies on the ellipse along direction `θ`.
fn ellipse_edge_point(center: Point, size: Size, angle: f32, padding: f32) -> Point {
    let (semi_x, semi_y) = size.padded_half_extents(padding);
    let (sin, cos) = normalize_angle(angle).sin_cos();

    let t = (semi_x * sin).atan2(semi_y * cos);
    let (sin_t, cos_t) = t.sin_cos();

    Point::new(
        semi_x.mul_add(cos_t, center.x()),
        semi_y.mul_add(sin_t, center.y()),
    )
}
