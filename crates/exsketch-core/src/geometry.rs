//! Geometric primitives for sketch elements.
//!
//! This module provides the small set of geometric types used to place
//! elements on the canvas and to compute where arrows meet element outlines.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate on the canvas
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned bounding box
//! - [`normalize_angle`] - Folds any angle into `(-π, π]`
//!
//! # Coordinate System
//!
//! The canvas uses the same orientation as the Excalidraw editor:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Angles are measured in radians from the positive x-axis, so with y pointing
//! down an angle of `π/2` points *down* the canvas.

use std::f32::consts::{PI, TAU};

/// A 2D point on the canvas.
///
/// # Examples
///
/// ```
/// # use exsketch_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Returns true if both coordinates are finite (not NaN or infinite)
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Returns the angle of the vector from the origin to this point,
    /// in `(-π, π]`.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Rotates this point by `angle` radians around `pivot`.
    ///
    /// With y pointing down, a positive angle turns clockwise on screen,
    /// the same way the editor applies an element's `angle`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use exsketch_core::geometry::Point;
    /// use std::f32::consts::FRAC_PI_2;
    ///
    /// let p = Point::new(20.0, 10.0).rotate_around(Point::new(10.0, 10.0), FRAC_PI_2);
    /// assert!((p.x() - 10.0).abs() < 1e-5);
    /// assert!((p.y() - 20.0).abs() < 1e-5);
    /// ```
    pub fn rotate_around(self, pivot: Point, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let offset = self.sub_point(pivot);
        Self {
            x: pivot.x + offset.x * cos - offset.y * sin,
            y: pivot.y + offset.x * sin + offset.y * cos,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns half the width and half the height, each grown by `padding`.
    pub fn padded_half_extents(self, padding: f32) -> (f32, f32) {
        (self.width / 2.0 + padding, self.height / 2.0 + padding)
    }

    /// Grows both dimensions by `2 * padding`, one padding on each side.
    pub fn inflate(self, padding: f32) -> Self {
        Self {
            width: padding.mul_add(2.0, self.width),
            height: padding.mul_add(2.0, self.height),
        }
    }

    /// Returns the axis-aligned extent of a box of this size turned by
    /// `angle` radians around its center.
    pub fn rotated_extents(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        Self {
            width: self.width * cos + self.height * sin,
            height: self.width * sin + self.height * cos,
        }
    }

    /// Returns true if both dimensions are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates the smallest bounds containing every point.
    ///
    /// Returns `None` for an empty iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// # use exsketch_core::geometry::{Bounds, Point};
    /// let bounds = Bounds::from_points([Point::new(0.0, 10.0), Point::new(30.0, -5.0)]).unwrap();
    /// assert_eq!(bounds.width(), 30.0);
    /// assert_eq!(bounds.height(), 15.0);
    /// ```
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let start = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.fold(start, |bounds, p| Self {
            min_x: bounds.min_x.min(p.x),
            min_y: bounds.min_y.min(p.y),
            max_x: bounds.max_x.max(p.x),
            max_y: bounds.max_y.max(p.y),
        }))
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use exsketch_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_center(Point::new(0.0, 0.0), Size::new(20.0, 20.0));
    /// let b = Bounds::new_from_center(Point::new(40.0, 0.0), Size::new(20.0, 40.0));
    ///
    /// let combined = a.merge(&b);
    /// assert_eq!(combined.min_x(), -10.0);
    /// assert_eq!(combined.width(), 60.0);
    /// assert_eq!(combined.height(), 40.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Widens `value` to the `f64` with the same shortest decimal form.
///
/// A plain widening keeps the binary error of the `f32`, so `0.1` would be
/// written to documents as `0.10000000149011612`.
///
/// ```
/// # use exsketch_core::geometry::decimal_f64;
/// assert_eq!(decimal_f64(0.1), 0.1);
/// assert_eq!(decimal_f64(-135.25), -135.25);
/// ```
pub fn decimal_f64(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

/// Folds an angle in radians into the half-open interval `(-π, π]`.
///
/// # Examples
///
/// ```
/// # use exsketch_core::geometry::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert_eq!(normalize_angle(0.0), 0.0);
/// assert_eq!(normalize_angle(-PI), PI);
/// assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
/// ```
pub fn normalize_angle(angle: f32) -> f32 {
    let folded = (angle + PI).rem_euclid(TAU) - PI;
    if folded <= -PI { folded + TAU } else { folded }
}

/// Returns the direction pointing the opposite way, normalized into `(-π, π]`.
pub fn antipodal_angle(angle: f32) -> f32 {
    normalize_angle(angle + PI)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(3.5, 4.2);
        assert_eq!(point.x(), 3.5);
        assert_eq!(point.y(), 4.2);
    }

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert!(point.is_zero());
    }

    #[test]
    fn test_point_sub() {
        let result = Point::new(5.0, 8.0).sub_point(Point::new(2.0, 3.0));
        assert_eq!(result, Point::new(3.0, 5.0));
    }

    #[test]
    fn test_point_hypot() {
        assert_eq!(Point::new(3.0, 4.0).hypot(), 5.0);
        assert_eq!(Point::default().hypot(), 0.0);
    }

    #[test]
    fn test_point_angle() {
        assert_approx_eq!(f32, Point::new(0.0, 10.0).angle(), FRAC_PI_2);
        assert_approx_eq!(f32, Point::new(-10.0, 0.0).angle(), PI);
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f32::NAN, 2.0).is_finite());
        assert!(!Point::new(1.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_size_inflate() {
        let size = Size::new(50.0, 20.0).inflate(10.0);
        assert_eq!(size, Size::new(70.0, 40.0));
    }

    #[test]
    fn test_size_padded_half_extents() {
        let (hw, hh) = Size::new(50.0, 20.0).padded_half_extents(5.0);
        assert_eq!(hw, 30.0);
        assert_eq!(hh, 15.0);
    }

    #[test]
    fn test_point_rotate_around() {
        let pivot = Point::new(100.0, 100.0);
        let turned = Point::new(130.0, 100.0).rotate_around(pivot, FRAC_PI_2);
        assert_approx_eq!(f32, turned.x(), 100.0, epsilon = 1e-4);
        assert_approx_eq!(f32, turned.y(), 130.0, epsilon = 1e-4);

        assert_eq!(Point::new(7.0, 9.0).rotate_around(pivot, 0.0), Point::new(7.0, 9.0));
    }

    #[test]
    fn test_size_rotated_extents() {
        let size = Size::new(200.0, 20.0);
        assert_eq!(size.rotated_extents(0.0), size);

        let upright = size.rotated_extents(FRAC_PI_2);
        assert_approx_eq!(f32, upright.width(), 20.0, epsilon = 1e-3);
        assert_approx_eq!(f32, upright.height(), 200.0, epsilon = 1e-3);
    }

    #[test]
    fn test_decimal_f64_drops_binary_noise() {
        assert_eq!(decimal_f64(0.1), 0.1);
        assert_eq!(decimal_f64(12.3), 12.3);
        assert_eq!(decimal_f64(265.0), 265.0);
        assert_ne!(f64::from(0.1f32), 0.1);
    }

    #[test]
    fn test_bounds_from_center() {
        let bounds = Bounds::new_from_center(Point::new(100.0, 50.0), Size::new(40.0, 20.0));
        assert_eq!(bounds.min_point(), Point::new(80.0, 40.0));
        assert_eq!(bounds.max_x(), 120.0);
        assert_eq!(bounds.max_y(), 60.0);
        assert_eq!(bounds.center(), Point::new(100.0, 50.0));
        assert_eq!(bounds.to_size(), Size::new(40.0, 20.0));
    }

    #[test]
    fn test_bounds_from_points_empty() {
        assert!(Bounds::from_points(Vec::<Point>::new()).is_none());
    }

    #[test]
    fn test_bounds_from_single_point_is_degenerate() {
        let bounds = Bounds::from_points([Point::new(3.0, 4.0)]).unwrap();
        assert!(bounds.to_size().is_zero());
        assert_eq!(bounds.center(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_normalize_angle_boundaries() {
        assert_approx_eq!(f32, normalize_angle(PI), PI);
        assert_approx_eq!(f32, normalize_angle(-PI), PI);
        assert_approx_eq!(f32, normalize_angle(TAU), 0.0, epsilon = 1e-5);
        assert_approx_eq!(f32, normalize_angle(-FRAC_PI_2), -FRAC_PI_2);
    }

    #[test]
    fn test_antipodal_angle() {
        assert_approx_eq!(f32, antipodal_angle(0.0), PI);
        assert_approx_eq!(f32, antipodal_angle(PI), 0.0, epsilon = 1e-5);
        assert_approx_eq!(f32, antipodal_angle(FRAC_PI_2), -FRAC_PI_2, epsilon = 1e-5);
    }
}
