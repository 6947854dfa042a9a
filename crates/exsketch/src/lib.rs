//! Exsketch - Build Excalidraw diagrams from code.
//!
//! A [`SketchBuilder`] owns every element of a sketch. It creates shapes,
//! text and lines with styles resolved against its default profiles, composes
//! them into bound arrows, bounding boxes and groups, and exports the result
//! as an Excalidraw document.

pub mod config;

mod compose;
mod error;
mod export;

pub use exsketch_core::{color, element, geometry, identifier, style};

pub use compose::DEFAULT_PADDING;
pub use error::SketchError;
pub use export::{AppState, Document, FILE_EXTENSION};

use indexmap::IndexMap;
use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::Value;

use exsketch_core::{
    element::{
        Element, ElementCommon, Line, LineVariant, Primitive, Seeds, Shape, ShapeKind, Text,
    },
    geometry::{Bounds, Point, Size},
    identifier::{ElementId, IdGenerator},
    style::{BACKGROUND_COLOR, StyleFamily, StyleProfiles, Style, validate_value},
};

use config::SketchConfig;

/// Builder owning the elements of one sketch.
///
/// Every creation method resolves its style overrides against the default
/// profiles, validates the geometry, and only then registers the element, so
/// a failed call leaves the sketch untouched. Methods return the identifier
/// of the element they created, which is how elements are referenced by the
/// composite operations.
///
/// # Examples
///
/// ```rust
/// use exsketch::{SketchBuilder, config::SketchConfig, geometry::{Point, Size}, style::Style};
///
/// let mut builder = SketchBuilder::new(SketchConfig::default().with_seed(7))
///     .expect("Failed to create builder");
///
/// let client = builder
///     .rectangle(Point::new(100.0, 100.0), Size::new(50.0, 50.0), &Style::new())
///     .expect("Failed to create rectangle");
/// let server = builder
///     .ellipse(Point::new(300.0, 100.0), Size::new(80.0, 50.0), &Style::new())
///     .expect("Failed to create ellipse");
/// builder
///     .arrow_between(&client, &server, &Style::new())
///     .expect("Failed to bind arrow");
///
/// let json = builder.to_json().expect("Failed to export");
/// assert!(json.contains("\"type\": \"excalidraw\""));
/// ```
#[derive(Debug)]
pub struct SketchBuilder {
    config: SketchConfig,
    profiles: StyleProfiles,
    ids: IdGenerator,
    rng: StdRng,
    elements: IndexMap<ElementId, Element>,
}

impl SketchBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Configuration`] if a custom default names a key
    /// no profile knows, or if a default or the background color is
    /// malformed.
    pub fn new(config: SketchConfig) -> Result<Self, SketchError> {
        validate_value(
            BACKGROUND_COLOR,
            &Value::from(config.background_color()),
        )?;
        let profiles = StyleProfiles::with_custom_defaults(config.defaults())?;

        let (ids, rng) = match config.seed() {
            Some(seed) => (IdGenerator::sequential(), StdRng::seed_from_u64(seed)),
            None => (IdGenerator::random(), StdRng::from_os_rng()),
        };

        info!(
            custom_defaults = config.defaults().len(),
            deterministic = config.seed().is_some();
            "Sketch builder created"
        );

        Ok(Self {
            config,
            profiles,
            ids,
            rng,
            elements: IndexMap::new(),
        })
    }

    /// Returns the configuration this builder was created with.
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Returns the resolved default style profiles.
    pub fn profiles(&self) -> &StyleProfiles {
        &self.profiles
    }

    /// Create a rectangle centered on `center`.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Configuration`] for an unknown or malformed
    /// override, and [`SketchError::Geometry`] for a negative or non-finite
    /// size or center.
    pub fn rectangle(
        &mut self,
        center: Point,
        size: Size,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        self.shape(ShapeKind::Rectangle, center, size, overrides)
    }

    /// Create a diamond centered on `center`. See [`SketchBuilder::rectangle`].
    pub fn diamond(
        &mut self,
        center: Point,
        size: Size,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        self.shape(ShapeKind::Diamond, center, size, overrides)
    }

    /// Create an ellipse centered on `center`. See [`SketchBuilder::rectangle`].
    pub fn ellipse(
        &mut self,
        center: Point,
        size: Size,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        self.shape(ShapeKind::Ellipse, center, size, overrides)
    }

    /// Create a box-like shape of the given kind.
    pub fn shape(
        &mut self,
        kind: ShapeKind,
        center: Point,
        size: Size,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        let shape = self.prepare_shape(kind, center, size, overrides)?;
        Ok(self.register(shape))
    }

    /// Create a text element centered on `center`, sized from its content.
    ///
    /// # Errors
    ///
    /// Same as [`SketchBuilder::rectangle`], with overrides checked against
    /// the text profile.
    pub fn text(
        &mut self,
        content: &str,
        center: Point,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        let text = self.prepare_text(content, center, None, overrides)?;
        Ok(self.register(text))
    }

    /// Create a text element with an explicit size instead of the estimate.
    pub fn text_with_size(
        &mut self,
        content: &str,
        center: Point,
        size: Size,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        let text = self.prepare_text(content, center, Some(size), overrides)?;
        Ok(self.register(text))
    }

    /// Create a plain line from `start` to `end`.
    pub fn line(
        &mut self,
        start: Point,
        end: Point,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        self.polyline(LineVariant::Line, &[start, end], overrides)
    }

    /// Create an arrow from `start` to `end`, with a head at `end`.
    pub fn arrow(
        &mut self,
        start: Point,
        end: Point,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        self.polyline(LineVariant::Arrow, &[start, end], overrides)
    }

    /// Create an arrow from `start` to `end` with heads at both ends.
    pub fn double_arrow(
        &mut self,
        start: Point,
        end: Point,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        self.polyline(LineVariant::DoubleArrow, &[start, end], overrides)
    }

    /// Create a line of the given variant through absolute `points`.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Geometry`] for fewer than two points or a
    /// non-finite coordinate, and [`SketchError::Configuration`] for a bad
    /// override.
    pub fn polyline(
        &mut self,
        variant: LineVariant,
        points: &[Point],
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        let line = self.prepare_line(variant, points, overrides)?;
        Ok(self.register(line))
    }

    /// Returns the element registered under `id`.
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Returns all elements in creation order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the axis-aligned bounds of the element registered under `id`,
    /// covering it as drawn when it is turned by its `angle` style.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::UnknownElement`] if no such element exists.
    pub fn bounds_of(&self, id: &ElementId) -> Result<Bounds, SketchError> {
        Ok(self.element(id)?.bounds())
    }

    fn element(&self, id: &ElementId) -> Result<&Element, SketchError> {
        self.elements
            .get(id)
            .ok_or_else(|| SketchError::UnknownElement(id.clone()))
    }

    fn element_mut(&mut self, id: &ElementId) -> Result<&mut Element, SketchError> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| SketchError::UnknownElement(id.clone()))
    }

    /// Mints the identity of a new element. Only called once every fallible
    /// check of the element has passed.
    fn common(
        &mut self,
        center: Point,
        size: Size,
        style: Style,
    ) -> Result<ElementCommon, SketchError> {
        ElementCommon::check(center, size)?;
        let id = self.ids.next_element_id();
        let seeds = Seeds::draw(&mut self.rng);
        Ok(ElementCommon::new(id, center, size, style, seeds)?)
    }

    fn prepare_shape(
        &mut self,
        kind: ShapeKind,
        center: Point,
        size: Size,
        overrides: &Style,
    ) -> Result<Shape, SketchError> {
        let style = self.profiles.resolve(StyleFamily::Box, overrides)?;
        let common = self.common(center, size, style)?;
        Ok(Shape::new(kind, common))
    }

    fn prepare_text(
        &mut self,
        content: &str,
        center: Point,
        size: Option<Size>,
        overrides: &Style,
    ) -> Result<Text, SketchError> {
        let style = self.profiles.resolve(StyleFamily::Text, overrides)?;
        let size = size.unwrap_or_else(|| Text::estimate_size(content, &style));
        let common = self.common(center, size, style)?;
        Ok(Text::new(content, common))
    }

    fn prepare_line(
        &mut self,
        variant: LineVariant,
        points: &[Point],
        overrides: &Style,
    ) -> Result<Line, SketchError> {
        let (center, size) = Line::frame(points)?;
        let style = self.profiles.resolve(
            StyleFamily::Line,
            &variant.arrowhead_style().merged(overrides),
        )?;
        let common = self.common(center, size, style)?;
        Ok(Line::new(variant, points, common)?)
    }

    fn register(&mut self, element: impl Into<Element>) -> ElementId {
        let element = element.into();
        let id = element.id().clone();
        debug!(id = id.as_str(), kind = element.kind().as_str(); "Registered element");
        self.elements.insert(id.clone(), element);
        id
    }
}

impl Default for SketchBuilder {
    fn default() -> Self {
        Self {
            config: SketchConfig::default(),
            profiles: StyleProfiles::standard(),
            ids: IdGenerator::random(),
            rng: StdRng::from_os_rng(),
            elements: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use exsketch_core::{
        element::{Arrowhead, ElementKind},
        style::{END_ARROWHEAD, STROKE_COLOR, StyleError},
    };

    fn builder() -> SketchBuilder {
        SketchBuilder::new(SketchConfig::default().with_seed(1)).unwrap()
    }

    #[test]
    fn test_new_rejects_unused_default() {
        let config = SketchConfig::default().with_defaults(Style::new().with("colour", "red"));
        let err = SketchBuilder::new(config).unwrap_err();
        assert!(matches!(
            err,
            SketchError::Configuration(StyleError::UnusedDefault { .. })
        ));
    }

    #[test]
    fn test_new_rejects_bad_background() {
        let config = SketchConfig::default().with_background_color("not-a-color");
        assert!(matches!(
            SketchBuilder::new(config),
            Err(SketchError::Configuration(StyleError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_custom_defaults_apply_to_all_families() {
        let config =
            SketchConfig::default().with_defaults(Style::new().with(STROKE_COLOR, "#1971c2"));
        let mut builder = SketchBuilder::new(config).unwrap();

        let rect = builder
            .rectangle(Point::new(0.0, 0.0), Size::new(10.0, 10.0), &Style::new())
            .unwrap();
        let text = builder.text("x", Point::new(0.0, 0.0), &Style::new()).unwrap();

        for id in [rect, text] {
            let style = builder.get(&id).unwrap().style();
            assert_eq!(style.get(STROKE_COLOR).unwrap(), "#1971c2");
        }
    }

    #[test]
    fn test_shapes_record_kind_center_and_size() {
        let mut builder = builder();
        let id = builder
            .diamond(Point::new(40.0, 60.0), Size::new(20.0, 30.0), &Style::new())
            .unwrap();

        let element = builder.get(&id).unwrap();
        assert_eq!(element.kind(), ElementKind::Diamond);
        assert_eq!(element.center(), Point::new(40.0, 60.0));
        assert_eq!(element.size(), Size::new(20.0, 30.0));
    }

    #[test]
    fn test_override_wins_over_default() {
        let mut builder = builder();
        let id = builder
            .ellipse(
                Point::new(0.0, 0.0),
                Size::new(10.0, 10.0),
                &Style::new().with(STROKE_COLOR, "#e03131"),
            )
            .unwrap();

        let style = builder.get(&id).unwrap().style();
        assert_eq!(style.get(STROKE_COLOR).unwrap(), "#e03131");
    }

    #[test]
    fn test_unknown_override_registers_nothing() {
        let mut builder = builder();
        let result = builder.rectangle(
            Point::new(0.0, 0.0),
            Size::new(10.0, 10.0),
            &Style::new().with("fontSize", 12),
        );

        assert!(matches!(
            result,
            Err(SketchError::Configuration(StyleError::UnknownKey { .. }))
        ));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_negative_size_registers_nothing() {
        let mut builder = builder();
        let result =
            builder.rectangle(Point::new(0.0, 0.0), Size::new(-5.0, 10.0), &Style::new());

        assert!(matches!(result, Err(SketchError::Geometry(_))));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_text_size_is_estimated_or_explicit() {
        let mut builder = builder();
        let estimated = builder.text("Hello", Point::new(0.0, 0.0), &Style::new()).unwrap();
        let explicit = builder
            .text_with_size("Hello", Point::new(0.0, 0.0), Size::new(300.0, 40.0), &Style::new())
            .unwrap();

        assert_approx_eq!(f32, builder.get(&estimated).unwrap().size().width(), 60.0);
        assert_eq!(builder.get(&explicit).unwrap().size(), Size::new(300.0, 40.0));
    }

    #[test]
    fn test_line_variants() {
        let mut builder = builder();
        let start = Point::new(0.0, 0.0);
        let end = Point::new(50.0, 20.0);

        let line = builder.line(start, end, &Style::new()).unwrap();
        let arrow = builder.arrow(start, end, &Style::new()).unwrap();
        let double = builder.double_arrow(start, end, &Style::new()).unwrap();

        let line = builder.get(&line).unwrap().as_line().unwrap();
        assert_eq!(line.kind(), ElementKind::Line);
        assert_eq!(line.end_arrowhead(), None);

        let arrow = builder.get(&arrow).unwrap().as_line().unwrap();
        assert_eq!(arrow.kind(), ElementKind::Arrow);
        assert_eq!(arrow.start_arrowhead(), None);
        assert_eq!(arrow.end_arrowhead(), Some(Arrowhead::Arrow));

        let double = builder.get(&double).unwrap().as_line().unwrap();
        assert_eq!(double.start_arrowhead(), Some(Arrowhead::Arrow));
        assert_eq!(double.end_arrowhead(), Some(Arrowhead::Arrow));
    }

    #[test]
    fn test_arrowhead_override_on_plain_line() {
        let mut builder = builder();
        let id = builder
            .line(
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                &Style::new().with(END_ARROWHEAD, "dot"),
            )
            .unwrap();

        let line = builder.get(&id).unwrap().as_line().unwrap();
        assert_eq!(line.end_arrowhead(), Some(Arrowhead::Dot));
    }

    #[test]
    fn test_polyline_needs_two_points() {
        let mut builder = builder();
        let result = builder.polyline(LineVariant::Line, &[Point::new(0.0, 0.0)], &Style::new());
        assert!(matches!(result, Err(SketchError::Geometry(_))));
    }

    #[test]
    fn test_elements_keep_creation_order() {
        let mut builder = builder();
        let a = builder
            .rectangle(Point::new(0.0, 0.0), Size::new(1.0, 1.0), &Style::new())
            .unwrap();
        let b = builder.text("b", Point::new(0.0, 0.0), &Style::new()).unwrap();
        let c = builder
            .line(Point::new(0.0, 0.0), Point::new(1.0, 1.0), &Style::new())
            .unwrap();

        let ids: Vec<_> = builder.elements().map(|e| e.id().clone()).collect();
        assert_eq!(ids, [a, b, c]);
        assert_eq!(builder.len(), 3);
    }

    #[test]
    fn test_sequential_ids_are_unique() {
        let mut builder = builder();
        let a = builder
            .rectangle(Point::new(0.0, 0.0), Size::new(1.0, 1.0), &Style::new())
            .unwrap();
        let b = builder
            .rectangle(Point::new(0.0, 0.0), Size::new(1.0, 1.0), &Style::new())
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(a, "00000000-0000-0000-0000-000000000001");
    }

    #[test]
    fn test_bounds_of_unknown_element() {
        let builder = builder();
        assert!(matches!(
            builder.bounds_of(&ElementId::new("missing")),
            Err(SketchError::UnknownElement(_))
        ));
    }
}
