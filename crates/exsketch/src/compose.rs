//! Composite operations: bound arrows, bounding shapes, text boxes and groups.
//!
//! These only ever add elements or append group memberships. Bindings are
//! recorded on the line; the elements they point at are left untouched and
//! learn about the line only when the document is exported.

use log::{debug, trace};

use exsketch_core::{
    element::{GeometryError, LineVariant, Primitive, ShapeKind},
    geometry::{Point, Size, antipodal_angle, normalize_angle},
    identifier::{ElementId, GroupId},
    style::{ANGLE, Style, StyleFamily},
};

use crate::{SketchBuilder, SketchError};

/// Gap kept between composed elements unless a caller asks otherwise.
pub const DEFAULT_PADDING: f32 = 10.0;

fn check_padding(padding: f32) -> Result<(), GeometryError> {
    if padding.is_finite() && padding >= 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidPadding(padding))
    }
}

impl SketchBuilder {
    /// Create a line of `variant` joining two elements, bound at both ends.
    ///
    /// The line runs along the direction between the two centers. It starts
    /// where that ray leaves `start`'s outline grown by `padding`, and ends
    /// where the opposite ray leaves `end`'s outline, so it touches both
    /// elements whatever their kinds, sizes and relative position.
    ///
    /// # Errors
    ///
    /// - [`SketchError::UnknownElement`] if either element does not exist
    /// - [`SketchError::Geometry`] with [`GeometryError::CoincidentCenters`]
    ///   when the two centers are the same point, since there is no direction
    ///   to draw along
    /// - [`SketchError::Geometry`] for a negative or non-finite padding
    /// - [`SketchError::Configuration`] for a bad style override
    pub fn create_binding_arrows(
        &mut self,
        start: &ElementId,
        end: &ElementId,
        variant: LineVariant,
        padding: f32,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        check_padding(padding)?;
        let start_element = self.element(start)?;
        let end_element = self.element(end)?;

        let start_center = start_element.center();
        let end_center = end_element.center();
        if start_center == end_center {
            return Err(GeometryError::CoincidentCenters {
                x: start_center.x(),
                y: start_center.y(),
            }
            .into());
        }

        let theta = normalize_angle(end_center.sub_point(start_center).angle());
        let start_point = start_element.edge_midpoint(theta, padding);
        let end_point = end_element.edge_midpoint(antipodal_angle(theta), padding);
        trace!(
            theta,
            start_point:?,
            end_point:?;
            "Computed binding arrow endpoints"
        );

        let mut line = self.prepare_line(variant, &[start_point, end_point], overrides)?;
        line.set_start_binding(start, padding);
        line.set_end_binding(end, padding);

        let id = self.register(line);
        debug!(
            id = id.as_str(),
            start = start.as_str(),
            end = end.as_str();
            "Bound line between elements"
        );
        Ok(id)
    }

    /// Create an arrow between two elements with [`DEFAULT_PADDING`].
    ///
    /// Shorthand for [`SketchBuilder::create_binding_arrows`] with
    /// [`LineVariant::Arrow`].
    pub fn arrow_between(
        &mut self,
        start: &ElementId,
        end: &ElementId,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        self.create_binding_arrows(start, end, LineVariant::Arrow, DEFAULT_PADDING, overrides)
    }

    /// Create a shape of `kind` around `target`, `padding` away from its
    /// bounding box on every side.
    ///
    /// The new shape shares the target's center and angle and is
    /// `2 * padding` larger in both dimensions; an `angle` in `overrides`
    /// wins over the target's. A fresh group identifier is appended to both,
    /// and the new shape's identifier is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::UnknownElement`] for a missing target, and
    /// [`SketchError::Geometry`] or [`SketchError::Configuration`] for bad
    /// input, in which case nothing is registered or grouped.
    pub fn create_bounding_element(
        &mut self,
        target: &ElementId,
        kind: ShapeKind,
        padding: f32,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        check_padding(padding)?;
        let element = self.element(target)?;
        let (center, size) = (element.center(), element.size());
        let overrides = match element.style().get(ANGLE) {
            Some(angle) if element.rotation() != 0.0 && !overrides.contains_key(ANGLE) => {
                Style::new().with(ANGLE, angle.clone()).merged(overrides)
            }
            _ => overrides.clone(),
        };
        let id = self.register_bounding_shape(center, size, kind, padding, &overrides)?;

        let group = self.ids.next_group_id();
        for member in [target, &id] {
            self.element_mut(member)?.add_group(group.clone());
        }

        debug!(id = id.as_str(), target = target.as_str(), group = group.as_str(); "Bounded element");
        Ok(id)
    }

    /// Create a shape of `kind` around every member of `group`.
    ///
    /// The shape covers the union of the members' bounds plus `padding`. The
    /// shape and all members then join a new group, so the whole set moves
    /// as one unit in the editor.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::UnknownGroup`] if no element belongs to
    /// `group`, otherwise the same errors as
    /// [`SketchBuilder::create_bounding_element`].
    pub fn create_group_bounding_element(
        &mut self,
        group: &GroupId,
        kind: ShapeKind,
        padding: f32,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        check_padding(padding)?;
        let members: Vec<ElementId> = self.group_members(group).cloned().collect();
        let bounds = members
            .iter()
            .map(|member| self.bounds_of(member))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .reduce(|acc, b| acc.merge(&b))
            .ok_or_else(|| SketchError::UnknownGroup(group.clone()))?;

        let id =
            self.register_bounding_shape(bounds.center(), bounds.to_size(), kind, padding, overrides)?;

        let outer = self.ids.next_group_id();
        for member in members.iter().chain([&id]) {
            self.element_mut(member)?.add_group(outer.clone());
        }

        debug!(
            id = id.as_str(),
            group = group.as_str(),
            members = members.len();
            "Bounded group"
        );
        Ok(id)
    }

    /// Create a text element wrapped in a rectangle, grouped together.
    ///
    /// The rectangle is [`DEFAULT_PADDING`] away from the estimated text box.
    /// Returns the rectangle's identifier; the text is reachable through the
    /// shared group, see [`SketchBuilder::group_members`].
    ///
    /// # Errors
    ///
    /// Overrides are checked against the text and box profiles respectively
    /// before anything is registered.
    pub fn create_text_box(
        &mut self,
        content: &str,
        center: Point,
        text_overrides: &Style,
        rect_overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        self.profiles.resolve(StyleFamily::Box, rect_overrides)?;

        let text = self.prepare_text(content, center, None, text_overrides)?;
        let text = self.register(text);
        self.create_bounding_element(&text, ShapeKind::Rectangle, DEFAULT_PADDING, rect_overrides)
    }

    /// Put existing elements into a new group and return its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::UnknownElement`] if any member is missing; no
    /// element is grouped in that case.
    pub fn group(&mut self, members: &[ElementId]) -> Result<GroupId, SketchError> {
        for member in members {
            self.element(member)?;
        }

        let group = self.ids.next_group_id();
        for member in members {
            self.element_mut(member)?.add_group(group.clone());
        }

        debug!(group = group.as_str(), members = members.len(); "Grouped elements");
        Ok(group)
    }

    /// Returns the identifiers of the elements in `group`, in creation order.
    pub fn group_members<'a>(&'a self, group: &'a GroupId) -> impl Iterator<Item = &'a ElementId> {
        self.elements
            .iter()
            .filter(move |(_, element)| element.group_ids().contains(group))
            .map(|(id, _)| id)
    }

    fn register_bounding_shape(
        &mut self,
        center: Point,
        size: Size,
        kind: ShapeKind,
        padding: f32,
        overrides: &Style,
    ) -> Result<ElementId, SketchError> {
        let shape = self.prepare_shape(kind, center, size.inflate(padding), overrides)?;
        Ok(self.register(shape))
    }
}
