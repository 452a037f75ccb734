// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer properties and the resolved device-pixel state derived from
//! them.
//!
//! Callers set geometry in logical points through [`LayerTree::set_frame`],
//! [`LayerTree::set_bounds`], and [`LayerTree::set_transform`]. The tree
//! immediately resolves those into device-pixel placement: a pixel-snapped
//! origin relative to the parent's bounds, plus either direct scale factors
//! (the scale-only fast path) or a full device matrix (the general path).
//!
//! Frame and bounds mirror each other's size. Setting one updates the size
//! of the other, so `frame.size() == bounds.size()` holds at all times.

use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;

use super::id::{INVALID, LayerId, OwnerId};
use super::tree::LayerTree;
use crate::coord;
use crate::layout::LayoutState;
use crate::transform::Transform;

/// A drop shadow painted behind a layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Shadow {
    /// Shadow color (the alpha channel is ignored; see `opacity`).
    pub color: Color,
    /// Shadow opacity in `[0, 1]`. Zero disables the shadow entirely.
    pub opacity: f32,
    /// Offset from the layer in logical points.
    pub offset: Vec2,
    /// Blur radius in logical points.
    pub radius: f64,
    /// Explicit shadow outline. When absent the layer's rounded bounds are
    /// used.
    pub path: Option<BezPath>,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            opacity: 0.0,
            offset: Vec2::new(0.0, -3.0),
            radius: 3.0,
            path: None,
        }
    }
}

/// Caller-set properties of a single layer, in logical points.
#[derive(Clone, Debug)]
pub(crate) struct Props {
    /// Position and size within the parent's bounds space.
    pub(crate) frame: Rect,
    /// The layer's own coordinate space. The origin offsets children; the
    /// size always matches the frame's.
    pub(crate) bounds: Rect,
    /// Transform applied on top of frame placement.
    pub(crate) transform: Transform,
    /// Group opacity in `[0, 1]`.
    pub(crate) opacity: f32,
    pub(crate) background: Color,
    pub(crate) corner_radius: f64,
    pub(crate) border_color: Color,
    pub(crate) border_width: f64,
    pub(crate) shadow: Shadow,
    pub(crate) hidden: bool,
    pub(crate) clips_to_bounds: bool,
    /// Whether the owner draws custom content into this layer.
    pub(crate) supports_drawing: bool,
    pub(crate) owner: Option<OwnerId>,
}

impl Default for Props {
    fn default() -> Self {
        Self {
            frame: Rect::ZERO,
            bounds: Rect::ZERO,
            transform: Transform::Identity,
            opacity: 1.0,
            background: Color::TRANSPARENT,
            corner_radius: 0.0,
            border_color: Color::TRANSPARENT,
            border_width: 0.0,
            shadow: Shadow::default(),
            hidden: false,
            clips_to_bounds: false,
            supports_drawing: false,
            owner: None,
        }
    }
}

/// Device-pixel state derived from a layer's properties.
#[derive(Clone, Debug)]
pub(crate) struct Resolved {
    /// Pixel-snapped origin relative to the parent's bounds, in device
    /// pixels, with any scale-only translation correction folded in.
    pub(crate) device_origin: Point,
    /// Horizontal scale factor from a scale-only transform.
    pub(crate) scale_x: f64,
    /// Vertical scale factor from a scale-only transform.
    pub(crate) scale_y: f64,
    /// Device-pixel translation contributed by a scale-only transform.
    pub(crate) correction: Vec2,
    /// Full device matrix, present only for general transforms. Unpivoted;
    /// the compositor applies it centered on the layer.
    pub(crate) matrix: Option<Affine>,
    /// Whether the layer's content must be repainted.
    pub(crate) needs_display: bool,
}

impl Default for Resolved {
    fn default() -> Self {
        Self {
            device_origin: Point::ZERO,
            scale_x: 1.0,
            scale_y: 1.0,
            correction: Vec2::ZERO,
            matrix: None,
            needs_display: true,
        }
    }
}

impl LayerTree {
    // -- Geometry --

    /// Returns the layer's frame in logical points.
    #[must_use]
    pub fn frame(&self, id: LayerId) -> Rect {
        self.validate(id);
        self.props[id.idx as usize].frame
    }

    /// Sets the layer's frame: its position and size within the parent's
    /// bounds space, in logical points.
    ///
    /// The bounds size mirrors the new frame size. The device origin is
    /// re-resolved immediately; a size change additionally invalidates
    /// layout for the subtree.
    pub fn set_frame(&mut self, id: LayerId, frame: Rect) {
        self.validate(id);
        let idx = id.idx;
        let old = self.props[idx as usize].frame;
        if old == frame {
            return;
        }
        let size_changed = old.size() != frame.size();

        self.props[idx as usize].frame = frame;
        let bounds = self.props[idx as usize].bounds;
        self.props[idx as usize].bounds = Rect::from_origin_size(bounds.origin(), frame.size());

        self.update_origin(idx);
        if size_changed {
            self.invalidate_layout_index(idx, LayoutState::DirtySubtree);
        }
        self.mark_display(idx);
    }

    /// Returns the layer's bounds in logical points.
    #[must_use]
    pub fn bounds(&self, id: LayerId) -> Rect {
        self.validate(id);
        self.props[id.idx as usize].bounds
    }

    /// Sets the layer's bounds: its own coordinate space, in logical points.
    ///
    /// The frame size mirrors the new bounds size. Changing the bounds
    /// origin scrolls the content: every direct child is repositioned
    /// against the new origin without running its layout.
    pub fn set_bounds(&mut self, id: LayerId, bounds: Rect) {
        self.validate(id);
        let idx = id.idx;
        let old = self.props[idx as usize].bounds;
        if old == bounds {
            return;
        }
        let origin_changed = old.origin() != bounds.origin();
        let size_changed = old.size() != bounds.size();

        self.props[idx as usize].bounds = bounds;
        let frame = self.props[idx as usize].frame;
        self.props[idx as usize].frame = Rect::from_origin_size(frame.origin(), bounds.size());

        if origin_changed {
            // Reposition children only; their own layout is not rerun.
            self.push_layout_suppression();
            for child in self.collect_children(idx) {
                self.update_origin_against(child, bounds);
            }
            self.pop_layout_suppression();
            self.invalidate_layout_index(idx, LayoutState::DirtySelf);
        }
        if size_changed {
            self.invalidate_layout_index(idx, LayoutState::DirtySubtree);
        }
        self.mark_display(idx);
    }

    /// Returns the layer's transform.
    #[must_use]
    pub fn transform(&self, id: LayerId) -> Transform {
        self.validate(id);
        self.props[id.idx as usize].transform
    }

    /// Sets the layer's transform.
    ///
    /// A scale-only transform resolves onto the fast path: scale factors are
    /// stored directly and the translation becomes a device-pixel correction
    /// folded into the resolved origin, with no matrix retained. A general
    /// transform stores the full device matrix, applied centered on the
    /// layer at composite time.
    pub fn set_transform(&mut self, id: LayerId, transform: Transform) {
        self.validate(id);
        let idx = id.idx;
        if self.props[idx as usize].transform == transform {
            return;
        }
        self.props[idx as usize].transform = transform;

        match transform {
            Transform::Identity => {
                self.resolved[idx as usize].matrix = None;
                self.resolved[idx as usize].scale_x = 1.0;
                self.resolved[idx as usize].scale_y = 1.0;
                self.clear_correction(idx);
            }
            Transform::ScaleTranslate { sx, sy, tx, ty } => {
                self.resolved[idx as usize].matrix = None;
                self.resolved[idx as usize].scale_x = sx;
                self.resolved[idx as usize].scale_y = sy;
                let correction = Vec2::new(tx * self.scale, ty * self.scale);
                if self.resolved[idx as usize].correction != correction {
                    self.resolved[idx as usize].correction = correction;
                    self.update_origin(idx);
                }
            }
            Transform::General(affine) => {
                let [a, b, c, d, tx, ty] = affine.as_coeffs();
                let device = Affine::new([a, b, c, d, tx * self.scale, ty * self.scale]);
                self.resolved[idx as usize].matrix = Some(device);
                self.resolved[idx as usize].scale_x = 1.0;
                self.resolved[idx as usize].scale_y = 1.0;
                self.clear_correction(idx);
            }
        }
        self.mark_display(idx);
    }

    // -- Visual attributes --

    /// Returns the layer's group opacity.
    #[must_use]
    pub fn opacity(&self, id: LayerId) -> f32 {
        self.validate(id);
        self.props[id.idx as usize].opacity
    }

    /// Sets the layer's group opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, id: LayerId, opacity: f32) {
        self.validate(id);
        self.props[id.idx as usize].opacity = opacity.clamp(0.0, 1.0);
        self.mark_display(id.idx);
    }

    /// Returns the layer's background color.
    #[must_use]
    pub fn background(&self, id: LayerId) -> Color {
        self.validate(id);
        self.props[id.idx as usize].background
    }

    /// Sets the layer's background color.
    pub fn set_background(&mut self, id: LayerId, color: Color) {
        self.validate(id);
        self.props[id.idx as usize].background = color;
        self.mark_display(id.idx);
    }

    /// Returns the layer's corner radius in logical points.
    #[must_use]
    pub fn corner_radius(&self, id: LayerId) -> f64 {
        self.validate(id);
        self.props[id.idx as usize].corner_radius
    }

    /// Sets the layer's corner radius in logical points.
    pub fn set_corner_radius(&mut self, id: LayerId, radius: f64) {
        self.validate(id);
        self.props[id.idx as usize].corner_radius = radius.max(0.0);
        self.mark_display(id.idx);
    }

    /// Returns the layer's border color and width.
    #[must_use]
    pub fn border(&self, id: LayerId) -> (Color, f64) {
        self.validate(id);
        let p = &self.props[id.idx as usize];
        (p.border_color, p.border_width)
    }

    /// Sets the layer's border, stroked inside the frame above all children.
    pub fn set_border(&mut self, id: LayerId, color: Color, width: f64) {
        self.validate(id);
        self.props[id.idx as usize].border_color = color;
        self.props[id.idx as usize].border_width = width.max(0.0);
        self.mark_display(id.idx);
    }

    /// Returns the layer's shadow.
    #[must_use]
    pub fn shadow(&self, id: LayerId) -> &Shadow {
        self.validate(id);
        &self.props[id.idx as usize].shadow
    }

    /// Sets the layer's shadow. The opacity is clamped to `[0, 1]`.
    pub fn set_shadow(&mut self, id: LayerId, mut shadow: Shadow) {
        self.validate(id);
        shadow.opacity = shadow.opacity.clamp(0.0, 1.0);
        self.props[id.idx as usize].shadow = shadow;
        self.mark_display(id.idx);
    }

    /// Returns whether the layer is hidden.
    #[must_use]
    pub fn is_hidden(&self, id: LayerId) -> bool {
        self.validate(id);
        self.props[id.idx as usize].hidden
    }

    /// Shows or hides the layer. A hidden layer and its entire subtree are
    /// skipped at composite time but keep participating in layout.
    pub fn set_hidden(&mut self, id: LayerId, hidden: bool) {
        self.validate(id);
        self.props[id.idx as usize].hidden = hidden;
        self.mark_display(id.idx);
    }

    /// Returns whether the owner draws custom content into this layer.
    #[must_use]
    pub fn supports_drawing(&self, id: LayerId) -> bool {
        self.validate(id);
        self.props[id.idx as usize].supports_drawing
    }

    /// Declares whether the owner draws custom content into this layer.
    pub fn set_supports_drawing(&mut self, id: LayerId, supports: bool) {
        self.validate(id);
        self.props[id.idx as usize].supports_drawing = supports;
    }

    /// Returns the owner presented by this layer, if any.
    #[must_use]
    pub fn owner(&self, id: LayerId) -> Option<OwnerId> {
        self.validate(id);
        self.props[id.idx as usize].owner
    }

    /// Assigns or clears the owner presented by this layer.
    pub fn set_owner(&mut self, id: LayerId, owner: Option<OwnerId>) {
        self.validate(id);
        self.props[id.idx as usize].owner = owner;
    }

    // -- Resolved state --

    /// Returns the resolved device-pixel origin relative to the parent's
    /// bounds.
    #[must_use]
    pub fn resolved_origin(&self, id: LayerId) -> Point {
        self.validate(id);
        self.resolved[id.idx as usize].device_origin
    }

    /// Returns the resolved scale factors from a scale-only transform.
    #[must_use]
    pub fn resolved_scale(&self, id: LayerId) -> (f64, f64) {
        self.validate(id);
        let r = &self.resolved[id.idx as usize];
        (r.scale_x, r.scale_y)
    }

    /// Returns the full device matrix, present only for general transforms.
    #[must_use]
    pub fn resolved_matrix(&self, id: LayerId) -> Option<Affine> {
        self.validate(id);
        self.resolved[id.idx as usize].matrix
    }

    /// Marks the layer's content as needing repaint.
    pub fn set_needs_display(&mut self, id: LayerId) {
        self.validate(id);
        self.mark_display(id.idx);
    }

    /// Returns and clears the layer's repaint flag.
    pub fn take_needs_display(&mut self, id: LayerId) -> bool {
        self.validate(id);
        core::mem::take(&mut self.resolved[id.idx as usize].needs_display)
    }

    /// Number of device-origin resolutions performed so far. Monotonic;
    /// useful for asserting that property changes do or do not reposition
    /// layers.
    #[must_use]
    pub fn origin_update_count(&self) -> u64 {
        self.origin_updates
    }

    // -- Internal resolution --

    /// Marks a layer and its parent as needing repaint.
    pub(crate) fn mark_display(&mut self, idx: u32) {
        self.resolved[idx as usize].needs_display = true;
        let p = self.parent[idx as usize];
        if p != INVALID {
            self.resolved[p as usize].needs_display = true;
        }
    }

    /// Re-resolves a layer's device origin against its current parent.
    pub(crate) fn update_origin(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let parent_bounds = if p == INVALID {
            Rect::ZERO
        } else {
            self.props[p as usize].bounds
        };
        self.update_origin_against(idx, parent_bounds);
    }

    /// Re-resolves a layer's device origin against the given parent bounds
    /// (logical points).
    ///
    /// The origin is the frame origin relative to the parent bounds origin,
    /// scaled to device pixels, snapped up to whole pixels, plus the
    /// scale-only translation correction.
    pub(crate) fn update_origin_against(&mut self, idx: u32, parent_bounds: Rect) {
        let fr = coord::to_device_rect(self.props[idx as usize].frame, self.scale);
        let pb = coord::to_device_rect(parent_bounds, self.scale);
        let correction = self.resolved[idx as usize].correction;
        self.resolved[idx as usize].device_origin = Point::new(
            coord::device_ceil(fr.x0 - pb.x0) + correction.x,
            coord::device_ceil(fr.y0 - pb.y0) + correction.y,
        );
        self.origin_updates += 1;
    }

    /// Zeroes the scale-only correction, re-resolving the origin if it was
    /// in effect.
    fn clear_correction(&mut self, idx: u32) {
        if self.resolved[idx as usize].correction != Vec2::ZERO {
            self.resolved[idx as usize].correction = Vec2::ZERO;
            self.update_origin(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::from_origin_size(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn frame_and_bounds_sizes_mirror() {
        let mut t = LayerTree::new(1.0);
        let id = t.create_layer();

        t.set_frame(id, rect(10.0, 20.0, 100.0, 50.0));
        assert_eq!(t.bounds(id).size(), Size::new(100.0, 50.0));
        assert_eq!(t.bounds(id).origin(), Point::ZERO);

        t.set_bounds(id, rect(0.0, 0.0, 200.0, 80.0));
        assert_eq!(t.frame(id).size(), Size::new(200.0, 80.0));
        assert_eq!(t.frame(id).origin(), Point::new(10.0, 20.0));
    }

    #[test]
    fn origin_resolves_with_pixel_snapping() {
        let mut t = LayerTree::new(2.0);
        let id = t.create_layer();

        t.set_frame(id, rect(10.5, 20.25, 50.0, 50.0));
        // ceil(10.5 * 2) = 21, ceil(20.25 * 2) = 41.
        assert_eq!(t.resolved_origin(id), Point::new(21.0, 41.0));
    }

    #[test]
    fn origin_is_relative_to_parent_bounds() {
        let mut t = LayerTree::new(1.0);
        let parent = t.create_layer();
        let child = t.create_layer();
        t.set_frame(parent, rect(0.0, 0.0, 100.0, 100.0));
        t.add_child(parent, child);
        t.set_frame(child, rect(10.0, 10.0, 20.0, 20.0));
        assert_eq!(t.resolved_origin(child), Point::new(10.0, 10.0));

        // Scrolling the parent shifts every child origin.
        t.set_bounds(parent, rect(5.0, 8.0, 100.0, 100.0));
        assert_eq!(t.resolved_origin(child), Point::new(5.0, 2.0));
    }

    #[test]
    fn bounds_origin_change_skips_child_layout() {
        let mut t = LayerTree::new(1.0);
        let parent = t.create_layer();
        let child = t.create_layer();
        t.set_frame(parent, rect(0.0, 0.0, 100.0, 100.0));
        t.add_child(parent, child);
        t.set_frame(child, rect(10.0, 10.0, 20.0, 20.0));
        t.flush_layout(&mut crate::owner::NoOwners);

        t.set_bounds(parent, rect(0.0, 50.0, 100.0, 100.0));
        assert_eq!(t.resolved_origin(child), Point::new(10.0, -40.0));
        // The child was repositioned but its own layout stays clean.
        assert_eq!(t.layout_state(child), LayoutState::Clean);
        assert_ne!(t.layout_state(parent), LayoutState::Clean);
    }

    #[test]
    fn bounds_origin_shift_scales_to_device_pixels() {
        let mut t = LayerTree::new(2.0);
        let a = t.create_layer();
        let b = t.create_layer();
        t.set_frame(a, rect(0.0, 0.0, 100.0, 100.0));
        t.add_child(a, b);
        t.set_frame(b, rect(10.0, 10.0, 50.0, 50.0));

        t.set_bounds(a, rect(5.0, 5.0, 100.0, 100.0));
        assert_eq!(t.resolved_origin(b), Point::new(10.0, 10.0));
    }

    #[test]
    fn reassigning_identity_does_no_origin_work() {
        let mut t = LayerTree::new(1.0);
        let id = t.create_layer();
        let count = t.origin_update_count();

        t.set_transform(id, Transform::Identity);
        assert_eq!(t.origin_update_count(), count);
    }

    #[test]
    fn reassigning_the_same_scale_resolves_the_origin_once() {
        let mut t = LayerTree::new(1.0);
        let id = t.create_layer();
        t.set_frame(id, rect(0.0, 0.0, 10.0, 10.0));
        let count = t.origin_update_count();

        let transform = Transform::from_coeffs([2.0, 0.0, 0.0, 2.0, 3.0, 4.0]);
        t.set_transform(id, transform);
        t.set_transform(id, transform);
        assert_eq!(t.origin_update_count(), count + 1);
    }

    #[test]
    fn equal_frame_is_a_no_op() {
        let mut t = LayerTree::new(1.0);
        let id = t.create_layer();
        t.set_frame(id, rect(1.0, 2.0, 3.0, 4.0));
        let count = t.origin_update_count();
        t.set_frame(id, rect(1.0, 2.0, 3.0, 4.0));
        assert_eq!(t.origin_update_count(), count);
    }

    #[test]
    fn frame_move_without_resize_keeps_layout_clean() {
        let mut t = LayerTree::new(1.0);
        let id = t.create_layer();
        t.set_frame(id, rect(0.0, 0.0, 10.0, 10.0));
        t.flush_layout(&mut crate::owner::NoOwners);

        t.set_frame(id, rect(5.0, 5.0, 10.0, 10.0));
        assert_eq!(t.layout_state(id), LayoutState::Clean);
        assert!(!t.layout_scheduled());

        t.set_frame(id, rect(5.0, 5.0, 20.0, 10.0));
        assert_eq!(t.layout_state(id), LayoutState::DirtySubtree);
        assert!(t.layout_scheduled());
    }

    #[test]
    fn scale_only_transform_resolves_without_matrix() {
        let mut t = LayerTree::new(2.0);
        let id = t.create_layer();
        t.set_frame(id, rect(10.0, 10.0, 40.0, 40.0));

        t.set_transform(id, Transform::from_coeffs([2.0, 0.0, 0.0, 2.0, 5.0, 3.0]));
        assert_eq!(t.resolved_matrix(id), None);
        assert_eq!(t.resolved_scale(id), (2.0, 2.0));
        // Translation becomes a device-pixel correction on the origin:
        // ceil(10 * 2) + 5 * 2 = 30, ceil(10 * 2) + 3 * 2 = 26.
        assert_eq!(t.resolved_origin(id), Point::new(30.0, 26.0));
    }

    #[test]
    fn general_transform_resolves_to_device_matrix() {
        let mut t = LayerTree::new(2.0);
        let id = t.create_layer();
        t.set_frame(id, rect(10.0, 10.0, 40.0, 40.0));

        t.set_transform(id, Transform::from_coeffs([0.0, 1.0, -1.0, 0.0, 4.0, 0.0]));
        let m = t.resolved_matrix(id).unwrap();
        // Linear part unchanged, translation scaled to device pixels.
        assert_eq!(m.as_coeffs(), [0.0, 1.0, -1.0, 0.0, 8.0, 0.0]);
        assert_eq!(t.resolved_scale(id), (1.0, 1.0));
        // The origin carries no correction on the general path.
        assert_eq!(t.resolved_origin(id), Point::new(20.0, 20.0));
    }

    #[test]
    fn resetting_transform_restores_origin() {
        let mut t = LayerTree::new(1.0);
        let id = t.create_layer();
        t.set_frame(id, rect(10.0, 10.0, 40.0, 40.0));

        t.set_transform(id, Transform::translate(7.0, -2.0));
        assert_eq!(t.resolved_origin(id), Point::new(17.0, 8.0));

        t.set_transform(id, Transform::Identity);
        assert_eq!(t.resolved_origin(id), Point::new(10.0, 10.0));
        assert_eq!(t.resolved_scale(id), (1.0, 1.0));
        assert_eq!(t.resolved_matrix(id), None);
    }

    #[test]
    fn switching_general_to_scale_only_drops_matrix() {
        let mut t = LayerTree::new(1.0);
        let id = t.create_layer();
        t.set_frame(id, rect(0.0, 0.0, 10.0, 10.0));

        t.set_transform(id, Transform::rotate(0.5));
        assert!(t.resolved_matrix(id).is_some());

        t.set_transform(id, Transform::scale(3.0, 3.0));
        assert_eq!(t.resolved_matrix(id), None);
        assert_eq!(t.resolved_scale(id), (3.0, 3.0));
    }

    #[test]
    fn opacity_and_shadow_opacity_clamp() {
        let mut t = LayerTree::new(1.0);
        let id = t.create_layer();

        t.set_opacity(id, 1.7);
        assert_eq!(t.opacity(id), 1.0);
        t.set_opacity(id, -0.2);
        assert_eq!(t.opacity(id), 0.0);

        t.set_shadow(
            id,
            Shadow {
                opacity: 2.0,
                ..Shadow::default()
            },
        );
        assert_eq!(t.shadow(id).opacity, 1.0);
    }

    #[test]
    fn needs_display_is_taken_once() {
        let mut t = LayerTree::new(1.0);
        let id = t.create_layer();
        assert!(t.take_needs_display(id));
        assert!(!t.take_needs_display(id));

        t.set_background(id, Color::from_rgba8(255, 0, 0, 255));
        assert!(t.take_needs_display(id));
    }

    #[test]
    fn property_change_marks_parent_for_display() {
        let mut t = LayerTree::new(1.0);
        let parent = t.create_layer();
        let child = t.create_layer();
        t.add_child(parent, child);
        let _ = t.take_needs_display(parent);

        t.set_hidden(child, true);
        assert!(t.take_needs_display(parent));
    }
}
