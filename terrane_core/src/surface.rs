// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing surface the compositor paints into.

use kurbo::{Affine, Rect};
use peniko::Color;

use crate::layer::Shadow;

/// An immediate-mode drawing target with a saved-state stack.
///
/// The compositor issues calls in logical coordinates; a backend maps them
/// to its device as it sees fit. `save` and `restore` bracket the current
/// transform and clip, and every clip intersects with the one in effect.
pub trait Surface {
    /// Pushes the current transform and clip state.
    fn save(&mut self);

    /// Pops back to the most recent [`save`](Self::save).
    fn restore(&mut self);

    /// Translates the coordinate system.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Scales the coordinate system about the current origin.
    fn scale(&mut self, sx: f64, sy: f64);

    /// Concatenates a full affine matrix onto the current transform.
    fn concat(&mut self, transform: Affine);

    /// Intersects the current clip with `rect`.
    fn clip_rect(&mut self, rect: Rect);

    /// Fills `rect`, rounded by `corner_radius`, with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color, corner_radius: f64);

    /// Strokes the inside edge of `rect`, rounded by `corner_radius`.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64, corner_radius: f64);

    /// Paints a drop shadow for a layer occupying `rect`.
    fn draw_shadow(&mut self, rect: Rect, shadow: &Shadow, corner_radius: f64);
}
