// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recorded display list.
//!
//! [`DisplayList`] is a [`Surface`] that records every call as a
//! [`DrawOp`] instead of painting. Backends replay the ops against a real
//! target; tests assert on them directly.

use kurbo::{Affine, BezPath, Rect, Vec2};
use peniko::Color;

use terrane_core::layer::Shadow;
use terrane_core::surface::Surface;

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs, reason = "fields mirror the `Surface` parameters")]
pub enum DrawOp {
    /// Pushed transform and clip state.
    Save,
    /// Popped back to the matching [`Save`](Self::Save).
    Restore,
    /// Translated the coordinate system.
    Translate { dx: f64, dy: f64 },
    /// Scaled the coordinate system.
    Scale { sx: f64, sy: f64 },
    /// Concatenated a full affine matrix.
    Concat { transform: Affine },
    /// Intersected the clip with a rectangle.
    ClipRect { rect: Rect },
    /// Filled a rounded rectangle with a solid color.
    FillRect {
        rect: Rect,
        color: Color,
        corner_radius: f64,
    },
    /// Stroked the inside edge of a rounded rectangle.
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f64,
        corner_radius: f64,
    },
    /// Painted a drop shadow for a layer rectangle.
    Shadow {
        rect: Rect,
        color: Color,
        opacity: f32,
        offset: Vec2,
        blur: f64,
        corner_radius: f64,
        path: Option<BezPath>,
    },
}

/// A surface that records draw calls into a vector of [`DrawOp`]s.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    /// The recorded ops, in call order.
    pub ops: Vec<DrawOp>,
}

impl DisplayList {
    /// Creates an empty display list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the recorded ops, keeping the allocation.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for DisplayList {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.ops.push(DrawOp::Scale { sx, sy });
    }

    fn concat(&mut self, transform: Affine) {
        self.ops.push(DrawOp::Concat { transform });
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::ClipRect { rect });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, corner_radius: f64) {
        self.ops.push(DrawOp::FillRect {
            rect,
            color,
            corner_radius,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64, corner_radius: f64) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            color,
            width,
            corner_radius,
        });
    }

    fn draw_shadow(&mut self, rect: Rect, shadow: &Shadow, corner_radius: f64) {
        self.ops.push(DrawOp::Shadow {
            rect,
            color: shadow.color,
            opacity: shadow.opacity,
            offset: shadow.offset,
            blur: shadow.radius,
            corner_radius,
            path: shadow.path.clone(),
        });
    }
}
