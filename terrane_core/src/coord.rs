// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion between logical points and device pixels.
//!
//! All caller-facing geometry is expressed in *logical points*. A display's
//! density factor (the *scale*) relates logical points to physical *device
//! pixels*: `device = logical * scale`. These functions are pure; the scale
//! factor is carried by the [`LayerTree`](crate::layer::LayerTree) and
//! assumed uniform for a given display.

use kurbo::{Point, Rect, Size, Vec2};

/// Converts a logical point to device pixels.
#[inline]
#[must_use]
pub fn to_device(point: Point, scale: f64) -> Point {
    Point::new(point.x * scale, point.y * scale)
}

/// Converts a device-pixel point back to logical points.
#[inline]
#[must_use]
pub fn to_logical(point: Point, scale: f64) -> Point {
    Point::new(point.x / scale, point.y / scale)
}

/// Converts a logical size to device pixels.
#[inline]
#[must_use]
pub fn to_device_size(size: Size, scale: f64) -> Size {
    Size::new(size.width * scale, size.height * scale)
}

/// Converts a device-pixel size back to logical points.
#[inline]
#[must_use]
pub fn to_logical_size(size: Size, scale: f64) -> Size {
    Size::new(size.width / scale, size.height / scale)
}

/// Converts a logical vector (offset) to device pixels.
#[inline]
#[must_use]
pub fn to_device_vec(vec: Vec2, scale: f64) -> Vec2 {
    Vec2::new(vec.x * scale, vec.y * scale)
}

/// Converts a logical rectangle to device pixels.
///
/// All four edges are scaled, so both the origin and the size of the result
/// are in device pixels.
#[inline]
#[must_use]
pub fn to_device_rect(rect: Rect, scale: f64) -> Rect {
    Rect::new(
        rect.x0 * scale,
        rect.y0 * scale,
        rect.x1 * scale,
        rect.y1 * scale,
    )
}

/// Converts a device-pixel rectangle back to logical points.
#[inline]
#[must_use]
pub fn to_logical_rect(rect: Rect, scale: f64) -> Rect {
    Rect::new(
        rect.x0 / scale,
        rect.y0 / scale,
        rect.x1 / scale,
        rect.y1 / scale,
    )
}

/// Snaps a device-pixel coordinate up to the next whole pixel.
///
/// Resolved layer origins are pixel-snapped with `ceil` so that edges land
/// on pixel boundaries.
#[inline]
#[must_use]
pub fn device_ceil(value: f64) -> f64 {
    value.ceil()
}
