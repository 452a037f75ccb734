// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive tree-to-surface compositing.
//!
//! [`composite`] walks a layer subtree in paint order and issues surface
//! calls for each visible layer: shadow, background, owner content,
//! children, border. The walk is read-only; repaint flags are the
//! embedder's to manage.
//!
//! Geometry is issued in logical points. A layer's transform rides on its
//! frame placement: the scale-only family resolves to translate and scale
//! calls, while a general matrix is concatenated pivoted at the layer's
//! center.

use kurbo::Point;

use terrane_core::layer::{LayerId, LayerTree, Shadow};
use terrane_core::owner::OwnerBridge;
use terrane_core::surface::Surface;
use terrane_core::transform::Transform;

/// Layers with a cumulative opacity below this are skipped entirely,
/// subtree included.
pub const MIN_VISIBLE_OPACITY: f32 = 0.01;

/// Composites the subtree rooted at `root` onto `surface`.
///
/// The root is placed at its frame origin in the surface's current
/// coordinate system. Owners with custom content are drawn through
/// `bridge`, clipped to their layer's bounds.
///
/// # Panics
///
/// Panics if `root` is stale.
pub fn composite(
    tree: &LayerTree,
    root: LayerId,
    surface: &mut dyn Surface,
    bridge: &mut dyn OwnerBridge,
) {
    let origin = tree.frame(root).origin();
    composite_layer(tree, root, origin, 1.0, surface, bridge);
}

fn composite_layer(
    tree: &LayerTree,
    id: LayerId,
    offset: Point,
    inherited_opacity: f32,
    surface: &mut dyn Surface,
    bridge: &mut dyn OwnerBridge,
) {
    if tree.is_hidden(id) {
        return;
    }
    let opacity = inherited_opacity * tree.opacity(id);
    if opacity < MIN_VISIBLE_OPACITY {
        return;
    }

    let frame = tree.frame(id);
    let bounds = tree.bounds(id);
    let local = frame.size().to_rect();
    let corner_radius = tree.corner_radius(id);

    surface.save();
    surface.translate(offset.x, offset.y);

    match tree.transform(id) {
        Transform::Identity => {}
        Transform::ScaleTranslate { sx, sy, tx, ty } => {
            if tx != 0.0 || ty != 0.0 {
                surface.translate(tx, ty);
            }
            if sx != 1.0 || sy != 1.0 {
                let center = local.center();
                surface.translate(center.x, center.y);
                surface.scale(sx, sy);
                surface.translate(-center.x, -center.y);
            }
        }
        Transform::General(affine) => {
            let center = local.center();
            surface.translate(center.x, center.y);
            surface.concat(affine);
            surface.translate(-center.x, -center.y);
        }
    }

    let shadow = tree.shadow(id);
    if shadow.opacity > 0.0 {
        let faded = Shadow {
            opacity: shadow.opacity * opacity,
            ..shadow.clone()
        };
        surface.draw_shadow(local, &faded, corner_radius);
    }

    let background = tree.background(id);
    if background.components[3] > 0.0 {
        surface.fill_rect(local, background.multiply_alpha(opacity), corner_radius);
    }

    if tree.supports_drawing(id)
        && let Some(owner) = tree.owner(id)
    {
        // Owner content never escapes the layer. The owner draws in bounds
        // coordinates, so a scrolled origin shifts its content like it
        // shifts children.
        surface.save();
        surface.clip_rect(local);
        if bounds.origin() != Point::ZERO {
            surface.translate(-bounds.x0, -bounds.y0);
        }
        bridge.draw(surface, owner, bounds);
        surface.restore();
    }

    let clip_children = tree.clips_to_bounds(id);
    if clip_children {
        surface.save();
        surface.clip_rect(local);
    }
    for child in tree.children(id) {
        let child_frame = tree.frame(child);
        // A clipped-out child paints nothing; skip its whole subtree.
        if clip_children && !bounds.overlaps(child_frame) {
            continue;
        }
        let child_offset = Point::new(
            child_frame.x0 - bounds.x0,
            child_frame.y0 - bounds.y0,
        );
        composite_layer(tree, child, child_offset, opacity, surface, bridge);
    }
    if clip_children {
        surface.restore();
    }

    let (border_color, border_width) = tree.border(id);
    if border_width > 0.0 && border_color.components[3] > 0.0 {
        surface.stroke_rect(
            local,
            border_color.multiply_alpha(opacity),
            border_width,
            corner_radius,
        );
    }

    surface.restore();
}
