// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bridge back into the embedding view layer.
//!
//! The core never calls into view objects directly. Where a layer needs its
//! owner to act, the tree hands an [`OwnerId`] to an [`OwnerBridge`]
//! supplied by the embedder, which dispatches to the live view object or
//! silently drops the call if the owner has been torn down.

use kurbo::{Rect, Size};

use crate::layer::{LayerTree, OwnerId};
use crate::surface::Surface;

/// Embedder-side dispatch for owner callbacks.
///
/// All methods default to no-ops so an embedder only implements the hooks
/// its views use. A bridge must tolerate owner IDs whose view object no
/// longer exists.
pub trait OwnerBridge {
    /// Positions the owner's subviews. Called at most once per owner per
    /// layout pass, parent before child.
    ///
    /// The bridge may mutate the tree freely; frame changes made here do
    /// not schedule another pass.
    fn layout_subviews(&mut self, tree: &mut LayerTree, owner: OwnerId) {
        let _ = (tree, owner);
    }

    /// Draws the owner's custom content into `surface`. The surface is
    /// already clipped to the layer; `dirty` is the region that must be
    /// repainted, in the layer's bounds coordinates (a scrolled bounds
    /// origin is included).
    fn draw(&mut self, surface: &mut dyn Surface, owner: OwnerId, dirty: Rect) {
        let _ = (surface, owner, dirty);
    }

    /// Returns the size the owner's content wants within `constraints`, or
    /// `None` to keep the current size.
    fn size_hint(&mut self, owner: OwnerId, constraints: Size) -> Option<Size> {
        let _ = (owner, constraints);
        None
    }
}

/// A bridge with no owners behind it; every callback is a no-op.
///
/// Useful for tests and for trees whose layers are driven purely by
/// property setters.
#[derive(Debug, Default)]
pub struct NoOwners;

impl OwnerBridge for NoOwners {}
