// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity types for layers and their owners.

use core::fmt;

/// Index value meaning "no layer" in the tree's link arrays.
pub const INVALID: u32 = u32::MAX;

/// A generational handle to a layer in a [`LayerTree`](super::LayerTree).
///
/// Slots are recycled, so an index alone could silently alias a newer layer
/// living in the same slot. The generation pins the handle to one lifetime
/// of the slot: every tree operation checks it and panics on a mismatch
/// instead of touching the wrong layer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId {
    /// Slot index into the tree's arrays.
    pub(crate) idx: u32,
    /// Which lifetime of the slot this handle refers to.
    pub(crate) generation: u32,
}

impl LayerId {
    /// The slot index, for diagnostics.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// The slot lifetime this handle is pinned to.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({}.{})", self.idx, self.generation)
    }
}

/// An opaque reference to the view-layer object a layer presents.
///
/// Owners live outside the core; a layer holds at most one owner reference,
/// assigned by the embedding view layer. The core passes owner IDs back
/// through the [`OwnerBridge`](crate::owner::OwnerBridge) without
/// interpreting them, and a torn-down owner is simply treated as absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OwnerId(
    /// The embedder-assigned raw identifier.
    pub u32,
);
