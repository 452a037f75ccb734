// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer tree.
//!
//! Layers live in an arena, [`LayerTree`], and are addressed by
//! generational [`LayerId`] handles. Topology, caller-set properties, and
//! resolved device-pixel state are kept in parallel arrays on the tree
//! rather than on individual layer objects.

mod clip;
mod id;
mod props;
mod traverse;
mod tree;

pub use id::{INVALID, LayerId, OwnerId};
pub use props::Shadow;
pub use traverse::Children;
pub use tree::LayerTree;
