// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred layout scheduling.
//!
//! Layout never runs inline with a property change. Mutations mark layers
//! dirty and set a single scheduled flag; the embedder later drains the
//! work with [`LayerTree::flush_layout`], which walks the tree top-down and
//! invokes each dirty layer's owner callback exactly once, however many
//! invalidations accumulated.
//!
//! The whole pass runs under a suppression guard, so frames set from inside
//! [`OwnerBridge::layout_subviews`] reposition layers without scheduling
//! another pass. Embedders can hold the same guard themselves while
//! repositioning layers programmatically.

use kurbo::{Rect, Size};

use crate::layer::{INVALID, LayerId, LayerTree};
use crate::owner::OwnerBridge;

/// Per-layer layout dirtiness.
///
/// States are ordered by strength: an invalidation never weakens the state
/// already recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LayoutState {
    /// Layout is up to date.
    Clean,
    /// The layer itself must lay out; descendants only if dirty themselves.
    DirtySelf,
    /// The layer and every descendant must lay out.
    DirtySubtree,
}

impl LayerTree {
    /// Returns the layer's layout dirtiness.
    #[must_use]
    pub fn layout_state(&self, id: LayerId) -> LayoutState {
        self.validate(id);
        self.layout_state[id.idx as usize]
    }

    /// Returns whether a layout pass is pending.
    #[must_use]
    pub fn layout_scheduled(&self) -> bool {
        self.layout_scheduled
    }

    /// Marks the layer as needing layout on the next
    /// [`flush_layout`](Self::flush_layout).
    pub fn request_layout(&mut self, id: LayerId) {
        self.validate(id);
        self.invalidate_layout_index(id.idx, LayoutState::DirtySelf);
    }

    /// Suspends layout invalidation. While the guard is held, geometry
    /// changes resolve origins but never dirty layout state.
    ///
    /// Calls nest; every push must be matched by a
    /// [`pop_layout_suppression`](Self::pop_layout_suppression).
    pub fn push_layout_suppression(&mut self) {
        self.suppression += 1;
    }

    /// Releases one level of layout suppression.
    ///
    /// # Panics
    ///
    /// Panics on underflow: a pop without a matching push is a logic error
    /// in the caller, not a recoverable condition.
    pub fn pop_layout_suppression(&mut self) {
        assert!(self.suppression > 0, "unbalanced layout suppression pop");
        self.suppression -= 1;
    }

    /// Runs the pending layout pass, if any.
    ///
    /// Dirty layers are visited top-down, each owner's
    /// [`layout_subviews`](OwnerBridge::layout_subviews) runs at most once,
    /// and every visited layer leaves the pass clean. A no-op when nothing
    /// is scheduled.
    pub fn flush_layout(&mut self, bridge: &mut dyn OwnerBridge) {
        if !self.layout_scheduled {
            return;
        }
        self.layout_scheduled = false;
        self.layout_passes += 1;

        self.push_layout_suppression();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.layout_node(idx, Rect::ZERO, false, bridge);
            }
        }
        self.pop_layout_suppression();
        log::trace!("layout pass {} complete", self.layout_passes);
    }

    /// Sizes the layer to its owner's preferred size within `constraints`.
    ///
    /// Asks the bridge for a size hint; when the owner declines, the frame
    /// is left untouched. Returns the resulting frame size.
    pub fn size_to_fit(
        &mut self,
        id: LayerId,
        constraints: Size,
        bridge: &mut dyn OwnerBridge,
    ) -> Size {
        self.validate(id);
        if let Some(owner) = self.props[id.idx as usize].owner
            && let Some(size) = bridge.size_hint(owner, constraints)
        {
            let frame = self.props[id.idx as usize].frame;
            self.set_frame(id, Rect::from_origin_size(frame.origin(), size));
        }
        self.props[id.idx as usize].frame.size()
    }

    /// Number of layout passes flushed so far.
    #[must_use]
    pub fn layout_pass_count(&self) -> u64 {
        self.layout_passes
    }

    /// Records a layout invalidation, unless suppressed. The recorded state
    /// only ever strengthens.
    pub(crate) fn invalidate_layout_index(&mut self, idx: u32, state: LayoutState) {
        if self.suppression > 0 {
            return;
        }
        let current = self.layout_state[idx as usize];
        self.layout_state[idx as usize] = current.max(state);
        self.layout_scheduled = true;
    }

    fn layout_node(
        &mut self,
        idx: u32,
        parent_bounds: Rect,
        forced: bool,
        bridge: &mut dyn OwnerBridge,
    ) {
        let state = self.layout_state[idx as usize];
        let dirty = forced || state != LayoutState::Clean;
        let force_children = forced || state == LayoutState::DirtySubtree;

        if dirty {
            self.update_origin_against(idx, parent_bounds);
            if let Some(owner) = self.props[idx as usize].owner {
                bridge.layout_subviews(self, owner);
            }
        }
        self.layout_state[idx as usize] = LayoutState::Clean;

        // The owner callback may have restructured the tree, so take a
        // snapshot and re-check each link before descending.
        let children = self.collect_children(idx);
        let bounds = self.props[idx as usize].bounds;
        for child in children {
            if self.parent[child as usize] == idx {
                self.layout_node(child, bounds, force_children, bridge);
            }
        }
    }
}
