// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip inheritance across the tree.
//!
//! Each layer records its *clip target*: the nearest ancestor whose
//! `clips_to_bounds` is set, or none. The target is re-derived eagerly
//! whenever a layer's clip policy changes or a subtree is moved, so the
//! compositor reads it without walking ancestors.

use super::id::{INVALID, LayerId};
use super::tree::LayerTree;

impl LayerTree {
    /// Returns whether the layer clips its children to its bounds.
    #[must_use]
    pub fn clips_to_bounds(&self, id: LayerId) -> bool {
        self.validate(id);
        self.props[id.idx as usize].clips_to_bounds
    }

    /// Sets whether the layer clips its children to its bounds, and pushes
    /// the resulting clip target through the subtree.
    pub fn set_clips_to_bounds(&mut self, id: LayerId, clips: bool) {
        self.validate(id);
        let idx = id.idx;
        if self.props[idx as usize].clips_to_bounds == clips {
            return;
        }
        self.props[idx as usize].clips_to_bounds = clips;

        // Children now clip against this layer, or fall back to whatever
        // clips it.
        let target = if clips {
            idx
        } else {
            self.clip_target[idx as usize]
        };
        for child in self.collect_children(idx) {
            self.set_clip_target(child, target);
        }
        self.mark_display(idx);
    }

    /// Returns the nearest ancestor that clips this layer, if any.
    #[must_use]
    pub fn clip_target(&self, id: LayerId) -> Option<LayerId> {
        self.validate(id);
        let target = self.clip_target[id.idx as usize];
        (target != INVALID).then(|| self.handle(target))
    }

    /// Records `target` as the clip target of `idx` and propagates through
    /// the subtree. A layer that clips itself shadows the inherited target
    /// for its own children.
    pub(crate) fn set_clip_target(&mut self, idx: u32, target: u32) {
        self.clip_target[idx as usize] = target;
        let child_target = if self.props[idx as usize].clips_to_bounds {
            idx
        } else {
            target
        };
        for child in self.collect_children(idx) {
            self.set_clip_target(child, child_target);
        }
    }
}
