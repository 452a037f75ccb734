// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena layer storage with allocation and topology management.
//!
//! Layers are addressed by [`LayerId`] handles. Each layer occupies a slot
//! in parallel arrays: topology links on one side, properties and resolved
//! state on the other. Destroyed layers are recycled via a free list, and
//! generation counters make stale handles fail validation immediately.
//!
//! Topology is an ordered tree: parent, first-child, and sibling links,
//! where sibling order is paint/z order (the last child is topmost). Every
//! insert operation detaches the child from any previous parent first, so a
//! layer has at most one parent at any time, and inserting an ancestor
//! under its own descendant is rejected outright.

use super::id::{INVALID, LayerId};
use super::props::{Props, Resolved};
use super::traverse::Children;
use crate::layout::LayoutState;

/// The layer tree: topology, properties, and resolved device-pixel state
/// for every layer on one display.
///
/// All mutation, layout, and compositing for a tree must stay on a single
/// thread; the tree itself takes no locks. The device density factor is
/// fixed at construction and shared by every layer in the tree.
#[derive(Debug)]
pub struct LayerTree {
    /// Device pixels per logical point, uniform for the whole display.
    pub(crate) scale: f64,

    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) props: Vec<Props>,

    // -- Derived state --
    pub(crate) resolved: Vec<Resolved>,
    pub(crate) clip_target: Vec<u32>,
    pub(crate) layout_state: Vec<LayoutState>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Layout scheduling --
    pub(crate) layout_scheduled: bool,
    pub(crate) suppression: u32,

    // -- Counters (test and diagnostics observability) --
    pub(crate) origin_updates: u64,
    pub(crate) layout_passes: u64,
}

/// Where to link a child into a parent's sibling list.
enum Position {
    /// Append as the last (topmost) child.
    End,
    /// Link at the given index, clamped to `[0, child_count]`.
    At(usize),
    /// Link immediately beneath the given sibling index.
    Below(u32),
    /// Link immediately above the given sibling index.
    Above(u32),
}

impl LayerTree {
    /// Creates an empty layer tree for a display with the given density
    /// factor (device pixels per logical point).
    ///
    /// # Panics
    ///
    /// Panics if `scale` is not strictly positive.
    #[must_use]
    pub fn new(scale: f64) -> Self {
        assert!(scale > 0.0, "display scale must be positive, got {scale}");
        Self {
            scale,
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            props: Vec::new(),
            resolved: Vec::new(),
            clip_target: Vec::new(),
            layout_state: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            layout_scheduled: false,
            suppression: 0,
            origin_updates: 0,
            layout_passes: 0,
        }
    }

    /// Returns the device density factor this tree was built with.
    #[inline]
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    // -- Allocation API --

    /// Creates a new layer and returns its handle.
    ///
    /// The layer starts detached, with a zero frame, identity transform,
    /// default visual attributes, and no owner.
    pub fn create_layer(&mut self) -> LayerId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.props[idx as usize] = Props::default();
            self.resolved[idx as usize] = Resolved::default();
            self.clip_target[idx as usize] = INVALID;
            self.layout_state[idx as usize] = LayoutState::Clean;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.props.push(Props::default());
            self.resolved.push(Resolved::default());
            self.clip_target.push(INVALID);
            self.layout_state.push(LayoutState::Clean);
            self.generation.push(0);
            idx
        };

        LayerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a layer, freeing its slot for reuse.
    ///
    /// The layer is detached from its parent first if still attached.
    ///
    /// # Panics
    ///
    /// Panics if the layer has children (remove them first) or if the
    /// handle is stale.
    pub fn destroy_layer(&mut self, id: LayerId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy a layer with children"
        );

        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
    }

    /// Returns whether the given handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: LayerId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Adds `child` as the last (topmost) child of `parent`.
    ///
    /// The child is detached from any previous parent first. If it is
    /// already a direct child of `parent`, this only moves it to the end of
    /// the paint order. The parent's clip policy is propagated into the
    /// child's subtree either way.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if the insertion would create a
    /// cycle (adding a layer to itself or to one of its descendants).
    pub fn add_child(&mut self, parent: LayerId, child: LayerId) {
        self.insert(parent, child, Position::End);
    }

    /// Inserts `child` into `parent`'s children at `index` (0 = bottommost).
    ///
    /// `index` is clamped to `[0, child_count]`. Detach-first and clip
    /// propagation behave as in [`add_child`](Self::add_child).
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale or the insertion would create a
    /// cycle.
    pub fn insert_child(&mut self, parent: LayerId, child: LayerId, index: usize) {
        self.insert(parent, child, Position::At(index));
    }

    /// Inserts `child` immediately beneath `sibling` in the paint order.
    ///
    /// The parent is taken from `sibling`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `sibling` has no parent, or if
    /// the insertion would create a cycle.
    pub fn insert_below(&mut self, child: LayerId, sibling: LayerId) {
        self.validate(sibling);
        let parent = self.parent_of(sibling.idx);
        self.insert(parent, child, Position::Below(sibling.idx));
    }

    /// Inserts `child` immediately above `sibling` in the paint order.
    ///
    /// The parent is taken from `sibling`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `sibling` has no parent, or if
    /// the insertion would create a cycle.
    pub fn insert_above(&mut self, child: LayerId, sibling: LayerId) {
        self.validate(sibling);
        let parent = self.parent_of(sibling.idx);
        self.insert(parent, child, Position::Above(sibling.idx));
    }

    /// Removes `child` from its parent's child sequence.
    ///
    /// A no-op when the layer is already detached. The detached subtree no
    /// longer inherits any ancestor clip.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_from_parent(&mut self, child: LayerId) {
        self.validate(child);
        let c = child.idx;
        let p = self.parent[c as usize];
        if p == INVALID {
            return;
        }
        self.unlink_from_parent(c);
        self.set_clip_target(c, INVALID);
        self.resolved[p as usize].needs_display = true;
    }

    /// Returns the parent of a layer, if attached.
    #[must_use]
    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.handle(p))
    }

    /// Returns an iterator over the direct children of a layer, bottom to
    /// top.
    #[must_use]
    pub fn children(&self, id: LayerId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the number of direct children of a layer.
    #[must_use]
    pub fn child_count(&self, id: LayerId) -> usize {
        self.children(id).count()
    }

    /// Returns all root layers (live layers with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<LayerId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(self.handle(idx));
            }
        }
        roots
    }

    // -- Internal helpers --

    /// Builds a live handle for a known-live slot index.
    pub(crate) fn handle(&self, idx: u32) -> LayerId {
        LayerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: LayerId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale LayerId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn parent_of(&self, sibling_idx: u32) -> LayerId {
        let p = self.parent[sibling_idx as usize];
        assert!(p != INVALID, "sibling has no parent");
        self.handle(p)
    }

    /// Returns whether `idx` is `ancestor_idx` or one of its descendants,
    /// by walking parent links upward from `idx`.
    fn is_in_subtree(&self, idx: u32, ancestor_idx: u32) -> bool {
        let mut cur = idx;
        while cur != INVALID {
            if cur == ancestor_idx {
                return true;
            }
            cur = self.parent[cur as usize];
        }
        false
    }

    fn insert(&mut self, parent: LayerId, child: LayerId, position: Position) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            !self.is_in_subtree(p, c),
            "cannot insert {child:?} under {parent:?}: would create a cycle"
        );

        // Propagate the clip policy into the new subtree, whether or not
        // the child was already attached here.
        let inherited = if self.props[p as usize].clips_to_bounds {
            p
        } else {
            self.clip_target[p as usize]
        };
        self.set_clip_target(c, inherited);

        let was_child_here = self.parent[c as usize] == p;
        let old_parent = self.parent[c as usize];
        let old_prev = self.prev_sibling[c as usize];
        let old_next = self.next_sibling[c as usize];
        if old_parent != INVALID {
            self.unlink_from_parent(c);
            if !was_child_here {
                self.resolved[old_parent as usize].needs_display = true;
            }
        }
        self.link(p, c, position);

        if was_child_here {
            // A reorder repaints the parent; re-linking into the same spot
            // changes nothing.
            if self.prev_sibling[c as usize] != old_prev
                || self.next_sibling[c as usize] != old_next
            {
                self.resolved[p as usize].needs_display = true;
            }
        } else {
            // Position against the new parent now; the owner callback runs
            // on the next flushed pass.
            let parent_bounds = self.props[p as usize].bounds;
            self.update_origin_against(c, parent_bounds);
            self.invalidate_layout_index(c, LayoutState::DirtySubtree);
            self.resolved[p as usize].needs_display = true;
        }
    }

    /// Links `c` into `p`'s sibling list at `position`. `c` must currently
    /// be detached.
    fn link(&mut self, p: u32, c: u32, position: Position) {
        debug_assert!(self.parent[c as usize] == INVALID, "link of attached layer");
        self.parent[c as usize] = p;

        // Resolve the position to "insert before this sibling" (INVALID
        // means append).
        let before = match position {
            Position::End => INVALID,
            Position::At(index) => {
                let mut cur = self.first_child[p as usize];
                let mut remaining = index;
                while remaining > 0 && cur != INVALID {
                    cur = self.next_sibling[cur as usize];
                    remaining -= 1;
                }
                cur
            }
            Position::Below(sibling) => sibling,
            Position::Above(sibling) => self.next_sibling[sibling as usize],
        };

        if before == INVALID {
            // Append as last child.
            if self.first_child[p as usize] == INVALID {
                self.first_child[p as usize] = c;
                self.prev_sibling[c as usize] = INVALID;
            } else {
                let mut last = self.first_child[p as usize];
                while self.next_sibling[last as usize] != INVALID {
                    last = self.next_sibling[last as usize];
                }
                self.next_sibling[last as usize] = c;
                self.prev_sibling[c as usize] = last;
            }
            self.next_sibling[c as usize] = INVALID;
        } else {
            let prev = self.prev_sibling[before as usize];
            self.next_sibling[c as usize] = before;
            self.prev_sibling[c as usize] = prev;
            self.prev_sibling[before as usize] = c;
            if prev == INVALID {
                self.first_child[p as usize] = c;
            } else {
                self.next_sibling[prev as usize] = c;
            }
        }
    }

    /// Removes `idx` from its parent's child list.
    pub(crate) fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p as usize] = next;
        }
        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Collects the direct child indices of `idx` into a buffer.
    ///
    /// Used where the caller mutates the tree while iterating (sibling
    /// links cannot be walked across mutation).
    pub(crate) fn collect_children(&self, idx: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut c = self.first_child[idx as usize];
        while c != INVALID {
            out.push(c);
            c = self.next_sibling[c as usize];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> LayerTree {
        LayerTree::new(1.0)
    }

    #[test]
    fn create_and_destroy() {
        let mut t = tree();
        let id = t.create_layer();
        assert!(t.is_alive(id));
        t.destroy_layer(id);
        assert!(!t.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut t = tree();
        let id1 = t.create_layer();
        t.destroy_layer(id1);
        let id2 = t.create_layer();
        // id2 reuses the same slot but has a different generation.
        assert!(!t.is_alive(id1));
        assert!(t.is_alive(id2));
        assert_eq!(id1.index(), id2.index());
        assert_ne!(id1.generation(), id2.generation());
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn destroyed_handle_panics() {
        let mut t = tree();
        let id = t.create_layer();
        t.destroy_layer(id);
        let _ = t.parent(id);
    }

    #[test]
    #[should_panic(expected = "cannot destroy a layer with children")]
    fn destroy_with_children_panics() {
        let mut t = tree();
        let parent = t.create_layer();
        let child = t.create_layer();
        t.add_child(parent, child);
        t.destroy_layer(parent);
    }

    #[test]
    fn destroy_detaches_from_parent() {
        let mut t = tree();
        let parent = t.create_layer();
        let child = t.create_layer();
        t.add_child(parent, child);
        t.destroy_layer(child);
        assert_eq!(t.child_count(parent), 0);
    }

    #[test]
    fn add_child_orders_bottom_to_top() {
        let mut t = tree();
        let parent = t.create_layer();
        let a = t.create_layer();
        let b = t.create_layer();

        t.add_child(parent, a);
        t.add_child(parent, b);

        assert_eq!(t.parent(a), Some(parent));
        assert_eq!(t.parent(b), Some(parent));
        let kids: Vec<_> = t.children(parent).collect();
        assert_eq!(kids, vec![a, b]);
    }

    #[test]
    fn insert_child_clamps_index() {
        let mut t = tree();
        let parent = t.create_layer();
        let a = t.create_layer();
        let b = t.create_layer();
        let c = t.create_layer();

        t.insert_child(parent, a, 0);
        t.insert_child(parent, b, 99); // clamped to end
        t.insert_child(parent, c, 1);

        let kids: Vec<_> = t.children(parent).collect();
        assert_eq!(kids, vec![a, c, b]);
    }

    #[test]
    fn insert_below_and_above() {
        let mut t = tree();
        let parent = t.create_layer();
        let a = t.create_layer();
        let b = t.create_layer();
        let below = t.create_layer();
        let above = t.create_layer();

        t.add_child(parent, a);
        t.add_child(parent, b);
        t.insert_below(below, b);
        t.insert_above(above, a);

        let kids: Vec<_> = t.children(parent).collect();
        assert_eq!(kids, vec![a, above, below, b]);
    }

    #[test]
    #[should_panic(expected = "sibling has no parent")]
    fn insert_below_detached_sibling_panics() {
        let mut t = tree();
        let a = t.create_layer();
        let b = t.create_layer();
        t.insert_below(a, b);
    }

    #[test]
    fn readding_direct_child_reorders_to_end() {
        let mut t = tree();
        let parent = t.create_layer();
        let a = t.create_layer();
        let b = t.create_layer();
        t.add_child(parent, a);
        t.add_child(parent, b);

        t.add_child(parent, a);
        let kids: Vec<_> = t.children(parent).collect();
        assert_eq!(kids, vec![b, a]);
    }

    #[test]
    fn readding_direct_child_does_not_reschedule_layout() {
        let mut t = tree();
        let parent = t.create_layer();
        let a = t.create_layer();
        t.add_child(parent, a);
        t.flush_layout(&mut crate::owner::NoOwners);
        assert!(!t.layout_scheduled());

        t.insert_child(parent, a, 0);
        assert!(!t.layout_scheduled());
    }

    #[test]
    fn reordering_marks_the_parent_for_repaint() {
        let mut t = tree();
        let parent = t.create_layer();
        let a = t.create_layer();
        let b = t.create_layer();
        t.add_child(parent, a);
        t.add_child(parent, b);
        let _ = t.take_needs_display(parent);

        t.add_child(parent, a);
        let kids: Vec<_> = t.children(parent).collect();
        assert_eq!(kids, vec![b, a]);
        assert!(t.take_needs_display(parent));

        // Re-adding at the position the child already holds changes
        // nothing on screen.
        t.add_child(parent, a);
        assert!(!t.take_needs_display(parent));
    }

    #[test]
    fn adding_implicitly_reparents() {
        let mut t = tree();
        let p1 = t.create_layer();
        let p2 = t.create_layer();
        let child = t.create_layer();

        t.add_child(p1, child);
        assert_eq!(t.parent(child), Some(p1));

        t.add_child(p2, child);
        assert_eq!(t.parent(child), Some(p2));
        assert_eq!(t.child_count(p1), 0);
    }

    #[test]
    fn remove_from_parent_detaches() {
        let mut t = tree();
        let parent = t.create_layer();
        let child = t.create_layer();
        t.add_child(parent, child);

        t.remove_from_parent(child);
        assert_eq!(t.parent(child), None);
        assert_eq!(t.child_count(parent), 0);

        // Already detached: no-op.
        t.remove_from_parent(child);
        assert_eq!(t.parent(child), None);
    }

    #[test]
    #[should_panic(expected = "would create a cycle")]
    fn self_insert_panics() {
        let mut t = tree();
        let a = t.create_layer();
        t.add_child(a, a);
    }

    #[test]
    #[should_panic(expected = "would create a cycle")]
    fn descendant_insert_panics() {
        let mut t = tree();
        let a = t.create_layer();
        let b = t.create_layer();
        let c = t.create_layer();
        t.add_child(a, b);
        t.add_child(b, c);
        // a under its own grandchild.
        t.add_child(c, a);
    }

    #[test]
    fn roots_returns_parentless_layers() {
        let mut t = tree();
        let a = t.create_layer();
        let b = t.create_layer();
        let c = t.create_layer();
        t.add_child(a, c);

        let roots = t.roots();
        assert!(roots.contains(&a));
        assert!(roots.contains(&b));
        assert!(!roots.contains(&c));
    }

    #[test]
    #[should_panic(expected = "display scale must be positive")]
    fn zero_scale_panics() {
        let _ = LayerTree::new(0.0);
    }
}
