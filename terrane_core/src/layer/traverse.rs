// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Iteration over layer topology.

use core::iter::FusedIterator;

use super::id::{INVALID, LayerId};
use super::tree::LayerTree;

/// Iterates a layer's direct children, bottom to top.
///
/// Created by [`LayerTree::children`]. Iteration order is paint order: the
/// first child yielded paints first, the last paints topmost. The iterator
/// borrows the tree, so topology cannot change mid-walk; collect the
/// handles first when mutation is needed.
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a LayerTree,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a LayerTree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = LayerId;

    fn next(&mut self) -> Option<LayerId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.next_sibling[idx as usize];
        Some(self.tree.handle(idx))
    }
}

impl FusedIterator for Children<'_> {}
