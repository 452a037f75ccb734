// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositing for Terrane layer trees.
//!
//! This crate turns a resolved [`LayerTree`](terrane_core::layer::LayerTree)
//! into draw calls. [`composite`] walks a subtree in paint order against any
//! [`Surface`](terrane_core::surface::Surface); [`DisplayList`] is the
//! built-in surface that records the calls for replay or inspection.

mod compositor;
mod list;

pub use compositor::{MIN_VISIBLE_OPACITY, composite};
pub use list::{DisplayList, DrawOp};
