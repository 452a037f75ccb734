// Copyright 2026 the Terrane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained layer tree, layout scheduling, and transform resolution.
//!
//! Terrane keeps a tree of layers between frames. View code mutates layer
//! properties in logical points; the tree resolves each change into
//! device-pixel placement immediately and defers layout into a coalesced
//! pass. A separate crate walks the resolved tree to produce draw calls.
//!
//! ```text
//!   view layer                     terrane_core
//!  ┌──────────┐  set_frame /    ┌──────────────────────────────┐
//!  │  owners  │  set_transform  │  LayerTree                   │
//!  │          ├────────────────►│   topology ─ props ─ resolved│
//!  │          │◄────────────────┤   layout scheduler           │
//!  └──────────┘  OwnerBridge    └──────────────────────────────┘
//!                callbacks           │ read-only walk
//!                                    ▼
//!                               terrane_render
//! ```
//!
//! The three pieces:
//!
//! - [`layer`] — the arena tree: allocation, topology, properties, and the
//!   resolved device-pixel state, including clip inheritance.
//! - [`transform`] — affine transforms classified once into identity,
//!   scale-translate, or general, so the scale-only fast path never touches
//!   a matrix.
//! - [`layout`] — deferred, coalesced layout driven through the
//!   [`OwnerBridge`](owner::OwnerBridge).
//!
//! A tree is single-threaded by construction; nothing here locks.

pub mod coord;
pub mod layer;
pub mod layout;
pub mod owner;
pub mod surface;
pub mod transform;

pub use kurbo;
pub use peniko;
