// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree data model.
//!
//! Each layer has:
//!
//! - An identity ([`LayerId`]): a generational handle that becomes stale when
//!   the layer is destroyed (for example merged away), so a stale handle is
//!   caught instead of silently naming another layer.
//! - Topology: parent, first-child, and sibling links forming an ordered
//!   tree, topmost child first.
//! - Properties: [`name`](LayerStore::name), [`kind`](LayerStore::kind),
//!   [`visibility`](LayerStore::is_visible), [`format`](LayerStore::format),
//!   and for raster layers the [`content`](LayerStore::content) bounds and
//!   last [`fill`](LayerStore::fill) color.
//!
//! Layers are stored in struct-of-arrays layout with index-based handles.

mod id;
mod store;
mod traverse;

pub use id::{INVALID, LayerId, LayerKind};
pub use store::LayerStore;
pub use traverse::Children;
