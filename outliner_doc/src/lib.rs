// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory layer document for the outliner.
//!
//! `outliner_doc` provides [`Document`], a layer tree without pixels that
//! implements [`outliner_core::Host`]. Raster layers carry the bounding
//! rectangle of their opaque content ([`kurbo::Rect`]), selections are
//! rectangles grown and clipped to the canvas, and fills record their color.
//! That is enough to run outline walks end to end and inspect the result.
//!
//! # Architecture
//!
//! ```text
//!   DocumentDescription ──► Document::from_description()
//!                                  │
//!                                  ▼
//!          Document ── impl Host ──► outliner_core::run()
//!             │
//!             ├── LayerStore   (struct-of-arrays tree, generational ids)
//!             └── Selection    (rectangle + feather)
//! ```
//!
//! **[`layer`]**: [`LayerStore`](layer::LayerStore) with [`LayerId`] handles.
//!
//! **[`selection`]**: [`Selection`](selection::Selection), including group
//! composites over visible descendants.
//!
//! **[`document`]**: [`Document`] and its [`Host`](outliner_core::Host) impl,
//! plus [`LayerSnapshot`](document::LayerSnapshot) for serializing results.
//!
//! **[`description`]**: serde-backed JSON document descriptions.

pub mod description;
pub mod document;
pub mod layer;
pub mod selection;

pub use description::{DescriptionError, DocumentDescription, LayerDescription};
pub use document::{Document, LayerSnapshot};
pub use layer::LayerId;
