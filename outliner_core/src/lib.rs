// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directive-driven outline generation over layered image documents.
//!
//! `outliner_core` walks a layer tree owned by an external image editor and
//! paints a colored stroke around the opaque content of layers and groups. The
//! editor is reached only through the [`Host`](host::Host) trait, so the same
//! walk runs against a real editor binding or against the in-memory document
//! in `outliner_doc`.
//!
//! # Architecture
//!
//! ```text
//!   run() ──► Walker::visit() ─┬─► config::resolve() ──► directive::parse()
//!                 ▲            │
//!                 │            ├─► ColorStack::open() / close()
//!                 │            │
//!                 └─(children)─┴─► synth::synthesize() ──► Host
//! ```
//!
//! **[`directive`]**: the layer-name mini-language (`()=>outline t=5 ...`)
//! parsed into a closed [`Directive`](directive::Directive) enum.
//!
//! **[`config`]**: [`OutlineConfig`](config::OutlineConfig) and per-frame
//! resolution of explicit settings, inherited auto-configuration, and
//! defaults.
//!
//! **[`paint`]**: LIFO foreground/background color stacks with scoped
//! open/close so every override is restored on every exit path.
//!
//! **[`synth`]**: one outline layer from one source (layer or group
//! composite).
//!
//! **[`walk`]**: the recursive traversal policy engine.
//!
//! **[`run`]**: the entry point that picks the active layer and dispatches.
//!
//! **[`trace`]**: [`WalkSink`](trace::WalkSink) hooks with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `serde` (disabled by default): `Serialize`/`Deserialize` for
//!   configuration and color types.
//! - `trace` (disabled by default): enables `Tracer` method bodies.

pub mod color;
pub mod config;
pub mod directive;
pub mod error;
pub mod host;
pub mod paint;
pub mod run;
pub mod synth;
pub mod trace;
pub mod walk;

pub use color::Rgb;
pub use config::{OutlineConfig, SeparationMode};
pub use error::{HostError, OutlineError, ParseError, Result, TraversalError};
pub use host::Host;
pub use run::{RunSummary, run, run_traced};
