// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the tree walk.
//!
//! This module provides a [`WalkSink`] trait with per-event methods that the
//! walker calls as it enters and leaves frames, skips nodes, creates outlines,
//! merges sources, and overrides paint colors. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn WalkSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Events borrow layer names from the walker, so sinks that keep them must
//! copy. Structured logging through `tracing` is independent of this module
//! and always on.

use crate::color::Rgb;
use crate::config::SkipReason;
use crate::paint::PaintSlot;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Where an outline was placed relative to its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlacementKind {
    /// Directly below a layer, in the layer's parent.
    Below,
    /// At the bottom of a group's own children.
    BottomOf,
}

/// What happened to a paint color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PaintAction {
    /// A frame installed its own color.
    Override,
    /// The caller's color was put back.
    Restore,
}

/// How a frame ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FrameOutcome {
    /// Nothing was produced and nothing was descended into.
    Skipped,
    /// The node was outlined as one unit.
    Outlined,
    /// The walker recursed into the node's children.
    Descended,
    /// The frame aborted with an error.
    Failed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the walker starts working on a node.
#[derive(Clone, Copy, Debug)]
pub struct FrameEnterEvent<'a> {
    /// Nesting depth; the node the walk started from is 0.
    pub depth: usize,
    /// The node's display name.
    pub name: &'a str,
    /// Whether the node is a group.
    pub is_group: bool,
}

/// Emitted when the walker is done with a node.
#[derive(Clone, Copy, Debug)]
pub struct FrameExitEvent<'a> {
    /// Nesting depth.
    pub depth: usize,
    /// The node's display name.
    pub name: &'a str,
    /// How the frame ended.
    pub outcome: FrameOutcome,
}

/// Emitted when a node is left alone.
#[derive(Clone, Copy, Debug)]
pub struct SkipEvent<'a> {
    /// Nesting depth.
    pub depth: usize,
    /// The node's display name.
    pub name: &'a str,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Emitted after an outline layer was created and filled.
#[derive(Clone, Copy, Debug)]
pub struct OutlineEvent<'a> {
    /// Nesting depth.
    pub depth: usize,
    /// Name of the layer or group the selection came from.
    pub source: &'a str,
    /// Name given to the new outline layer.
    pub outline: &'a str,
    /// Grow distance used.
    pub thickness: u32,
    /// Feather radius used.
    pub feather: u32,
    /// Where the outline went.
    pub placement: PlacementKind,
}

/// Emitted after a source layer was merged into its outline.
#[derive(Clone, Copy, Debug)]
pub struct MergeEvent<'a> {
    /// Nesting depth.
    pub depth: usize,
    /// Name restored onto the merged layer.
    pub name: &'a str,
}

/// Emitted when a paint color is overridden or restored.
#[derive(Clone, Copy, Debug)]
pub struct PaintEvent {
    /// Nesting depth.
    pub depth: usize,
    /// Affected slot.
    pub slot: PaintSlot,
    /// Color now active on the host.
    pub color: Rgb,
    /// Override or restore.
    pub action: PaintAction,
}

// ---------------------------------------------------------------------------
// WalkSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the walker.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait WalkSink {
    /// Called when a frame starts.
    fn on_frame_enter(&mut self, e: &FrameEnterEvent<'_>) {
        _ = e;
    }

    /// Called when a frame ends.
    fn on_frame_exit(&mut self, e: &FrameExitEvent<'_>) {
        _ = e;
    }

    /// Called when a node is skipped.
    fn on_skip(&mut self, e: &SkipEvent<'_>) {
        _ = e;
    }

    /// Called after an outline is produced.
    fn on_outline(&mut self, e: &OutlineEvent<'_>) {
        _ = e;
    }

    /// Called after a merge.
    fn on_merge(&mut self, e: &MergeEvent<'_>) {
        _ = e;
    }

    /// Called on a paint color override or restore.
    fn on_paint(&mut self, e: &PaintEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`WalkSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl WalkSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`WalkSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn WalkSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn WalkSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Default for Tracer<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn WalkSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameEnterEvent`].
    #[inline]
    pub fn frame_enter(&mut self, e: &FrameEnterEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_enter(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameExitEvent`].
    #[inline]
    pub fn frame_exit(&mut self, e: &FrameExitEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_exit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SkipEvent`].
    #[inline]
    pub fn skip(&mut self, e: &SkipEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_skip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OutlineEvent`].
    #[inline]
    pub fn outline(&mut self, e: &OutlineEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_outline(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MergeEvent`].
    #[inline]
    pub fn merge(&mut self, e: &MergeEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_merge(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PaintEvent`].
    #[inline]
    pub fn paint(&mut self, e: &PaintEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_paint(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        skips: usize,
        merges: usize,
    }

    impl WalkSink for Counting {
        fn on_skip(&mut self, _: &SkipEvent<'_>) {
            self.skips += 1;
        }

        fn on_merge(&mut self, _: &MergeEvent<'_>) {
            self.merges += 1;
        }
    }

    #[test]
    fn none_tracer_accepts_every_event() {
        let mut tracer = Tracer::none();
        tracer.frame_enter(&FrameEnterEvent {
            depth: 0,
            name: "root",
            is_group: true,
        });
        tracer.paint(&PaintEvent {
            depth: 0,
            slot: PaintSlot::Background,
            color: Rgb::BLACK,
            action: PaintAction::Override,
        });
        tracer.frame_exit(&FrameExitEvent {
            depth: 0,
            name: "root",
            outcome: FrameOutcome::Descended,
        });
    }

    #[test]
    fn tracer_dispatches_only_with_the_feature() {
        let mut sink = Counting::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.skip(&SkipEvent {
                depth: 1,
                name: "a",
                reason: SkipReason::Hidden,
            });
            tracer.merge(&MergeEvent { depth: 1, name: "b" });
            tracer.outline(&OutlineEvent {
                depth: 1,
                source: "b",
                outline: "outline::b",
                thickness: 3,
                feather: 0,
                placement: PlacementKind::Below,
            });
        }
        let expected = usize::from(cfg!(feature = "trace"));
        assert_eq!(sink.skips, expected, "skip dispatch follows the feature");
        assert_eq!(sink.merges, expected, "merge dispatch follows the feature");
    }
}
