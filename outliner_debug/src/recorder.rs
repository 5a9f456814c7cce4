// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event recording with JSON export.
//!
//! [`RecorderSink`] implements [`WalkSink`] and keeps an owned
//! [`RecordedEvent`] for every callback, in the order the walker emitted
//! them. The recording can be inspected in tests or written out as a JSON
//! array with [`RecorderSink::write_json`].
//!
//! Each element is an object tagged by `"event"`:
//!
//! ```json
//! { "event": "outline", "depth": 1, "source": "Hair",
//!   "outline": "outline::Hair", "thickness": 3, "feather": 0,
//!   "placement": "below" }
//! ```

use std::io::Write;

use outliner_core::Rgb;
use outliner_core::config::SkipReason;
use outliner_core::paint::PaintSlot;
use outliner_core::trace::{
    FrameEnterEvent, FrameExitEvent, FrameOutcome, MergeEvent, OutlineEvent, PaintAction,
    PaintEvent, PlacementKind, SkipEvent, WalkSink,
};
use serde::Serialize;

/// An owned copy of one trace event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecordedEvent {
    /// See [`FrameEnterEvent`].
    FrameEnter {
        /// Nesting depth.
        depth: usize,
        /// Layer name.
        name: String,
        /// Whether the node is a group.
        is_group: bool,
    },
    /// See [`FrameExitEvent`].
    FrameExit {
        /// Nesting depth.
        depth: usize,
        /// Layer name.
        name: String,
        /// How the frame ended.
        outcome: FrameOutcome,
    },
    /// See [`SkipEvent`].
    Skip {
        /// Nesting depth.
        depth: usize,
        /// Layer name.
        name: String,
        /// Why it was skipped.
        reason: SkipReason,
    },
    /// See [`OutlineEvent`].
    Outline {
        /// Nesting depth.
        depth: usize,
        /// Source layer name.
        source: String,
        /// Outline layer name.
        outline: String,
        /// Grow distance.
        thickness: u32,
        /// Feather radius.
        feather: u32,
        /// Where the outline went.
        placement: PlacementKind,
    },
    /// See [`MergeEvent`].
    Merge {
        /// Nesting depth.
        depth: usize,
        /// Layer name.
        name: String,
    },
    /// See [`PaintEvent`].
    Paint {
        /// Nesting depth.
        depth: usize,
        /// Affected slot.
        slot: PaintSlot,
        /// Color now active.
        color: Rgb,
        /// Override or restore.
        action: PaintAction,
    },
}

/// Records every event it receives.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Returns the recorded events, consuming the recorder.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Serializes the recording as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.events)
    }

    /// Writes the recording as a pretty-printed JSON array.
    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)
    }
}

impl WalkSink for RecorderSink {
    fn on_frame_enter(&mut self, e: &FrameEnterEvent<'_>) {
        self.events.push(RecordedEvent::FrameEnter {
            depth: e.depth,
            name: e.name.to_owned(),
            is_group: e.is_group,
        });
    }

    fn on_frame_exit(&mut self, e: &FrameExitEvent<'_>) {
        self.events.push(RecordedEvent::FrameExit {
            depth: e.depth,
            name: e.name.to_owned(),
            outcome: e.outcome,
        });
    }

    fn on_skip(&mut self, e: &SkipEvent<'_>) {
        self.events.push(RecordedEvent::Skip {
            depth: e.depth,
            name: e.name.to_owned(),
            reason: e.reason,
        });
    }

    fn on_outline(&mut self, e: &OutlineEvent<'_>) {
        self.events.push(RecordedEvent::Outline {
            depth: e.depth,
            source: e.source.to_owned(),
            outline: e.outline.to_owned(),
            thickness: e.thickness,
            feather: e.feather,
            placement: e.placement,
        });
    }

    fn on_merge(&mut self, e: &MergeEvent<'_>) {
        self.events.push(RecordedEvent::Merge {
            depth: e.depth,
            name: e.name.to_owned(),
        });
    }

    fn on_paint(&mut self, e: &PaintEvent) {
        self.events.push(RecordedEvent::Paint {
            depth: e.depth,
            slot: e.slot,
            color: e.color,
            action: e.action,
        });
    }
}
