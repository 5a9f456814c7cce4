// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`WalkSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Lines are
//! indented by frame depth so the output reads like the layer tree.

use std::io::Write;

use outliner_core::config::SkipReason;
use outliner_core::trace::{
    FrameEnterEvent, FrameExitEvent, FrameOutcome, MergeEvent, OutlineEvent, PaintAction,
    PaintEvent, PlacementKind, SkipEvent, WalkSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the destination, consuming the sink.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn outcome_name(outcome: FrameOutcome) -> &'static str {
    match outcome {
        FrameOutcome::Skipped => "skipped",
        FrameOutcome::Outlined => "outlined",
        FrameOutcome::Descended => "descended",
        FrameOutcome::Failed => "failed",
    }
}

fn reason_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Hidden => "hidden",
        SkipReason::Directive => "directive",
        SkipReason::Terminated => "terminated",
        SkipReason::Unconfigured => "unconfigured",
        SkipReason::Unparseable => "unparseable",
    }
}

fn placement_name(placement: PlacementKind) -> &'static str {
    match placement {
        PlacementKind::Below => "below",
        PlacementKind::BottomOf => "bottom_of",
    }
}

impl<W: Write> WalkSink for PrettyPrintSink<W> {
    fn on_frame_enter(&mut self, e: &FrameEnterEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "{}[enter] {:?} group={}",
            indent(e.depth),
            e.name,
            e.is_group,
        );
    }

    fn on_frame_exit(&mut self, e: &FrameExitEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "{}[exit] {:?} outcome={}",
            indent(e.depth),
            e.name,
            outcome_name(e.outcome),
        );
    }

    fn on_skip(&mut self, e: &SkipEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "{}[skip] {:?} reason={}",
            indent(e.depth),
            e.name,
            reason_name(e.reason),
        );
    }

    fn on_outline(&mut self, e: &OutlineEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "{}[outline] {:?} -> {:?} thickness={} feather={} placement={}",
            indent(e.depth),
            e.source,
            e.outline,
            e.thickness,
            e.feather,
            placement_name(e.placement),
        );
    }

    fn on_merge(&mut self, e: &MergeEvent<'_>) {
        let _ = writeln!(self.writer, "{}[merge] {:?}", indent(e.depth), e.name);
    }

    fn on_paint(&mut self, e: &PaintEvent) {
        let action = match e.action {
            PaintAction::Override => "override",
            PaintAction::Restore => "restore",
        };
        let _ = writeln!(
            self.writer,
            "{}[paint] {} {}={}",
            indent(e.depth),
            action,
            e.slot,
            e.color,
        );
    }
}
