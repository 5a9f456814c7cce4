// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive tree walk.
//!
//! [`Walker::visit`] is the policy engine: for each node it resolves the
//! frame's settings, installs the frame's paint color, and then either
//! outlines the node or descends into it according to the separation mode.
//!
//! ```text
//!   visit(node, config)
//!     ├─ depth guard
//!     ├─ hidden?                     ──► Skipped(Hidden)
//!     ├─ config::resolve()           ──► Skipped(reason) | Frame
//!     ├─ paint.open(fill_slot, color)
//!     ├─ leaf ──────────────────────────► synthesize(Below(node))
//!     ├─ group, SingleComposite ───────► synthesize(BottomOf(group))
//!     ├─ group, PerGroup ──────────────► hide nested groups
//!     │                                    synthesize(BottomOf(group))
//!     │                                    restore visibility
//!     │                                    visit(nested group) for each
//!     ├─ group, PerLayer ──────────────► visit(child) for each,
//!     │                                    merge outlined plain children
//!     │                                    if the group asks for it
//!     └─ paint.close()  (on every path past open)
//! ```
//!
//! The walker owns the color stack, so two runs never share paint state.
//! Host failures abort the walk; layers created before the failure stay in
//! the document, but paint colors and temporarily hidden groups are always
//! put back.

use crate::config::{self, Frame, OutlineConfig, Resolution, SeparationMode, SkipReason};
use crate::error::{Result, TraversalError};
use crate::host::{self, GroupView, Host, Node};
use crate::paint::{ColorStack, PaintScope, PaintSlot};
use crate::run::RunSummary;
use crate::synth::{self, Placement, StrokeParams};
use crate::trace::{
    FrameEnterEvent, FrameExitEvent, FrameOutcome, MergeEvent, OutlineEvent, PaintAction,
    PaintEvent, SkipEvent, Tracer,
};

/// Result of visiting one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit<L> {
    /// No outline and no descent.
    Skipped(SkipReason),
    /// The node was outlined as one unit.
    Outlined {
        /// The new outline layer.
        outline: L,
        /// The node's own `merge_source` setting. In per-layer mode the
        /// enclosing group's setting decides instead.
        merge_source: bool,
    },
    /// The walker recursed into the node's children.
    Descended,
}

impl<L> Visit<L> {
    fn outcome(&self) -> FrameOutcome {
        match self {
            Self::Skipped(_) => FrameOutcome::Skipped,
            Self::Outlined { .. } => FrameOutcome::Outlined,
            Self::Descended => FrameOutcome::Descended,
        }
    }
}

/// Walks a host's layer tree, producing outline layers.
pub struct Walker<'h, 't, H: Host + ?Sized> {
    host: &'h mut H,
    paint: ColorStack,
    tracer: Tracer<'t>,
    outlines: Vec<H::Layer>,
    merged: usize,
    skipped: usize,
}

impl<H: Host + ?Sized> core::fmt::Debug for Walker<'_, '_, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Walker")
            .field("paint", &self.paint)
            .field("outlines", &self.outlines)
            .field("merged", &self.merged)
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}

impl<'h, 't, H: Host + ?Sized> Walker<'h, 't, H> {
    /// Creates a walker over `host`, reporting to `tracer`.
    pub fn new(host: &'h mut H, tracer: Tracer<'t>) -> Self {
        Self {
            host,
            paint: ColorStack::new(),
            tracer,
            outlines: Vec::new(),
            merged: 0,
            skipped: 0,
        }
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &H {
        self.host
    }

    /// Returns the outline layers produced so far, in creation order.
    #[must_use]
    pub fn outlines(&self) -> &[H::Layer] {
        &self.outlines
    }

    /// Visits `node` as the root of a walk.
    pub fn visit(&mut self, node: H::Layer, config: &OutlineConfig) -> Result<Visit<H::Layer>> {
        self.visit_at(node, config, 0)
    }

    /// Ends the walk, checking that every paint override was undone.
    pub fn finish(self) -> Result<RunSummary<H::Layer>> {
        for slot in [PaintSlot::Foreground, PaintSlot::Background] {
            let found = self.paint.depth(slot);
            if found != 0 {
                return Err(TraversalError::UnbalancedColorStack {
                    slot,
                    expected: 0,
                    found,
                }
                .into());
            }
        }
        Ok(RunSummary {
            outlines: self.outlines,
            merged: self.merged,
            skipped: self.skipped,
        })
    }

    fn visit_at(
        &mut self,
        node: H::Layer,
        config: &OutlineConfig,
        depth: usize,
    ) -> Result<Visit<H::Layer>> {
        if depth > config.max_depth {
            return Err(TraversalError::DepthExceeded(config.max_depth).into());
        }
        let name = self.host.name(node);
        self.tracer.frame_enter(&FrameEnterEvent {
            depth,
            name: &name,
            is_group: self.host.is_group(node),
        });

        let result = self.frame(node, &name, config, depth);

        self.tracer.frame_exit(&FrameExitEvent {
            depth,
            name: &name,
            outcome: result.as_ref().map_or(FrameOutcome::Failed, Visit::outcome),
        });
        result
    }

    fn frame(
        &mut self,
        node: H::Layer,
        name: &str,
        config: &OutlineConfig,
        depth: usize,
    ) -> Result<Visit<H::Layer>> {
        if !self.host.is_visible(node) {
            return Ok(self.skip(name, SkipReason::Hidden, depth));
        }
        let frame = match config::resolve(name, config) {
            Resolution::Proceed(frame) => frame,
            Resolution::Skip(reason) => return Ok(self.skip(name, reason, depth)),
        };
        tracing::debug!(
            layer = name,
            depth,
            thickness = frame.config.thickness,
            feather = frame.config.feather,
            separation = ?frame.config.separation,
            "frame resolved"
        );

        let scope = self.open_paint(&frame.config, depth)?;
        let result = match host::classify(&*self.host, node) {
            Node::Leaf(layer) => self
                .outline(layer, &frame, Placement::Below(layer), depth)
                .map(|outline| Visit::Outlined {
                    outline,
                    merge_source: frame.config.merge_source,
                }),
            Node::Group(group) => self.group(group, &frame, depth),
        };
        self.close_paint(scope, result, depth)
    }

    fn group(
        &mut self,
        group: GroupView<H::Layer>,
        frame: &Frame,
        depth: usize,
    ) -> Result<Visit<H::Layer>> {
        let layer = group.layer();
        match frame.config.separation {
            SeparationMode::SingleComposite => {
                let outline = self.outline(layer, frame, Placement::BottomOf(layer), depth)?;
                self.host.clear_selection()?;
                // The outline sits inside the group, not below it, so there
                // is nothing to merge into.
                Ok(Visit::Outlined {
                    outline,
                    merge_source: false,
                })
            }
            SeparationMode::PerGroup => {
                let nested: Vec<_> = group
                    .children(&*self.host)
                    .into_iter()
                    .filter(|&child| self.host.is_group(child) && self.host.is_visible(child))
                    .collect();
                self.with_hidden(&nested, |walker| {
                    walker.outline(layer, frame, Placement::BottomOf(layer), depth)?;
                    walker.host.clear_selection()?;
                    Ok(())
                })?;
                for child in nested {
                    self.visit_at(child, &frame.children, depth + 1)?;
                }
                Ok(Visit::Descended)
            }
            SeparationMode::PerLayer => {
                for child in group.children(&*self.host) {
                    let visit = self.visit_at(child, &frame.children, depth + 1)?;
                    // The group's setting decides; only a plain child that
                    // was outlined has its outline directly below it.
                    if let Visit::Outlined { outline, .. } = visit {
                        if frame.config.merge_source && !self.host.is_group(child) {
                            self.merge(child, outline, depth + 1)?;
                        }
                    }
                    self.host.clear_selection()?;
                }
                Ok(Visit::Descended)
            }
        }
    }

    /// Hides `layers`, runs `f`, and shows them again whatever `f` returned.
    fn with_hidden<T>(
        &mut self,
        layers: &[H::Layer],
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let mut hidden = Vec::with_capacity(layers.len());
        let mut result: Result<()> = Ok(());
        for &layer in layers {
            match self.host.set_visible(layer, false) {
                Ok(()) => hidden.push(layer),
                Err(error) => {
                    result = Err(error.into());
                    break;
                }
            }
        }
        let result = result.and_then(|()| f(self));

        let mut restored: Result<()> = Ok(());
        for layer in hidden {
            if let Err(error) = self.host.set_visible(layer, true) {
                if restored.is_ok() {
                    restored = Err(error.into());
                }
            }
        }
        let value = result?;
        restored?;
        Ok(value)
    }

    pub(crate) fn clear_selection(&mut self) -> Result<()> {
        self.host.clear_selection()?;
        Ok(())
    }

    pub(crate) fn skip(&mut self, name: &str, reason: SkipReason, depth: usize) -> Visit<H::Layer> {
        self.skipped += 1;
        tracing::debug!(layer = name, depth, ?reason, "skipped");
        self.tracer.skip(&SkipEvent {
            depth,
            name,
            reason,
        });
        Visit::Skipped(reason)
    }

    pub(crate) fn open_paint(&mut self, config: &OutlineConfig, depth: usize) -> Result<PaintScope> {
        let scope = self
            .paint
            .open(&mut *self.host, config.fill_slot, config.color)?;
        if let (true, Some(color)) = (scope.is_override(), config.color) {
            self.tracer.paint(&PaintEvent {
                depth,
                slot: config.fill_slot,
                color,
                action: PaintAction::Override,
            });
        }
        Ok(scope)
    }

    pub(crate) fn close_paint<T>(
        &mut self,
        scope: PaintScope,
        result: Result<T>,
        depth: usize,
    ) -> Result<T> {
        let slot = scope.slot();
        let overridden = scope.is_override();
        let result = self.paint.close(&mut *self.host, scope, result);
        if overridden {
            self.tracer.paint(&PaintEvent {
                depth,
                slot,
                color: self.host.paint_color(slot),
                action: PaintAction::Restore,
            });
        }
        result
    }

    pub(crate) fn outline(
        &mut self,
        source: H::Layer,
        frame: &Frame,
        placement: Placement<H::Layer>,
        depth: usize,
    ) -> Result<H::Layer> {
        let params = StrokeParams {
            thickness: frame.config.thickness,
            feather: frame.config.feather,
            fill_slot: frame.config.fill_slot,
        };
        let outline = synth::synthesize(&mut *self.host, source, params, placement, &frame.naming)?;
        self.outlines.push(outline);
        self.tracer.outline(&OutlineEvent {
            depth,
            source: &self.host.name(source),
            outline: &self.host.name(outline),
            thickness: params.thickness,
            feather: params.feather,
            placement: placement.kind(),
        });
        Ok(outline)
    }

    /// Merges `source` down into `outline`, which must sit directly below
    /// it, and gives the result the source's name.
    pub(crate) fn merge(&mut self, source: H::Layer, outline: H::Layer, depth: usize) -> Result<()> {
        let name = self.host.name(source);
        let merged = self.host.merge_down(source)?;
        self.host.set_name(merged, &name)?;
        if let Some(slot) = self.outlines.iter_mut().find(|slot| **slot == outline) {
            *slot = merged;
        }
        self.merged += 1;
        tracing::debug!(layer = %name, depth, "merged source into outline");
        self.tracer.merge(&MergeEvent { depth, name: &name });
        Ok(())
    }
}
