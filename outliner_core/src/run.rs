// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entry point.
//!
//! [`run`] starts from the host's active layer. A group with a recursive
//! separation mode is handed to the [`Walker`]; anything else (a plain layer,
//! or a group outlined as a single composite) is outlined directly, with
//! names ignored, and merged into its outline if `merge_source` is set.

use crate::config::{Frame, Naming, OutlineConfig, SkipReason};
use crate::error::{Result, TraversalError};
use crate::host::Host;
use crate::synth::Placement;
use crate::trace::Tracer;
use crate::walk::{Visit, Walker};

/// What a run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary<L> {
    /// Final handles of the produced outline layers, in creation order.
    /// Outlines a source was merged into are listed under the merged handle.
    pub outlines: Vec<L>,
    /// Number of sources merged into their outline.
    pub merged: usize,
    /// Number of nodes left alone.
    pub skipped: usize,
}

/// Outlines the host's active layer or group.
pub fn run<H: Host + ?Sized>(host: &mut H, config: &OutlineConfig) -> Result<RunSummary<H::Layer>> {
    run_traced(host, config, Tracer::none())
}

/// Like [`run`], reporting walk events to `tracer`.
pub fn run_traced<H: Host + ?Sized>(
    host: &mut H,
    config: &OutlineConfig,
    tracer: Tracer<'_>,
) -> Result<RunSummary<H::Layer>> {
    host.clear_selection()?;
    let active = host
        .active_layer()
        .ok_or(TraversalError::NoActiveLayer)?;
    let recursive = config.separation.is_recursive();
    let is_group = host.is_group(active);
    tracing::debug!(
        active = %host.name(active),
        is_group,
        recursive,
        "outline run"
    );

    let mut walker = Walker::new(host, tracer);
    if is_group && recursive {
        walker.visit(active, config)?;
    } else {
        outline_directly(&mut walker, active, config)?;
    }
    walker.finish()
}

fn outline_directly<H: Host + ?Sized>(
    walker: &mut Walker<'_, '_, H>,
    active: H::Layer,
    config: &OutlineConfig,
) -> Result<Visit<H::Layer>> {
    let name = walker.host().name(active);
    if !walker.host().is_visible(active) {
        return Ok(walker.skip(&name, SkipReason::Hidden, 0));
    }
    let frame = Frame {
        config: *config,
        naming: Naming::default(),
        children: *config,
    };
    let scope = walker.open_paint(config, 0)?;
    let placed = walker.outline(active, &frame, Placement::Below(active), 0);
    let result = walker
        .close_paint(scope, placed, 0)
        .and_then(|outline| {
            // A group is merged as its composite.
            if config.merge_source {
                walker.merge(active, outline, 0)?;
            }
            Ok(outline)
        });
    let cleared = walker.clear_selection();
    let outline = result?;
    cleared?;
    Ok(Visit::Outlined {
        outline,
        merge_source: config.merge_source,
    })
}
