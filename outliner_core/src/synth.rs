// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building one outline layer from one source.
//!
//! The source is either a plain layer (its own alpha) or a group (the
//! composite alpha of its visible descendants, as the host computes it for
//! [`Host::select_alpha`]). The steps are always the same:
//!
//! ```text
//!   select alpha ─► grow by thickness ─► feather (if > 0)
//!        ─► create canvas-sized layer ─► insert at placement
//!        ─► fill selection with the active paint color
//! ```
//!
//! The selection is left in place for the caller to clear, and the source is
//! never modified.

use crate::config::Naming;
use crate::directive;
use crate::error::Result;
use crate::host::{self, BlendMode, Host, NewLayer};
use crate::paint::PaintSlot;
use crate::trace::PlacementKind;

/// Name prefix of every produced outline layer.
pub const OUTLINE_PREFIX: &str = "outline::";

/// Fill opacity, in percent.
pub const FILL_OPACITY: f32 = 100.0;

/// Where a new outline layer goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement<L> {
    /// Directly below the given layer, in that layer's parent.
    Below(L),
    /// At the bottom of the given group's own children.
    BottomOf(L),
}

impl<L> Placement<L> {
    /// Returns the placement without its anchor.
    #[must_use]
    pub fn kind(&self) -> PlacementKind {
        match self {
            Self::Below(_) => PlacementKind::Below,
            Self::BottomOf(_) => PlacementKind::BottomOf,
        }
    }
}

/// Stroke geometry and fill source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrokeParams {
    /// Grow distance in pixels.
    pub thickness: u32,
    /// Feather radius in pixels.
    pub feather: u32,
    /// Paint slot whose active color fills the outline.
    pub fill_slot: PaintSlot,
}

/// Returns the name an outline of a layer named `source` receives.
#[must_use]
pub fn outline_name(source: &str, naming: &Naming) -> String {
    let base = if naming.preserve_command {
        source
    } else {
        directive::strip_commands(source)
    };
    let mut name =
        String::with_capacity(OUTLINE_PREFIX.len() + base.len() + naming.pass_suffix.len());
    name.push_str(OUTLINE_PREFIX);
    name.push_str(base);
    name.push_str(&naming.pass_suffix);
    name
}

/// Creates, places, and fills one outline layer around `source`.
///
/// Returns the new layer's handle.
pub fn synthesize<H: Host + ?Sized>(
    host: &mut H,
    source: H::Layer,
    params: StrokeParams,
    placement: Placement<H::Layer>,
    naming: &Naming,
) -> Result<H::Layer> {
    host.select_alpha(source)?;
    host.grow_selection(params.thickness)?;
    if params.feather > 0 {
        host.feather_selection(params.feather)?;
    }

    // Resolve the placement first so a bad anchor creates nothing.
    let (parent, position) = match placement {
        Placement::Below(anchor) => (host.parent(anchor), host::index_of(host, anchor)? + 1),
        Placement::BottomOf(group) => {
            let group = host::as_group(host, group)?;
            (Some(group.layer()), group.children(host).len())
        }
    };
    let name = outline_name(&host.name(source), naming);
    let outline = host.create_layer(&NewLayer::covering(host.canvas(), name))?;
    host.insert_layer(outline, parent, position)?;

    let color = host.paint_color(params.fill_slot);
    host.fill_selection(outline, color, BlendMode::Normal, FILL_OPACITY)?;
    tracing::debug!(
        source = %host.name(source),
        outline = %host.name(outline),
        position,
        "outline created"
    );
    Ok(outline)
}
