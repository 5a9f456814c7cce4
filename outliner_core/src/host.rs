// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract with the host image editor.
//!
//! The outliner owns no pixels and no layer tree. Everything it does to a
//! document goes through [`Host`]: selection primitives, filling, layer
//! creation and insertion, merging, visibility, and the active paint colors.
//!
//! # Handles
//!
//! [`Host::Layer`] is an opaque handle chosen by the host. The walker copies
//! handles freely but never caches a layer's *position*: inserting, merging,
//! or deleting layers shifts sibling indices, so positions are recomputed
//! through [`index_of`] right before each insertion.
//!
//! # Groups
//!
//! [`classify`] is the single place that decides whether a node is a group.
//! It returns [`Node::Group`] carrying a [`GroupView`], so code that needs a
//! group's children can only get them from a node already known to be one.

use core::fmt;

use crate::color::Rgb;
use crate::error::{HostError, Result, TraversalError};
use crate::paint::PaintSlot;

/// The base color model of an image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ColorModel {
    /// RGB image.
    #[default]
    Rgb,
    /// Grayscale image.
    Grayscale,
}

impl ColorModel {
    /// Returns the alpha-carrying layer format for new layers in an image of
    /// this model.
    #[must_use]
    pub const fn layer_format(self) -> LayerFormat {
        match self {
            Self::Rgb => LayerFormat::Rgba,
            Self::Grayscale => LayerFormat::GrayA,
        }
    }
}

/// Pixel format of a newly created layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerFormat {
    /// RGB with alpha.
    Rgba,
    /// Gray with alpha.
    GrayA,
}

/// Canvas dimensions and color model of the edited image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Base color model.
    pub model: ColorModel,
}

/// Blend mode for selection fills. Only normal painting over alpha is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Paint over the existing alpha.
    #[default]
    Normal,
}

/// Parameters for [`Host::create_layer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewLayer {
    /// Display name.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: LayerFormat,
}

impl NewLayer {
    /// Describes a transparent layer covering the whole canvas.
    #[must_use]
    pub fn covering(canvas: Canvas, name: String) -> Self {
        Self {
            name,
            width: canvas.width,
            height: canvas.height,
            format: canvas.model.layer_format(),
        }
    }
}

/// Operations the outliner needs from an image editor.
///
/// Fallible operations return [`HostError`]; queries are infallible and may
/// assume the handle is live (the walker only queries handles it obtained
/// during the current call).
pub trait Host {
    /// Opaque layer handle.
    type Layer: Copy + Eq + fmt::Debug;

    /// Returns the canvas of the edited image.
    fn canvas(&self) -> Canvas;

    /// Returns the layer or group the user has selected, if any.
    fn active_layer(&self) -> Option<Self::Layer>;

    /// Returns the display name of a layer.
    fn name(&self, layer: Self::Layer) -> String;

    /// Renames a layer.
    fn set_name(&mut self, layer: Self::Layer, name: &str) -> Result<(), HostError>;

    /// Returns whether the layer is a group.
    fn is_group(&self, layer: Self::Layer) -> bool;

    /// Returns whether the layer's own visibility flag is on.
    fn is_visible(&self, layer: Self::Layer) -> bool;

    /// Sets a layer's visibility flag.
    fn set_visible(&mut self, layer: Self::Layer, visible: bool) -> Result<(), HostError>;

    /// Returns the enclosing group, or `None` at the image's top level.
    fn parent(&self, layer: Self::Layer) -> Option<Self::Layer>;

    /// Returns the children of `parent` top to bottom, or the image's top
    /// level layers for `None`.
    fn children(&self, parent: Option<Self::Layer>) -> Vec<Self::Layer>;

    /// Replaces the selection with the alpha of `layer` (the composite alpha
    /// of its visible descendants when it is a group).
    fn select_alpha(&mut self, layer: Self::Layer) -> Result<(), HostError>;

    /// Grows the selection outward by `pixels`.
    fn grow_selection(&mut self, pixels: u32) -> Result<(), HostError>;

    /// Softens the selection edge with the given radius.
    fn feather_selection(&mut self, radius: u32) -> Result<(), HostError>;

    /// Removes the selection.
    fn clear_selection(&mut self) -> Result<(), HostError>;

    /// Fills the selection on `layer` with `color`.
    fn fill_selection(
        &mut self,
        layer: Self::Layer,
        color: Rgb,
        blend: BlendMode,
        opacity: f32,
    ) -> Result<(), HostError>;

    /// Creates a detached layer.
    fn create_layer(&mut self, layer: &NewLayer) -> Result<Self::Layer, HostError>;

    /// Attaches a detached layer under `parent` (`None` for the top level) at
    /// `position` (0 is topmost).
    fn insert_layer(
        &mut self,
        layer: Self::Layer,
        parent: Option<Self::Layer>,
        position: usize,
    ) -> Result<(), HostError>;

    /// Merges `layer` into the layer directly below it and returns the
    /// merged layer, whose handle may differ from both inputs. A group is
    /// merged as its visible composite and disappears with its subtree.
    fn merge_down(&mut self, layer: Self::Layer) -> Result<Self::Layer, HostError>;

    /// Returns the active paint color for a slot.
    fn paint_color(&self, slot: PaintSlot) -> Rgb;

    /// Sets the active paint color for a slot.
    fn set_paint_color(&mut self, slot: PaintSlot, color: Rgb) -> Result<(), HostError>;
}

/// A layer-tree node, split by capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node<L> {
    /// A plain layer.
    Leaf(L),
    /// A group.
    Group(GroupView<L>),
}

/// A node known to be a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupView<L> {
    layer: L,
}

impl<L: Copy> GroupView<L> {
    /// Returns the group's handle.
    #[inline]
    #[must_use]
    pub fn layer(self) -> L {
        self.layer
    }

    /// Returns the group's current children, top to bottom.
    #[must_use]
    pub fn children<H>(self, host: &H) -> Vec<L>
    where
        H: Host<Layer = L> + ?Sized,
    {
        host.children(Some(self.layer))
    }
}

/// Splits a node into [`Node::Leaf`] or [`Node::Group`].
#[must_use]
pub fn classify<H: Host + ?Sized>(host: &H, layer: H::Layer) -> Node<H::Layer> {
    if host.is_group(layer) {
        Node::Group(GroupView { layer })
    } else {
        Node::Leaf(layer)
    }
}

/// Returns `layer` as a group, or [`TraversalError::NotAGroup`].
pub fn as_group<H: Host + ?Sized>(host: &H, layer: H::Layer) -> Result<GroupView<H::Layer>> {
    match classify(host, layer) {
        Node::Group(group) => Ok(group),
        Node::Leaf(_) => Err(TraversalError::NotAGroup(host.name(layer)).into()),
    }
}

/// Returns the stack index of `layer` among its siblings (0 is topmost).
pub fn index_of<H: Host + ?Sized>(host: &H, layer: H::Layer) -> Result<usize> {
    host.children(host.parent(layer))
        .iter()
        .position(|&sibling| sibling == layer)
        .ok_or_else(|| TraversalError::Orphaned(host.name(layer)).into())
}
