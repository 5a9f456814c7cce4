// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory document implementing [`Host`].
//!
//! Top-level layers are children of a hidden root group, so every layer has
//! a store parent while [`Host::parent`] still reports `None` at the top
//! level.
//!
//! Misuse that a real editor would reject (stale handles, filling a group,
//! merging with nothing below or into a group, inserting out of range) comes back as
//! [`HostError`], so walks against a document exercise the same error paths
//! as against an editor. Builder methods used to set a document up panic
//! instead, like the store.

use kurbo::Rect;
use outliner_core::host::{BlendMode, Canvas, ColorModel, Host, NewLayer};
use outliner_core::paint::PaintSlot;
use outliner_core::{HostError, Rgb};
use serde::Serialize;

use crate::layer::{LayerId, LayerKind, LayerStore};
use crate::selection::Selection;

/// Separator of layer paths accepted by [`Document::find`].
pub const PATH_SEPARATOR: char = '/';

/// A layered image without pixels.
#[derive(Debug)]
pub struct Document {
    store: LayerStore,
    root: LayerId,
    canvas: Canvas,
    active: Option<LayerId>,
    selection: Selection,
    foreground: Rgb,
    background: Rgb,
    failure: Option<Failure>,
}

/// A scripted host failure.
#[derive(Clone, Copy, Debug)]
struct Failure {
    operation: &'static str,
    remaining: usize,
}

impl Document {
    /// Creates an empty document with black foreground and white background.
    #[must_use]
    pub fn new(width: u32, height: u32, model: ColorModel) -> Self {
        let mut store = LayerStore::new();
        let root = store.create_layer("", LayerKind::Group, model.layer_format());
        Self {
            store,
            root,
            canvas: Canvas {
                width,
                height,
                model,
            },
            active: None,
            selection: Selection::EMPTY,
            foreground: Rgb::BLACK,
            background: Rgb::WHITE,
            failure: None,
        }
    }

    /// Returns the layer store.
    #[must_use]
    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    /// Returns the current selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Returns the canvas as a rectangle.
    #[must_use]
    pub fn canvas_rect(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        )
    }

    /// Adds a raster layer at the bottom of `parent` (`None` for the top
    /// level) with opaque content inside `content`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale or not a group.
    pub fn add_layer(&mut self, parent: Option<LayerId>, name: &str, content: Option<Rect>) -> LayerId {
        let id = self.attach(parent, name, LayerKind::Raster);
        self.store.set_content(id, content);
        id
    }

    /// Adds an empty group at the bottom of `parent` (`None` for the top
    /// level).
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale or not a group.
    pub fn add_group(&mut self, parent: Option<LayerId>, name: &str) -> LayerId {
        self.attach(parent, name, LayerKind::Group)
    }

    fn attach(&mut self, parent: Option<LayerId>, name: &str, kind: LayerKind) -> LayerId {
        let parent = parent.unwrap_or(self.root);
        assert!(
            self.store.kind(parent) == LayerKind::Group,
            "cannot add a layer under raster layer `{}`",
            self.store.name(parent)
        );
        let id = self
            .store
            .create_layer(name, kind, self.canvas.model.layer_format());
        self.store.add_child(parent, id);
        id
    }

    /// Returns the active foreground color.
    #[must_use]
    pub fn foreground(&self) -> Rgb {
        self.foreground
    }

    /// Returns the active background color.
    #[must_use]
    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Sets both active paint colors.
    pub fn set_colors(&mut self, foreground: Rgb, background: Rgb) {
        self.foreground = foreground;
        self.background = background;
    }

    /// Clears a layer's visibility flag.
    ///
    /// # Panics
    ///
    /// Panics if `layer` is stale.
    pub fn hide(&mut self, layer: LayerId) {
        self.store.set_visible(layer, false);
    }

    /// Makes `layer` the active layer.
    pub fn set_active(&mut self, layer: Option<LayerId>) {
        self.active = layer;
    }

    /// Makes the next `after` calls of `operation` succeed and every later
    /// call fail.
    pub fn fail_after(&mut self, operation: &'static str, after: usize) {
        self.failure = Some(Failure {
            operation,
            remaining: after,
        });
    }

    /// Finds a layer by its `/`-separated name path from the top level.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<LayerId> {
        path.split(PATH_SEPARATOR)
            .try_fold(self.root, |parent, name| {
                if self.store.kind(parent) != LayerKind::Group {
                    return None;
                }
                self.store
                    .children(parent)
                    .find(|&child| self.store.name(child) == name)
            })
            .filter(|&id| id != self.root)
    }

    /// Returns the names of the children of `parent` (`None` for the top
    /// level), top to bottom.
    #[must_use]
    pub fn child_names(&self, parent: Option<LayerId>) -> Vec<String> {
        self.store
            .children(parent.unwrap_or(self.root))
            .map(|child| self.store.name(child).to_owned())
            .collect()
    }

    /// Returns a serializable copy of the layer tree.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LayerSnapshot> {
        self.store
            .children(self.root)
            .map(|child| self.snapshot_of(child))
            .collect()
    }

    fn snapshot_of(&self, id: LayerId) -> LayerSnapshot {
        let group = self.store.kind(id) == LayerKind::Group;
        LayerSnapshot {
            name: self.store.name(id).to_owned(),
            visible: self.store.is_visible(id),
            bounds: self
                .store
                .content(id)
                .map(|rect| [rect.x0, rect.y0, rect.x1, rect.y1]),
            fill: self.store.fill(id),
            children: group.then(|| {
                self.store
                    .children(id)
                    .map(|child| self.snapshot_of(child))
                    .collect()
            }),
        }
    }

    fn check(&mut self, operation: &'static str) -> Result<(), HostError> {
        let Some(failure) = &mut self.failure else {
            return Ok(());
        };
        if failure.operation != operation {
            return Ok(());
        }
        if failure.remaining == 0 {
            return Err(HostError::new(operation, "scripted failure"));
        }
        failure.remaining -= 1;
        Ok(())
    }

    fn live(&self, operation: &'static str, layer: LayerId) -> Result<(), HostError> {
        if self.store.is_alive(layer) && layer != self.root {
            Ok(())
        } else {
            Err(HostError::new(operation, format!("no such layer {layer:?}")))
        }
    }

    /// Destroys `layer` and everything below it.
    fn destroy_subtree(&mut self, layer: LayerId) {
        let children: Vec<_> = self.store.children(layer).collect();
        for child in children {
            self.destroy_subtree(child);
        }
        self.store.destroy_layer(layer);
    }
}

/// One node of [`Document::snapshot`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayerSnapshot {
    /// Display name.
    pub name: String,
    /// Own visibility flag.
    pub visible: bool,
    /// Opaque content bounds as `[x0, y0, x1, y1]`, for raster layers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[f64; 4]>,
    /// Last fill color, for raster layers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgb>,
    /// Children top to bottom, for groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LayerSnapshot>>,
}

impl Host for Document {
    type Layer = LayerId;

    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn active_layer(&self) -> Option<LayerId> {
        self.active.filter(|&id| self.store.is_alive(id))
    }

    fn name(&self, layer: LayerId) -> String {
        self.store.name(layer).to_owned()
    }

    fn set_name(&mut self, layer: LayerId, name: &str) -> Result<(), HostError> {
        self.check("set_name")?;
        self.live("set_name", layer)?;
        self.store.set_name(layer, name);
        Ok(())
    }

    fn is_group(&self, layer: LayerId) -> bool {
        self.store.kind(layer) == LayerKind::Group
    }

    fn is_visible(&self, layer: LayerId) -> bool {
        self.store.is_visible(layer)
    }

    fn set_visible(&mut self, layer: LayerId, visible: bool) -> Result<(), HostError> {
        self.check("set_visible")?;
        self.live("set_visible", layer)?;
        self.store.set_visible(layer, visible);
        Ok(())
    }

    fn parent(&self, layer: LayerId) -> Option<LayerId> {
        self.store.parent(layer).filter(|&parent| parent != self.root)
    }

    fn children(&self, parent: Option<LayerId>) -> Vec<LayerId> {
        self.store.children(parent.unwrap_or(self.root)).collect()
    }

    fn select_alpha(&mut self, layer: LayerId) -> Result<(), HostError> {
        self.check("select_alpha")?;
        self.live("select_alpha", layer)?;
        self.selection = Selection::alpha_of(&self.store, layer);
        Ok(())
    }

    fn grow_selection(&mut self, pixels: u32) -> Result<(), HostError> {
        self.check("grow_selection")?;
        let canvas = self.canvas_rect();
        self.selection.grow(pixels, canvas);
        Ok(())
    }

    fn feather_selection(&mut self, radius: u32) -> Result<(), HostError> {
        self.check("feather_selection")?;
        self.selection.feather_by(radius);
        Ok(())
    }

    fn clear_selection(&mut self) -> Result<(), HostError> {
        self.check("clear_selection")?;
        self.selection = Selection::EMPTY;
        Ok(())
    }

    fn fill_selection(
        &mut self,
        layer: LayerId,
        color: Rgb,
        blend: BlendMode,
        opacity: f32,
    ) -> Result<(), HostError> {
        const OPERATION: &str = "fill_selection";
        self.check(OPERATION)?;
        self.live(OPERATION, layer)?;
        if self.is_group(layer) {
            return Err(HostError::new(OPERATION, "cannot fill a group"));
        }
        if !(0.0..=100.0).contains(&opacity) {
            return Err(HostError::new(OPERATION, format!("opacity {opacity} out of range")));
        }
        let BlendMode::Normal = blend;
        let Some(selected) = self.selection.bounds() else {
            return Ok(());
        };
        let content = self
            .store
            .content(layer)
            .map_or(selected, |existing| existing.union(selected));
        self.store.set_content(layer, Some(content));
        self.store.set_fill(layer, Some(color));
        Ok(())
    }

    fn create_layer(&mut self, layer: &NewLayer) -> Result<LayerId, HostError> {
        self.check("create_layer")?;
        if layer.width != self.canvas.width || layer.height != self.canvas.height {
            return Err(HostError::new(
                "create_layer",
                format!(
                    "layer size {}x{} does not match the canvas",
                    layer.width, layer.height
                ),
            ));
        }
        Ok(self
            .store
            .create_layer(&layer.name, LayerKind::Raster, layer.format))
    }

    fn insert_layer(
        &mut self,
        layer: LayerId,
        parent: Option<LayerId>,
        position: usize,
    ) -> Result<(), HostError> {
        const OPERATION: &str = "insert_layer";
        self.check(OPERATION)?;
        self.live(OPERATION, layer)?;
        if self.store.parent(layer).is_some() {
            return Err(HostError::new(OPERATION, "layer is already attached"));
        }
        let parent = match parent {
            Some(parent) => {
                self.live(OPERATION, parent)?;
                if !self.is_group(parent) {
                    return Err(HostError::new(OPERATION, "parent is not a group"));
                }
                parent
            }
            None => self.root,
        };
        let count = self.store.child_count(parent);
        if position > count {
            return Err(HostError::new(
                OPERATION,
                format!("position {position} out of range ({count} children)"),
            ));
        }
        self.store.insert_at(parent, layer, position);
        Ok(())
    }

    fn merge_down(&mut self, layer: LayerId) -> Result<LayerId, HostError> {
        const OPERATION: &str = "merge_down";
        self.check(OPERATION)?;
        self.live(OPERATION, layer)?;
        let Some(below) = self.store.next_sibling(layer) else {
            return Err(HostError::new(OPERATION, "no layer below"));
        };
        if self.is_group(below) {
            return Err(HostError::new(OPERATION, "cannot merge into a group"));
        }
        let upper = Selection::alpha_of(&self.store, layer).bounds();
        let content = match (upper, self.store.content(below)) {
            (Some(upper), Some(lower)) => Some(upper.union(lower)),
            (upper, lower) => upper.or(lower),
        };
        let fill = self.store.fill(below).or(self.store.fill(layer));
        self.store.set_content(below, content);
        self.store.set_fill(below, fill);
        self.store.set_visible(below, self.store.is_visible(layer));
        self.store.remove_from_parent(layer);
        self.destroy_subtree(layer);
        if self.active.is_some_and(|active| !self.store.is_alive(active)) {
            self.active = Some(below);
        }
        Ok(below)
    }

    fn paint_color(&self, slot: PaintSlot) -> Rgb {
        match slot {
            PaintSlot::Foreground => self.foreground,
            PaintSlot::Background => self.background,
        }
    }

    fn set_paint_color(&mut self, slot: PaintSlot, color: Rgb) -> Result<(), HostError> {
        self.check("set_paint_color")?;
        match slot {
            PaintSlot::Foreground => self.foreground = color,
            PaintSlot::Background => self.background = color,
        }
        Ok(())
    }
}
