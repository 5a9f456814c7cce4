// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangular selection model.
//!
//! The document does not store pixels. Every raster layer keeps the bounding
//! rectangle of its opaque content, and a selection is such a rectangle plus
//! a feather radius. That is enough to check where outlines go and how far
//! they reach.

use kurbo::Rect;

use crate::layer::{LayerId, LayerKind, LayerStore};

/// The active selection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Selection {
    bounds: Option<Rect>,
    feather: u32,
}

impl Selection {
    /// Nothing selected.
    pub const EMPTY: Self = Self {
        bounds: None,
        feather: 0,
    };

    /// Selects the alpha of `layer`. For a group, that is the union of its
    /// visible descendants' content; hidden children and their subtrees do
    /// not contribute.
    #[must_use]
    pub fn alpha_of(store: &LayerStore, layer: LayerId) -> Self {
        Self {
            bounds: alpha_bounds(store, layer),
            feather: 0,
        }
    }

    /// Returns the selected rectangle, if any.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Returns the accumulated feather radius.
    #[must_use]
    pub fn feather(&self) -> u32 {
        self.feather
    }

    /// Returns whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Grows the selection by `pixels` on every side, clipped to `canvas`.
    pub fn grow(&mut self, pixels: u32, canvas: Rect) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let pixels = f64::from(pixels);
        let grown = bounds.inflate(pixels, pixels).intersect(canvas);
        self.bounds = (!grown.is_zero_area()).then_some(grown);
    }

    /// Softens the selection edge.
    pub fn feather_by(&mut self, radius: u32) {
        if self.bounds.is_some() {
            self.feather = self.feather.saturating_add(radius);
        }
    }
}

fn alpha_bounds(store: &LayerStore, layer: LayerId) -> Option<Rect> {
    match store.kind(layer) {
        LayerKind::Raster => store.content(layer),
        LayerKind::Group => store
            .children(layer)
            .filter(|&child| store.is_visible(child))
            .filter_map(|child| alpha_bounds(store, child))
            .reduce(|acc, rect| acc.union(rect)),
    }
}

#[cfg(test)]
mod tests {
    use outliner_core::host::LayerFormat;

    use super::*;

    const CANVAS: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    fn layer(store: &mut LayerStore, parent: LayerId, content: Rect) -> LayerId {
        let id = store.create_layer("l", LayerKind::Raster, LayerFormat::Rgba);
        store.set_content(id, Some(content));
        store.add_child(parent, id);
        id
    }

    #[test]
    fn group_alpha_is_the_union_of_visible_children() {
        let mut store = LayerStore::new();
        let group = store.create_layer("g", LayerKind::Group, LayerFormat::Rgba);
        layer(&mut store, group, Rect::new(10.0, 10.0, 20.0, 20.0));
        layer(&mut store, group, Rect::new(30.0, 5.0, 40.0, 15.0));
        let hidden = layer(&mut store, group, Rect::new(80.0, 80.0, 90.0, 90.0));
        store.set_visible(hidden, false);

        let selection = Selection::alpha_of(&store, group);
        assert_eq!(selection.bounds(), Some(Rect::new(10.0, 5.0, 40.0, 20.0)));
    }

    #[test]
    fn nested_hidden_group_is_excluded() {
        let mut store = LayerStore::new();
        let outer = store.create_layer("outer", LayerKind::Group, LayerFormat::Rgba);
        let inner = store.create_layer("inner", LayerKind::Group, LayerFormat::Rgba);
        store.add_child(outer, inner);
        layer(&mut store, inner, Rect::new(0.0, 0.0, 5.0, 5.0));
        layer(&mut store, outer, Rect::new(50.0, 50.0, 60.0, 60.0));

        store.set_visible(inner, false);
        assert_eq!(
            Selection::alpha_of(&store, outer).bounds(),
            Some(Rect::new(50.0, 50.0, 60.0, 60.0))
        );
    }

    #[test]
    fn empty_group_selects_nothing() {
        let mut store = LayerStore::new();
        let group = store.create_layer("g", LayerKind::Group, LayerFormat::Rgba);
        assert!(Selection::alpha_of(&store, group).is_empty());
    }

    #[test]
    fn grow_is_clipped_to_the_canvas() {
        let mut store = LayerStore::new();
        let group = store.create_layer("g", LayerKind::Group, LayerFormat::Rgba);
        let id = layer(&mut store, group, Rect::new(2.0, 50.0, 10.0, 60.0));

        let mut selection = Selection::alpha_of(&store, id);
        selection.grow(3, CANVAS);
        assert_eq!(selection.bounds(), Some(Rect::new(0.0, 47.0, 13.0, 63.0)));

        selection.feather_by(2);
        assert_eq!(selection.feather(), 2);
    }

    #[test]
    fn growing_nothing_stays_empty() {
        let mut selection = Selection::EMPTY;
        selection.grow(5, CANVAS);
        selection.feather_by(5);
        assert_eq!(selection, Selection::EMPTY);
    }
}
