// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays layer storage with allocation, topology, and property management.

use kurbo::Rect;
use outliner_core::Rgb;
use outliner_core::host::LayerFormat;

use super::id::{INVALID, LayerId, LayerKind};
use super::traverse::Children;

/// Struct-of-arrays storage for all layers.
///
/// Layers are addressed by [`LayerId`] handles. Internally, each layer occupies
/// a slot in parallel arrays. Destroyed layers are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// Children are ordered top to bottom: the first child is the topmost layer
/// of its group, matching editor stack indices.
#[derive(Debug)]
pub struct LayerStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Properties --
    pub(crate) name: Vec<String>,
    pub(crate) kind: Vec<LayerKind>,
    pub(crate) visible: Vec<bool>,
    pub(crate) format: Vec<LayerFormat>,
    pub(crate) content: Vec<Option<Rect>>,
    pub(crate) fill: Vec<Option<Rgb>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStore {
    /// Creates an empty layer store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            name: Vec::new(),
            kind: Vec::new(),
            visible: Vec::new(),
            format: Vec::new(),
            content: Vec::new(),
            fill: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    // -- Allocation API --

    /// Creates a detached, visible, empty layer and returns its handle.
    pub fn create_layer(&mut self, name: &str, kind: LayerKind, format: LayerFormat) -> LayerId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            name.clone_into(&mut self.name[i]);
            self.kind[i] = kind;
            self.visible[i] = true;
            self.format[i] = format;
            self.content[i] = None;
            self.fill[i] = None;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.name.push(name.to_owned());
            self.kind.push(kind);
            self.visible.push(true);
            self.format.push(format);
            self.content.push(None);
            self.fill.push(None);
            self.generation.push(0);
            idx
        };
        self.handle(idx)
    }

    /// Destroys a layer, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the layer has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_layer(&mut self, id: LayerId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy layer with children"
        );
        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }
        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
    }

    /// Returns whether the given handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: LayerId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of live layers, attached or not.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Adds `child` as the bottom child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: LayerId, child: LayerId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or `sibling`
    /// has no parent.
    pub fn insert_before(&mut self, child: LayerId, sibling: LayerId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;
    }

    /// Inserts `child` into `parent` at stack index `position` (0 is topmost).
    /// A position equal to the child count appends at the bottom.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or
    /// `position` is past the bottom.
    pub fn insert_at(&mut self, parent: LayerId, child: LayerId, position: usize) {
        let sibling = self.children(parent).nth(position);
        match sibling {
            Some(sibling) => self.insert_before(child, sibling),
            None => {
                let count = self.child_count(parent);
                assert!(
                    position == count,
                    "position {position} out of range ({count} children)"
                );
                self.add_child(parent, child);
            }
        }
    }

    /// Removes `child` from its current parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the layer has no parent.
    pub fn remove_from_parent(&mut self, child: LayerId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "layer has no parent");
        self.unlink_from_parent(c);
    }

    /// Returns the parent of a layer, if any.
    #[must_use]
    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.handle(p))
    }

    /// Returns the sibling directly below a layer, if any.
    #[must_use]
    pub fn next_sibling(&self, id: LayerId) -> Option<LayerId> {
        self.validate(id);
        let next = self.next_sibling[id.idx as usize];
        (next != INVALID).then(|| self.handle(next))
    }

    /// Returns an iterator over the direct children of a layer.
    #[must_use]
    pub fn children(&self, id: LayerId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the number of direct children of a layer.
    #[must_use]
    pub fn child_count(&self, id: LayerId) -> usize {
        self.children(id).count()
    }

    // -- Property getters --

    /// Returns the display name of a layer.
    #[must_use]
    pub fn name(&self, id: LayerId) -> &str {
        self.validate(id);
        &self.name[id.idx as usize]
    }

    /// Returns whether a layer is a raster layer or a group.
    #[must_use]
    pub fn kind(&self, id: LayerId) -> LayerKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Returns the layer's own visibility flag.
    #[must_use]
    pub fn is_visible(&self, id: LayerId) -> bool {
        self.validate(id);
        self.visible[id.idx as usize]
    }

    /// Returns the pixel format of a layer.
    #[must_use]
    pub fn format(&self, id: LayerId) -> LayerFormat {
        self.validate(id);
        self.format[id.idx as usize]
    }

    /// Returns the bounds of a raster layer's opaque pixels.
    #[must_use]
    pub fn content(&self, id: LayerId) -> Option<Rect> {
        self.validate(id);
        self.content[id.idx as usize]
    }

    /// Returns the color last filled into a raster layer.
    #[must_use]
    pub fn fill(&self, id: LayerId) -> Option<Rgb> {
        self.validate(id);
        self.fill[id.idx as usize]
    }

    // -- Mutation API --

    /// Renames a layer.
    pub fn set_name(&mut self, id: LayerId, name: &str) {
        self.validate(id);
        name.clone_into(&mut self.name[id.idx as usize]);
    }

    /// Sets the layer's own visibility flag.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        self.validate(id);
        self.visible[id.idx as usize] = visible;
    }

    /// Sets the bounds of a raster layer's opaque pixels.
    pub fn set_content(&mut self, id: LayerId, content: Option<Rect>) {
        self.validate(id);
        self.content[id.idx as usize] = content;
    }

    /// Records the color a raster layer was filled with.
    pub fn set_fill(&mut self, id: LayerId, fill: Option<Rgb>) {
        self.validate(id);
        self.fill[id.idx as usize] = fill;
    }

    // -- Internal helpers --

    pub(crate) fn handle(&self, idx: u32) -> LayerId {
        LayerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if the handle is stale.
    fn validate(&self, id: LayerId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale LayerId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Removes `idx` from its parent's child list.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(store: &mut LayerStore, name: &str) -> LayerId {
        store.create_layer(name, LayerKind::Raster, LayerFormat::Rgba)
    }

    fn group(store: &mut LayerStore, name: &str) -> LayerId {
        store.create_layer(name, LayerKind::Group, LayerFormat::Rgba)
    }

    #[test]
    fn create_and_destroy() {
        let mut store = LayerStore::new();
        let id = raster(&mut store, "a");
        assert!(store.is_alive(id));
        store.destroy_layer(id);
        assert!(!store.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = LayerStore::new();
        let id1 = raster(&mut store, "old");
        store.destroy_layer(id1);
        let id2 = group(&mut store, "new");
        // id2 reuses the same slot but has a different generation.
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert_eq!(store.name(id2), "new");
        assert_eq!(store.kind(id2), LayerKind::Group);
        assert!(store.is_visible(id2), "reused slot starts visible");
    }

    #[test]
    fn add_child_and_query() {
        let mut store = LayerStore::new();
        let parent = group(&mut store, "g");
        let child1 = raster(&mut store, "a");
        let child2 = raster(&mut store, "b");

        store.add_child(parent, child1);
        store.add_child(parent, child2);

        assert_eq!(store.parent(child1), Some(parent));
        assert_eq!(store.parent(child2), Some(parent));
        assert_eq!(store.next_sibling(child1), Some(child2));
        assert_eq!(store.next_sibling(child2), None);

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![child1, child2]);
        assert_eq!(store.child_count(parent), 2);
    }

    #[test]
    fn remove_from_parent_works() {
        let mut store = LayerStore::new();
        let parent = group(&mut store, "g");
        let child = raster(&mut store, "a");

        store.add_child(parent, child);
        store.remove_from_parent(child);
        assert_eq!(store.parent(child), None);
        assert!(store.children(parent).next().is_none());
    }

    #[test]
    fn insert_at_positions() {
        let mut store = LayerStore::new();
        let parent = group(&mut store, "g");
        let a = raster(&mut store, "a");
        let b = raster(&mut store, "b");
        let c = raster(&mut store, "c");
        let d = raster(&mut store, "d");

        store.insert_at(parent, b, 0);
        store.insert_at(parent, a, 0);
        store.insert_at(parent, d, 2);
        store.insert_at(parent, c, 2);

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![a, b, c, d]);
    }

    #[test]
    #[should_panic(expected = "position 3 out of range")]
    fn insert_past_bottom_panics() {
        let mut store = LayerStore::new();
        let parent = group(&mut store, "g");
        let a = raster(&mut store, "a");
        store.insert_at(parent, a, 3);
    }

    #[test]
    fn properties_round_trip() {
        let mut store = LayerStore::new();
        let id = store.create_layer("a", LayerKind::Raster, LayerFormat::GrayA);
        assert_eq!(store.format(id), LayerFormat::GrayA);
        assert_eq!(store.content(id), None);

        let bounds = Rect::new(1.0, 2.0, 3.0, 4.0);
        store.set_content(id, Some(bounds));
        store.set_fill(id, Some(Rgb::WHITE));
        store.set_visible(id, false);
        store.set_name(id, "renamed");

        assert_eq!(store.content(id), Some(bounds));
        assert_eq!(store.fill(id), Some(Rgb::WHITE));
        assert!(!store.is_visible(id), "visibility flag was cleared");
        assert_eq!(store.name(id), "renamed");
    }

    #[test]
    #[should_panic(expected = "cannot destroy layer with children")]
    fn destroy_with_children_panics() {
        let mut store = LayerStore::new();
        let parent = group(&mut store, "g");
        let child = raster(&mut store, "a");
        store.add_child(parent, child);
        store.destroy_layer(parent);
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn destroyed_handle_panics_on_name() {
        let mut store = LayerStore::new();
        let id = raster(&mut store, "a");
        store.destroy_layer(id);
        let _ = store.name(id);
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn destroyed_handle_panics_on_add_child() {
        let mut store = LayerStore::new();
        let root = group(&mut store, "g");
        let id = raster(&mut store, "a");
        store.destroy_layer(id);
        store.add_child(root, id);
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn destroyed_handle_panics_on_parent() {
        let mut store = LayerStore::new();
        let id = raster(&mut store, "a");
        store.destroy_layer(id);
        let _ = store.parent(id);
    }
}
