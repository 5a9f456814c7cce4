// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serializable document descriptions.
//!
//! ```json
//! {
//!   "width": 200, "height": 120, "model": "rgb",
//!   "background": "#ffffff",
//!   "active": "Character",
//!   "layers": [
//!     { "name": "Character ()=>outline separate_layers", "children": [
//!       { "name": "Hair", "bounds": [40, 10, 90, 40] },
//!       { "name": "Sketch", "visible": false, "bounds": [0, 0, 200, 120] }
//!     ] },
//!     { "name": "Paper", "bounds": [0, 0, 200, 120] }
//!   ]
//! }
//! ```
//!
//! A layer with a `children` list is a group, even if the list is empty.

use kurbo::Rect;
use outliner_core::Rgb;
use outliner_core::host::ColorModel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{Document, PATH_SEPARATOR};
use crate::layer::LayerId;

/// An invalid description.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DescriptionError {
    /// The active path names no layer.
    #[error("active layer `{0}` not found")]
    UnknownActive(String),
    /// The active path is empty.
    #[error("active layer path is empty")]
    EmptyPath,
    /// A layer's bounds are inverted.
    #[error("layer `{0}` has inverted bounds")]
    InvalidBounds(String),
    /// A group was given bounds.
    #[error("group `{0}` cannot have bounds")]
    GroupBounds(String),
}

/// A whole document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentDescription {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Base color model.
    #[serde(default)]
    pub model: ColorModel,
    /// Initial foreground color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Rgb>,
    /// Initial background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,
    /// `/`-separated name path of the active layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
    /// Top-level layers, top to bottom.
    #[serde(default)]
    pub layers: Vec<LayerDescription>,
}

/// One layer or group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerDescription {
    /// Display name, directives included.
    pub name: String,
    /// Own visibility flag.
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    /// Opaque content bounds `[x0, y0, x1, y1]` of a raster layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[f64; 4]>,
    /// Children top to bottom; present for groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LayerDescription>>,
}

fn visible_by_default() -> bool {
    true
}

impl Document {
    /// Builds a document from a description.
    pub fn from_description(desc: &DocumentDescription) -> Result<Self, DescriptionError> {
        let mut doc = Self::new(desc.width, desc.height, desc.model);
        if let Some(color) = desc.foreground {
            doc.set_colors(color, doc.background());
        }
        if let Some(color) = desc.background {
            doc.set_colors(doc.foreground(), color);
        }
        for layer in &desc.layers {
            add(&mut doc, None, layer)?;
        }
        if let Some(path) = &desc.active {
            if path.split(PATH_SEPARATOR).all(str::is_empty) {
                return Err(DescriptionError::EmptyPath);
            }
            let active = doc
                .find(path)
                .ok_or_else(|| DescriptionError::UnknownActive(path.clone()))?;
            doc.set_active(Some(active));
        }
        Ok(doc)
    }
}

fn add(
    doc: &mut Document,
    parent: Option<LayerId>,
    desc: &LayerDescription,
) -> Result<(), DescriptionError> {
    let id = match &desc.children {
        Some(children) => {
            if desc.bounds.is_some() {
                return Err(DescriptionError::GroupBounds(desc.name.clone()));
            }
            let group = doc.add_group(parent, &desc.name);
            for child in children {
                add(doc, Some(group), child)?;
            }
            group
        }
        None => {
            let content = desc
                .bounds
                .map(|[x0, y0, x1, y1]| {
                    if x1 < x0 || y1 < y0 {
                        Err(DescriptionError::InvalidBounds(desc.name.clone()))
                    } else {
                        Ok(Rect::new(x0, y0, x1, y1))
                    }
                })
                .transpose()?;
            doc.add_layer(parent, &desc.name, content)
        }
    };
    if !desc.visible {
        doc.hide(id);
    }
    Ok(())
}
