// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outline configuration and per-frame resolution.
//!
//! Every walker frame works from an [`OutlineConfig`] handed down by its
//! parent. With auto mode off that config is used as is. With auto mode on,
//! [`resolve`] reads the node's name and combines three sources:
//!
//! 1. **Explicit**: the config the frame received.
//! 2. **Auto**: directives from the node's name, applied on top in order
//!    (later directives win for the same key).
//! 3. **Defaults**: an unconfigured node is outlined with the received config
//!    only if `use_defaults_when_unconfigured` is set; otherwise it is
//!    skipped along with its subtree.
//!
//! A configured node always hands its resolved config to its children. With
//! `inherit_auto_config` it also turns on `use_defaults_when_unconfigured`
//! for them, so unconfigured descendants are outlined with the settings of
//! their nearest configured ancestor instead of being skipped.

use crate::color::Rgb;
use crate::directive::{self, Directive};
use crate::paint::PaintSlot;

/// Default outline thickness in pixels.
pub const DEFAULT_THICKNESS: u32 = 3;

/// Default recursion bound.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Suffix appended to produced outline names unless a directive overrides
/// it, so outlines are left alone by the next auto run.
pub const DEFAULT_PASS_SUFFIX: &str = directive::SKIP_MARKER;

/// How a group is broken up into outlines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeparationMode {
    /// One outline for the group's whole composite.
    #[default]
    SingleComposite,
    /// One composite outline per group; nested groups are outlined on their
    /// own and excluded from their parent's composite.
    PerGroup,
    /// One outline per plain layer.
    PerLayer,
}

impl SeparationMode {
    /// Builds a mode from the `(separate_groups, separate_layers)` flag pair.
    /// Groups win if both are set.
    #[must_use]
    pub const fn from_flags(separate_groups: bool, separate_layers: bool) -> Self {
        match (separate_groups, separate_layers) {
            (true, _) => Self::PerGroup,
            (false, true) => Self::PerLayer,
            (false, false) => Self::SingleComposite,
        }
    }

    /// Returns whether this mode walks into children.
    #[must_use]
    pub const fn is_recursive(self) -> bool {
        !matches!(self, Self::SingleComposite)
    }
}

/// Outline settings for one walker frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OutlineConfig {
    /// Outline color. `None` keeps whatever paint color the host has active.
    pub color: Option<Rgb>,
    /// Grow distance in pixels.
    pub thickness: u32,
    /// Feather radius in pixels; 0 disables feathering.
    pub feather: u32,
    /// Traversal shape for groups.
    pub separation: SeparationMode,
    /// Merge each plain source layer down into its outline.
    pub merge_source: bool,
    /// Read directives from layer names.
    pub auto_mode: bool,
    /// Let unconfigured descendants of a configured node be outlined with
    /// its settings.
    pub inherit_auto_config: bool,
    /// Outline unconfigured nodes with the received settings instead of
    /// skipping them.
    pub use_defaults_when_unconfigured: bool,
    /// Which active paint color fills outlines.
    pub fill_slot: PaintSlot,
    /// Maximum group nesting the walker descends into.
    pub max_depth: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            color: Some(Rgb::BLACK),
            thickness: DEFAULT_THICKNESS,
            feather: 0,
            separation: SeparationMode::SingleComposite,
            merge_source: false,
            auto_mode: false,
            inherit_auto_config: false,
            use_defaults_when_unconfigured: false,
            fill_slot: PaintSlot::Background,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl OutlineConfig {
    /// Returns the config with the given color.
    #[must_use]
    pub fn with_color(mut self, color: Option<Rgb>) -> Self {
        self.color = color;
        self
    }

    /// Returns the config with the given thickness.
    #[must_use]
    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness;
        self
    }

    /// Returns the config with the given feather radius.
    #[must_use]
    pub fn with_feather(mut self, feather: u32) -> Self {
        self.feather = feather;
        self
    }

    /// Returns the config with the given separation mode.
    #[must_use]
    pub fn with_separation(mut self, separation: SeparationMode) -> Self {
        self.separation = separation;
        self
    }

    /// Returns the config with merging on or off.
    #[must_use]
    pub fn with_merge_source(mut self, merge_source: bool) -> Self {
        self.merge_source = merge_source;
        self
    }

    /// Returns the config with the three auto-mode switches set.
    #[must_use]
    pub fn with_auto(mut self, auto_mode: bool, inherit: bool, use_defaults: bool) -> Self {
        self.auto_mode = auto_mode;
        self.inherit_auto_config = inherit;
        self.use_defaults_when_unconfigured = use_defaults;
        self
    }

    /// Returns the config filling outlines from the given paint slot.
    #[must_use]
    pub fn with_fill_slot(mut self, fill_slot: PaintSlot) -> Self {
        self.fill_slot = fill_slot;
        self
    }

    /// Returns whether nested groups are outlined separately.
    #[must_use]
    pub const fn separate_groups(&self) -> bool {
        matches!(self.separation, SeparationMode::PerGroup)
    }

    /// Returns whether layers are outlined separately.
    #[must_use]
    pub const fn separate_layers(&self) -> bool {
        matches!(self.separation, SeparationMode::PerLayer)
    }

    fn set_separate_groups(&mut self, on: bool) {
        if on {
            self.separation = SeparationMode::PerGroup;
        } else if self.separate_groups() {
            self.separation = SeparationMode::SingleComposite;
        }
    }

    fn set_separate_layers(&mut self, on: bool) {
        if on {
            self.separation = SeparationMode::PerLayer;
        } else if self.separate_layers() {
            self.separation = SeparationMode::SingleComposite;
        }
    }
}

/// How the produced outline layer is named.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Naming {
    /// Text appended after the source name.
    pub pass_suffix: String,
    /// Keep the source's full name, commands included.
    pub preserve_command: bool,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            pass_suffix: DEFAULT_PASS_SUFFIX.to_owned(),
            preserve_command: false,
        }
    }
}

/// Why a node produced no outline and was not descended into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkipReason {
    /// The node's visibility flag is off.
    Hidden,
    /// The name carries `()=>skip`.
    Directive,
    /// The name carries `()=>end`.
    Terminated,
    /// Auto mode found no directive block and defaults are off.
    Unconfigured,
    /// Auto mode found a malformed block and defaults are off.
    Unparseable,
}

/// Settings for a frame that goes ahead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Settings for this node.
    pub config: OutlineConfig,
    /// Naming of outlines this node produces.
    pub naming: Naming,
    /// Settings handed to this node's children.
    pub children: OutlineConfig,
}

impl Frame {
    fn unchanged(config: &OutlineConfig) -> Self {
        Self {
            config: *config,
            naming: Naming::default(),
            children: *config,
        }
    }
}

/// Outcome of resolving a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Work on the node with these settings.
    Proceed(Frame),
    /// Leave the node and its subtree alone.
    Skip(SkipReason),
}

/// Resolves the settings for a node named `name` that received `incoming`.
#[must_use]
pub fn resolve(name: &str, incoming: &OutlineConfig) -> Resolution {
    if !incoming.auto_mode {
        return Resolution::Proceed(Frame::unchanged(incoming));
    }
    let directives = match directive::parse(name) {
        Ok(Some(directives)) => directives,
        Ok(None) => return fallback(incoming, SkipReason::Unconfigured),
        Err(error) => {
            tracing::warn!(layer = name, %error, "malformed outline directives");
            return fallback(incoming, SkipReason::Unparseable);
        }
    };

    let mut config = *incoming;
    let mut naming = Naming::default();
    for directive in directives {
        match directive {
            Directive::Terminate => return Resolution::Skip(SkipReason::Terminated),
            Directive::Skip => return Resolution::Skip(SkipReason::Directive),
            Directive::SetThickness(thickness) => config.thickness = thickness,
            Directive::SetFeather(feather) => config.feather = feather,
            Directive::SetSeparateGroups => config.set_separate_groups(true),
            Directive::SetSeparateLayers => config.set_separate_layers(true),
            Directive::ClearSeparateGroups => config.set_separate_groups(false),
            Directive::ClearSeparateLayers => config.set_separate_layers(false),
            Directive::SetMergeSource => config.merge_source = true,
            Directive::ClearMergeSource => config.merge_source = false,
            Directive::SetColor(color) => config.color = Some(color),
            Directive::SetPassSuffix(suffix) => naming.pass_suffix = suffix,
            Directive::ClearDefaultSkipSuffix => naming.pass_suffix.clear(),
            Directive::PreserveCommandSuffix => naming.preserve_command = true,
        }
    }

    let children = OutlineConfig {
        use_defaults_when_unconfigured: config.use_defaults_when_unconfigured
            || config.inherit_auto_config,
        ..config
    };
    Resolution::Proceed(Frame {
        config,
        naming,
        children,
    })
}

fn fallback(incoming: &OutlineConfig, reason: SkipReason) -> Resolution {
    if incoming.use_defaults_when_unconfigured {
        Resolution::Proceed(Frame::unchanged(incoming))
    } else {
        Resolution::Skip(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auto() -> OutlineConfig {
        OutlineConfig::default().with_auto(true, false, false)
    }

    fn proceed(resolution: Resolution) -> Frame {
        match resolution {
            Resolution::Proceed(frame) => frame,
            Resolution::Skip(reason) => panic!("expected to proceed, skipped: {reason:?}"),
        }
    }

    #[test]
    fn defaults_match_the_plugin_parameters() {
        let config = OutlineConfig::default();
        assert_eq!(config.color, Some(Rgb::BLACK));
        assert_eq!(config.thickness, 3);
        assert_eq!(config.feather, 0);
        assert_eq!(config.separation, SeparationMode::SingleComposite);
        assert!(!config.merge_source && !config.auto_mode);
        assert_eq!(config.fill_slot, PaintSlot::Background);
    }

    #[test]
    fn flag_pair_maps_to_modes() {
        assert_eq!(
            SeparationMode::from_flags(false, false),
            SeparationMode::SingleComposite
        );
        assert_eq!(
            SeparationMode::from_flags(true, false),
            SeparationMode::PerGroup
        );
        assert_eq!(
            SeparationMode::from_flags(false, true),
            SeparationMode::PerLayer
        );
        assert!(!SeparationMode::SingleComposite.is_recursive());
        assert!(SeparationMode::PerLayer.is_recursive());
    }

    #[test]
    fn manual_mode_ignores_names() {
        let config = OutlineConfig::default().with_thickness(7);
        let frame = proceed(resolve("x ()=>skip", &config));
        assert_eq!(frame.config, config);
        assert_eq!(frame.children, config);
        assert_eq!(frame.naming, Naming::default());
    }

    #[test]
    fn directives_override_the_baseline() {
        let baseline = auto()
            .with_thickness(3)
            .with_feather(0)
            .with_separation(SeparationMode::PerGroup);
        let frame = proceed(resolve("Hair ()=>outline t=5 f=2 separate_layers", &baseline));
        assert_eq!(frame.config.thickness, 5);
        assert_eq!(frame.config.feather, 2);
        assert!(frame.config.separate_layers());
        assert!(!frame.config.separate_groups());
    }

    #[test]
    fn later_directives_win() {
        let frame = proceed(resolve("x ()=>outline t=1 t=4 merge_source no_merge_source", &auto()));
        assert_eq!(frame.config.thickness, 4);
        assert!(!frame.config.merge_source);
    }

    #[test]
    fn clearing_the_inactive_flag_keeps_the_mode() {
        let baseline = auto().with_separation(SeparationMode::PerLayer);
        let frame = proceed(resolve("x ()=>outline no_separate_groups", &baseline));
        assert_eq!(frame.config.separation, SeparationMode::PerLayer);
        let frame = proceed(resolve("x ()=>outline no_separate_layers", &baseline));
        assert_eq!(frame.config.separation, SeparationMode::SingleComposite);
    }

    #[test]
    fn skip_and_terminate() {
        assert_eq!(
            resolve("x ()=>skip", &auto()),
            Resolution::Skip(SkipReason::Directive)
        );
        assert_eq!(
            resolve("x ()=>end", &auto()),
            Resolution::Skip(SkipReason::Terminated)
        );
    }

    #[test]
    fn unconfigured_nodes_follow_the_defaults_switch() {
        assert_eq!(
            resolve("plain", &auto()),
            Resolution::Skip(SkipReason::Unconfigured)
        );
        assert_eq!(
            resolve("x ()=>outline t=nope", &auto()),
            Resolution::Skip(SkipReason::Unparseable)
        );

        let lenient = OutlineConfig::default().with_auto(true, false, true);
        assert_eq!(proceed(resolve("plain", &lenient)).config, lenient);
        assert_eq!(
            proceed(resolve("x ()=>outline t=nope", &lenient)).config,
            lenient
        );
    }

    #[test]
    fn inheritance_hands_resolved_config_down() {
        let inherit = OutlineConfig::default().with_auto(true, true, false);
        let frame = proceed(resolve("g ()=>outline t=9 color=#00ff00", &inherit));
        assert_eq!(frame.children.thickness, 9);
        assert_eq!(frame.children.color, Some(Rgb::new(0, 0xff, 0)));
        assert!(frame.children.use_defaults_when_unconfigured);
        assert!(!frame.config.use_defaults_when_unconfigured);
    }

    #[test]
    fn without_inheritance_children_still_get_the_directives() {
        let frame = proceed(resolve("g ()=>outline t=9 separate_layers merge_source", &auto()));
        assert_eq!(frame.children.thickness, 9);
        assert_eq!(frame.children.separation, SeparationMode::PerLayer);
        assert!(frame.children.merge_source);
        assert!(
            !frame.children.use_defaults_when_unconfigured,
            "only inheritance turns on defaults for children"
        );
        assert_eq!(frame.children, frame.config);
    }

    #[test]
    fn naming_directives() {
        let frame = proceed(resolve("g ()=>outline no_default_skip", &auto()));
        assert_eq!(frame.naming.pass_suffix, "");
        let frame = proceed(resolve("g ()=>outline preserve_cmd >> ()=>outline t=1", &auto()));
        assert!(frame.naming.preserve_command);
        assert_eq!(frame.naming.pass_suffix, " ()=>outline t=1");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_deserializes_with_defaults() {
        let config: OutlineConfig =
            serde_json::from_str(r##"{ "thickness": 6, "separation": "per_layer", "color": "#ff0000" }"##)
                .unwrap();
        assert_eq!(config.thickness, 6);
        assert_eq!(config.separation, SeparationMode::PerLayer);
        assert_eq!(config.color, Some(Rgb::new(0xff, 0, 0)));
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }
}
