// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directives embedded in layer names.
//!
//! In auto mode each layer or group carries its own outline settings in its
//! display name:
//!
//! ```text
//!   Hair ()=>outline t=5 f=2 separate_layers color=#202020 >> ()=>outline t=1
//!   └┬─┘ └────┬────┘ └──────────────┬─────────────────────┘ └──────┬───────┘
//!   name   marker             directive block               pass-through
//! ```
//!
//! - Only the part of the name before the first [`BLOCK_SEPARATOR`] is
//!   searched for commands.
//! - [`SKIP_MARKER`] or [`END_MARKER`] anywhere in that part short-circuits
//!   to a single [`Directive::Skip`] or [`Directive::Terminate`].
//! - Otherwise the block follows [`OUTLINE_MARKER`] and runs to the next
//!   [`COMMAND_PREFIX`] or the end of the first part. Tokens are separated
//!   by spaces and written as `key` or `key=value`.
//! - Everything after the first [`BLOCK_SEPARATOR`] that follows the marker
//!   becomes a [`Directive::SetPassSuffix`], appended to the produced outline
//!   layer's name so the next run can pick it up.

use crate::color::Rgb;
use crate::error::ParseError;

/// Prefix shared by every command marker.
pub const COMMAND_PREFIX: &str = "()=>";

/// Introduces a directive block.
pub const OUTLINE_MARKER: &str = "()=>outline";

/// Marks a node as skipped.
pub const SKIP_MARKER: &str = "()=>skip";

/// Marks a node where traversal ends.
pub const END_MARKER: &str = "()=>end";

/// Separates the block applying to this run from pass-through text.
pub const BLOCK_SEPARATOR: &str = ">>";

/// One parsed directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// Stop here: no outline, no descent.
    Terminate,
    /// Skip this node: no outline, no descent.
    Skip,
    /// `t=<n>`: outline thickness in pixels.
    SetThickness(u32),
    /// `f=<n>`: feather radius in pixels.
    SetFeather(u32),
    /// `separate_groups`: outline nested groups as separate composites.
    SetSeparateGroups,
    /// `separate_layers`: outline every layer individually.
    SetSeparateLayers,
    /// `no_separate_groups`.
    ClearSeparateGroups,
    /// `no_separate_layers`.
    ClearSeparateLayers,
    /// `merge_source`: merge each source layer into its outline.
    SetMergeSource,
    /// `no_merge_source`.
    ClearMergeSource,
    /// `color=<hex>`: outline color.
    SetColor(Rgb),
    /// Text copied onto the produced outline layer's name.
    SetPassSuffix(String),
    /// `no_default_skip`: do not mark produced outlines with `()=>skip`.
    ClearDefaultSkipSuffix,
    /// `preserve_cmd`: keep the source's commands in the outline's name.
    PreserveCommandSuffix,
}

/// Parses the directives out of a layer name.
///
/// Returns `Ok(None)` when the name carries no directive block at all.
/// Unknown keys are ignored.
pub fn parse(name: &str) -> Result<Option<Vec<Directive>>, ParseError> {
    let first = first_command(name);
    if first.contains(SKIP_MARKER) {
        return Ok(Some(vec![Directive::Skip]));
    }
    if first.contains(END_MARKER) {
        return Ok(Some(vec![Directive::Terminate]));
    }
    let Some((_, after_marker)) = first.split_once(OUTLINE_MARKER) else {
        return Ok(None);
    };
    let block = after_marker
        .split_once(COMMAND_PREFIX)
        .map_or(after_marker, |(block, _)| block);

    let mut directives = Vec::new();
    for token in block.split(' ').filter(|token| !token.is_empty()) {
        if let Some(directive) = parse_token(token)? {
            directives.push(directive);
        }
    }
    if let Some(suffix) = pass_suffix(name) {
        directives.push(Directive::SetPassSuffix(suffix.to_owned()));
    }
    Ok(Some(directives))
}

/// Returns the source name with every command stripped, i.e. the part before
/// the first [`COMMAND_PREFIX`].
#[must_use]
pub fn strip_commands(name: &str) -> &str {
    name.split_once(COMMAND_PREFIX)
        .map_or(name, |(bare, _)| bare)
}

fn first_command(name: &str) -> &str {
    name.split_once(BLOCK_SEPARATOR)
        .map_or(name, |(first, _)| first)
}

fn pass_suffix(name: &str) -> Option<&str> {
    let (_, after_marker) = name.split_once(OUTLINE_MARKER)?;
    let (_, suffix) = after_marker.split_once(BLOCK_SEPARATOR)?;
    Some(suffix)
}

fn parse_token(token: &str) -> Result<Option<Directive>, ParseError> {
    let (key, value) = match token.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (token, None),
    };
    let directive = match key {
        "t" => Directive::SetThickness(integer("t", value)?),
        "f" => Directive::SetFeather(integer("f", value)?),
        "separate_groups" => Directive::SetSeparateGroups,
        "separate_layers" => Directive::SetSeparateLayers,
        "no_separate_groups" => Directive::ClearSeparateGroups,
        "no_separate_layers" => Directive::ClearSeparateLayers,
        "merge_source" => Directive::SetMergeSource,
        "no_merge_source" => Directive::ClearMergeSource,
        "color" => Directive::SetColor(
            value
                .ok_or(ParseError::MissingValue { key: "color" })?
                .parse()?,
        ),
        "pass" => Directive::SetPassSuffix(
            value
                .ok_or(ParseError::MissingValue { key: "pass" })?
                .to_owned(),
        ),
        "no_default_skip" => Directive::ClearDefaultSkipSuffix,
        "preserve_cmd" => Directive::PreserveCommandSuffix,
        unknown => {
            tracing::debug!(key = unknown, "ignoring unknown outline directive");
            return Ok(None);
        }
    };
    Ok(Some(directive))
}

fn integer(key: &'static str, value: Option<&str>) -> Result<u32, ParseError> {
    let value = value.ok_or(ParseError::MissingValue { key })?;
    value.parse().map_err(|_| ParseError::InvalidInteger {
        key,
        value: value.to_owned(),
    })
}
