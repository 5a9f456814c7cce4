// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Three families with different recovery policies:
//!
//! - [`ParseError`]: a malformed directive block in a layer name. The walker
//!   recovers locally by skipping the node or falling back to defaults.
//! - [`TraversalError`]: a broken walker invariant. Fatal.
//! - [`HostError`]: the host editor refused an operation. Fatal; layers
//!   created before the failure stay in the document.
//!
//! [`OutlineError`] is the union returned by the walk and entry points.

use thiserror::Error;

use crate::paint::PaintSlot;

/// A malformed directive block.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A key that needs a value was written without one.
    #[error("directive `{key}` needs a value")]
    MissingValue {
        /// The directive key.
        key: &'static str,
    },
    /// An integer-valued key did not hold a non-negative integer.
    #[error("directive `{key}` expects a non-negative integer, got `{value}`")]
    InvalidInteger {
        /// The directive key.
        key: &'static str,
        /// The offending value.
        value: String,
    },
    /// A color value was not a hex color.
    #[error("invalid color `{0}`, expected `#rgb` or `#rrggbb`")]
    InvalidColor(String),
}

/// A broken walker invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TraversalError {
    /// A color pop found nothing to pop.
    #[error("{0} color stack is empty")]
    EmptyColorStack(PaintSlot),
    /// A paint scope was closed at a different stack depth than it opened.
    #[error("{slot} color stack unbalanced: expected depth {expected}, found {found}")]
    UnbalancedColorStack {
        /// The affected stack.
        slot: PaintSlot,
        /// Depth the scope expected.
        expected: usize,
        /// Depth actually found.
        found: usize,
    },
    /// A plain layer was used where a group is required.
    #[error("layer `{0}` is not a group")]
    NotAGroup(String),
    /// A layer could not be found among its parent's children.
    #[error("layer `{0}` is not attached to the layer tree")]
    Orphaned(String),
    /// The layer tree nests deeper than the configured bound.
    #[error("layer tree nests deeper than {0} levels")]
    DepthExceeded(usize),
    /// The image has no active layer to start from.
    #[error("image has no active layer")]
    NoActiveLayer,
}

/// An operation refused by the host editor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{operation} failed: {message}")]
pub struct HostError {
    /// The host primitive that failed.
    pub operation: &'static str,
    /// Host-provided detail.
    pub message: String,
}

impl HostError {
    /// Creates a host error for the given primitive.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Any error that aborts an outline run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OutlineError {
    /// A walker invariant was broken.
    #[error(transparent)]
    Traversal(#[from] TraversalError),
    /// The host refused an operation.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Result alias used across the crate.
pub type Result<T, E = OutlineError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = ParseError::InvalidInteger {
            key: "t",
            value: "x".into(),
        };
        assert_eq!(
            err.to_string(),
            "directive `t` expects a non-negative integer, got `x`"
        );

        let err = OutlineError::from(TraversalError::EmptyColorStack(PaintSlot::Background));
        assert_eq!(err.to_string(), "background color stack is empty");

        let err = OutlineError::from(HostError::new("merge_down", "no layer below"));
        assert_eq!(err.to_string(), "merge_down failed: no layer below");
    }
}
