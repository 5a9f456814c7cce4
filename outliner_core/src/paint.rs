// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Foreground/background color stacks.
//!
//! A walker frame that carries its own outline color overrides the host's
//! active paint color for the duration of the frame and must hand the
//! caller's color back on every exit path, including skips and errors raised
//! deep inside the recursion.
//!
//! [`ColorStack::open`] saves the current host color, installs the override,
//! and returns a [`PaintScope`]. [`ColorStack::close`] consumes the scope,
//! pops, and restores the saved color no matter whether the frame succeeded.
//! Because the scope is `#[must_use]` and carries the depth it was opened at,
//! a frame that forgets to close, or closes out of order, is caught as
//! [`TraversalError::UnbalancedColorStack`] instead of silently leaking a
//! color into sibling frames.

use core::fmt;

use crate::color::Rgb;
use crate::error::{Result, TraversalError};
use crate::host::Host;

/// Which active paint color a stack tracks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PaintSlot {
    /// The foreground color.
    Foreground,
    /// The background color. Outlines are filled with it by default.
    #[default]
    Background,
}

impl fmt::Display for PaintSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Foreground => "foreground",
            Self::Background => "background",
        })
    }
}

/// Saved colors for both paint slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorStack {
    foreground: Vec<Rgb>,
    background: Vec<Rgb>,
}

/// Proof that a [`ColorStack::open`] happened.
///
/// Must be handed back to [`ColorStack::close`].
#[must_use = "a paint scope must be closed to restore the caller's color"]
#[derive(Debug, PartialEq, Eq)]
pub struct PaintScope {
    slot: PaintSlot,
    /// Stack depth after the push, or `None` if nothing was pushed.
    depth: Option<usize>,
}

impl PaintScope {
    /// Returns the slot this scope covers.
    #[must_use]
    pub fn slot(&self) -> PaintSlot {
        self.slot
    }

    /// Returns whether opening the scope overrode a color.
    #[must_use]
    pub fn is_override(&self) -> bool {
        self.depth.is_some()
    }
}

impl ColorStack {
    /// Creates empty stacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn stack_mut(&mut self, slot: PaintSlot) -> &mut Vec<Rgb> {
        match slot {
            PaintSlot::Foreground => &mut self.foreground,
            PaintSlot::Background => &mut self.background,
        }
    }

    /// Pushes a saved color.
    pub fn push(&mut self, slot: PaintSlot, color: Rgb) {
        self.stack_mut(slot).push(color);
    }

    /// Pops the most recently saved color.
    pub fn pop(&mut self, slot: PaintSlot) -> Result<Rgb, TraversalError> {
        self.stack_mut(slot)
            .pop()
            .ok_or(TraversalError::EmptyColorStack(slot))
    }

    /// Returns the number of saved colors for a slot.
    #[must_use]
    pub fn depth(&self, slot: PaintSlot) -> usize {
        match slot {
            PaintSlot::Foreground => self.foreground.len(),
            PaintSlot::Background => self.background.len(),
        }
    }

    /// Returns whether both stacks are empty.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.foreground.is_empty() && self.background.is_empty()
    }

    /// Overrides the host's `slot` color with `color`, saving the previous
    /// one. A `None` color opens an inert scope.
    pub fn open<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        slot: PaintSlot,
        color: Option<Rgb>,
    ) -> Result<PaintScope> {
        let Some(color) = color else {
            return Ok(PaintScope { slot, depth: None });
        };
        let previous = host.paint_color(slot);
        host.set_paint_color(slot, color)?;
        self.push(slot, previous);
        tracing::trace!(%slot, %color, %previous, "paint override");
        Ok(PaintScope {
            slot,
            depth: Some(self.depth(slot)),
        })
    }

    /// Closes `scope`, restoring the saved color, and passes `result`
    /// through.
    ///
    /// The restore happens even when `result` is an error; that error wins
    /// over any error raised while restoring.
    pub fn close<H: Host + ?Sized, T>(
        &mut self,
        host: &mut H,
        scope: PaintScope,
        result: Result<T>,
    ) -> Result<T> {
        let restored = self.restore(host, scope);
        let value = result?;
        restored?;
        Ok(value)
    }

    fn restore<H: Host + ?Sized>(&mut self, host: &mut H, scope: PaintScope) -> Result<()> {
        let Some(expected) = scope.depth else {
            return Ok(());
        };
        let found = self.depth(scope.slot);
        if found != expected {
            return Err(TraversalError::UnbalancedColorStack {
                slot: scope.slot,
                expected,
                found,
            }
            .into());
        }
        let previous = self.pop(scope.slot)?;
        host.set_paint_color(scope.slot, previous)?;
        tracing::trace!(slot = %scope.slot, color = %previous, "paint restored");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{HostError, OutlineError};
    use crate::host::{BlendMode, Canvas, NewLayer};

    /// A host that only has paint colors.
    #[derive(Debug, Default)]
    pub(crate) struct PaintHost {
        pub(crate) foreground: Rgb,
        pub(crate) background: Rgb,
        pub(crate) refuse_colors: bool,
    }

    impl Host for PaintHost {
        type Layer = u32;

        fn canvas(&self) -> Canvas {
            Canvas {
                width: 1,
                height: 1,
                model: crate::host::ColorModel::Rgb,
            }
        }
        fn active_layer(&self) -> Option<u32> {
            None
        }
        fn name(&self, _: u32) -> String {
            String::new()
        }
        fn set_name(&mut self, _: u32, _: &str) -> Result<(), HostError> {
            Ok(())
        }
        fn is_group(&self, _: u32) -> bool {
            false
        }
        fn is_visible(&self, _: u32) -> bool {
            true
        }
        fn set_visible(&mut self, _: u32, _: bool) -> Result<(), HostError> {
            Ok(())
        }
        fn parent(&self, _: u32) -> Option<u32> {
            None
        }
        fn children(&self, _: Option<u32>) -> Vec<u32> {
            Vec::new()
        }
        fn select_alpha(&mut self, _: u32) -> Result<(), HostError> {
            Ok(())
        }
        fn grow_selection(&mut self, _: u32) -> Result<(), HostError> {
            Ok(())
        }
        fn feather_selection(&mut self, _: u32) -> Result<(), HostError> {
            Ok(())
        }
        fn clear_selection(&mut self) -> Result<(), HostError> {
            Ok(())
        }
        fn fill_selection(&mut self, _: u32, _: Rgb, _: BlendMode, _: f32) -> Result<(), HostError> {
            Ok(())
        }
        fn create_layer(&mut self, _: &NewLayer) -> Result<u32, HostError> {
            Err(HostError::new("create_layer", "unsupported"))
        }
        fn insert_layer(&mut self, _: u32, _: Option<u32>, _: usize) -> Result<(), HostError> {
            Ok(())
        }
        fn merge_down(&mut self, layer: u32) -> Result<u32, HostError> {
            Ok(layer)
        }
        fn paint_color(&self, slot: PaintSlot) -> Rgb {
            match slot {
                PaintSlot::Foreground => self.foreground,
                PaintSlot::Background => self.background,
            }
        }
        fn set_paint_color(&mut self, slot: PaintSlot, color: Rgb) -> Result<(), HostError> {
            if self.refuse_colors {
                return Err(HostError::new("set_paint_color", "refused"));
            }
            match slot {
                PaintSlot::Foreground => self.foreground = color,
                PaintSlot::Background => self.background = color,
            }
            Ok(())
        }
    }

    const RED: Rgb = Rgb::new(0xff, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 0xff);

    #[test]
    fn pop_on_empty_stack_is_an_error() {
        let mut stack = ColorStack::new();
        assert_eq!(
            stack.pop(PaintSlot::Foreground),
            Err(TraversalError::EmptyColorStack(PaintSlot::Foreground))
        );
    }

    #[test]
    fn stacks_are_independent() {
        let mut stack = ColorStack::new();
        stack.push(PaintSlot::Foreground, RED);
        stack.push(PaintSlot::Background, BLUE);
        stack.push(PaintSlot::Background, RED);
        assert_eq!(stack.depth(PaintSlot::Foreground), 1);
        assert_eq!(stack.depth(PaintSlot::Background), 2);
        assert_eq!(stack.pop(PaintSlot::Background), Ok(RED));
        assert_eq!(stack.pop(PaintSlot::Foreground), Ok(RED));
        assert_eq!(stack.pop(PaintSlot::Background), Ok(BLUE));
        assert!(stack.is_balanced(), "all pushes were popped");
    }

    #[test]
    fn nested_scopes_restore_in_order() {
        let mut host = PaintHost {
            background: Rgb::WHITE,
            ..PaintHost::default()
        };
        let mut stack = ColorStack::new();

        let outer = stack
            .open(&mut host, PaintSlot::Background, Some(RED))
            .unwrap();
        assert_eq!(host.background, RED);
        let inner = stack
            .open(&mut host, PaintSlot::Background, Some(BLUE))
            .unwrap();
        assert_eq!(host.background, BLUE);

        stack.close(&mut host, inner, Ok(())).unwrap();
        assert_eq!(host.background, RED);
        stack.close(&mut host, outer, Ok(())).unwrap();
        assert_eq!(host.background, Rgb::WHITE);
        assert!(stack.is_balanced(), "stack should be empty after both closes");
    }

    #[test]
    fn inert_scope_touches_nothing() {
        let mut host = PaintHost::default();
        let mut stack = ColorStack::new();
        let scope = stack.open(&mut host, PaintSlot::Foreground, None).unwrap();
        assert!(!scope.is_override());
        assert_eq!(stack.close(&mut host, scope, Ok(7)), Ok(7));
        assert!(stack.is_balanced(), "inert scope must not push");
    }

    #[test]
    fn close_restores_even_when_the_frame_failed() {
        let mut host = PaintHost::default();
        let mut stack = ColorStack::new();
        let scope = stack
            .open(&mut host, PaintSlot::Background, Some(RED))
            .unwrap();
        let failure: Result<()> = Err(HostError::new("fill_selection", "boom").into());

        let result = stack.close(&mut host, scope, failure);
        assert_eq!(
            result,
            Err(OutlineError::Host(HostError::new("fill_selection", "boom")))
        );
        assert_eq!(host.background, Rgb::BLACK);
        assert!(stack.is_balanced(), "failed frame must still pop");
    }

    #[test]
    fn out_of_order_close_is_detected() {
        let mut host = PaintHost::default();
        let mut stack = ColorStack::new();
        let outer = stack
            .open(&mut host, PaintSlot::Background, Some(RED))
            .unwrap();
        let inner = stack
            .open(&mut host, PaintSlot::Background, Some(BLUE))
            .unwrap();

        let result = stack.close(&mut host, outer, Ok(()));
        assert_eq!(
            result,
            Err(OutlineError::Traversal(TraversalError::UnbalancedColorStack {
                slot: PaintSlot::Background,
                expected: 1,
                found: 2,
            }))
        );
        stack.close(&mut host, inner, Ok(())).unwrap();
    }

    #[test]
    fn refused_override_pushes_nothing() {
        let mut host = PaintHost {
            refuse_colors: true,
            ..PaintHost::default()
        };
        let mut stack = ColorStack::new();
        assert!(
            stack
                .open(&mut host, PaintSlot::Background, Some(RED))
                .is_err()
        );
        assert!(stack.is_balanced(), "nothing may be pushed when set fails");
    }
}
