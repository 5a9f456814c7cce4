// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and recording of outliner walk traces.
//!
//! This crate provides [`WalkSink`](outliner_core::trace::WalkSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable, one indented line per event.
//! - [`recorder::RecorderSink`]: keeps owned copies of every event and
//!   exports them as JSON.

pub mod pretty;
pub mod recorder;
