// Copyright (c) The tap-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Render structured test-run results as console output and a TAP stream.
//!
//! The main type here is [`TapReporter`], constructed via a
//! [`TapReporterBuilder`].

mod code_frame;
mod events;
mod failure;
mod helpers;
mod imp;
mod writer;

pub use events::*;
pub use imp::*;
pub use writer::LineWriter;
