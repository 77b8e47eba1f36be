/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The four periodic activities.
//!
//! ```text
//!  Blinker   (independent, owns OUT0)
//!
//!  Sampler ──► samples queue (6) ──► Ranker ──► ranks queue (1) ──► Reporter ──► L0..L2 + serial
//! ```
//!
//! Every task exposes its cycle body as a plain method (`blink`,
//! `produce_batch`, `rank_next_batch`, `report_next`) and a `run` that loops
//! that body on a [`PeriodicTimer`](crate::timing::PeriodicTimer) anchored
//! when `run` starts.  `run` never returns.

pub mod blinker;
pub mod ranker;
pub mod reporter;
pub mod sampler;

pub use blinker::Blinker;
pub use ranker::Ranker;
pub use reporter::Reporter;
pub use sampler::{RandomSource, SampleSource, Sampler, ScriptedSource};
