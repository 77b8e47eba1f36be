/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! rankpipe – four periodic tasks joined by two bounded blocking queues.
//!
//! ```text
//! lib.rs
//! ├── queue       – fixed-capacity blocking FIFO
//! ├── timing      – drift-free periodic wait
//! ├── rank        – rank of a batch, rank → line pattern, serial text
//! ├── hal/        – output-line / serial traits, host + mock implementations
//! ├── tasks/      – blinker, sampler, ranker, reporter
//! ├── schedule/   – task table, hyperperiod, queue rate analysis
//! ├── pipeline    – shared queue context and startup
//! ├── config/     – YAML configuration
//! └── error       – structured error types
//! ```

pub mod config;
pub mod error;
pub mod hal;
pub mod pipeline;
pub mod queue;
pub mod rank;
pub mod schedule;
pub mod tasks;
pub mod timing;
