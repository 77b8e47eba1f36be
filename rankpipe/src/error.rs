/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the rank pipeline.
//!
//! Three enums model the three failure layers:
//!
//! * [`QueueError`] — a bounded-wait or non-blocking queue operation could
//!   not complete.  The unbounded `send` / `recv` used by the pipeline tasks
//!   never produce it; they block instead.
//! * [`HalError`] — an output line or the serial channel rejected a write.
//!   The reporter logs these and carries on.
//! * [`PipelineError`] — startup failed before the tasks were running.
//!
//! Items that could not be enqueued are handed back inside the error so the
//! caller never loses a sample.

use std::time::Duration;

use thiserror::Error;

// ── Queue ─────────────────────────────────────────────────────────────────────

/// Failure of a non-blocking or time-limited [`BoundedQueue`] operation.
///
/// [`BoundedQueue`]: crate::queue::BoundedQueue
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError<T> {
    /// A queue was requested with room for nothing.
    #[error("queue capacity must be at least 1")]
    ZeroCapacity,

    /// `try_send` found the queue full; the item is returned.
    #[error("queue is full")]
    Full(T),

    /// `try_recv` found the queue empty.
    #[error("queue is empty")]
    Empty,

    /// `send_timeout` gave up; the item is returned.
    #[error("timed out after {waited:?} waiting for free space")]
    SendTimeout { item: T, waited: Duration },

    /// `recv_timeout` gave up.
    #[error("timed out after {waited:?} waiting for an item")]
    RecvTimeout { waited: Duration },
}

impl<T> QueueError<T> {
    /// Recover the item a failed send could not deliver.
    pub fn into_item(self) -> Option<T> {
        match self {
            QueueError::Full(item) | QueueError::SendTimeout { item, .. } => Some(item),
            _ => None,
        }
    }
}

// ── Hardware ──────────────────────────────────────────────────────────────────

/// Failure reported by an [`OutputLine`] or [`SerialPort`] implementation.
///
/// [`OutputLine`]: crate::hal::OutputLine
/// [`SerialPort`]: crate::hal::SerialPort
#[derive(Debug, Error)]
pub enum HalError {
    /// Driving a digital output failed.
    #[error("output line '{line}' could not be driven")]
    Line { line: String },

    /// The serial channel refused or truncated a transmission.
    #[error("serial transmit failed: {0}")]
    Serial(#[from] std::io::Error),
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Error returned by [`Pipeline::start`](crate::pipeline::Pipeline::start)
/// and [`PipelineHandle::wait`](crate::pipeline::PipelineHandle::wait).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// One of the two hand-off queues could not be created.
    #[error("cannot create queue '{queue}': {reason}")]
    Queue { queue: &'static str, reason: String },

    /// The OS refused to start a task thread.
    #[error("cannot spawn task '{task}': {source}")]
    Spawn {
        task: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A task thread terminated.  Tasks loop forever, so this only happens
    /// through a panic.
    #[error("task '{task}' terminated unexpectedly")]
    TaskExited { task: String },

    /// A task period is zero, so it has no release schedule.
    #[error("schedule analysis failed: {0}")]
    Schedule(#[from] crate::schedule::ScheduleError),
}
