/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Mock hardware for tests.
//!
//! Both mocks are cheap handles over shared state: keep a clone, move the
//! other into a task, and inspect what the task did from the test thread.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{OutputLine, SerialPort};
use crate::error::HalError;

// ── MockLine ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct LineState {
    level: AtomicBool,
    writes: AtomicUsize,
    fail: AtomicBool,
}

/// Observable output line.
#[derive(Debug, Clone)]
pub struct MockLine {
    name: String,
    state: Arc<LineState>,
}

impl MockLine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(LineState::default()),
        }
    }

    /// Current level as last driven.
    pub fn level(&self) -> bool {
        self.state.level.load(Ordering::SeqCst)
    }

    /// Number of `set` calls received.
    pub fn writes(&self) -> usize {
        self.state.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent `set` calls fail and leave the level untouched.
    pub fn set_failing(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }
}

impl OutputLine for MockLine {
    fn set(&mut self, asserted: bool) -> Result<(), HalError> {
        if self.state.fail.load(Ordering::SeqCst) {
            return Err(HalError::Line {
                line: self.name.clone(),
            });
        }
        self.state.level.store(asserted, Ordering::SeqCst);
        self.state.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ── MockSerial ────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SerialState {
    bytes: Mutex<Vec<u8>>,
    fail: AtomicBool,
}

/// Serial channel that records every transmitted byte.
#[derive(Debug, Clone, Default)]
pub struct MockSerial {
    state: Arc<SerialState>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent transmissions fail (simulates a stuck peripheral).
    pub fn set_failing(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }

    /// Everything transmitted so far, lossily decoded as UTF-8.
    pub fn output(&self) -> String {
        let bytes = self
            .state
            .bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Transmitted text split into `\r\n`-terminated lines (terminator kept).
    pub fn lines(&self) -> Vec<String> {
        self.output()
            .split_inclusive("\r\n")
            .map(str::to_owned)
            .collect()
    }
}

impl SerialPort for MockSerial {
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), HalError> {
        if self.state.fail.load(Ordering::SeqCst) {
            return Err(HalError::Serial(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "mock serial timeout",
            )));
        }
        self.state
            .bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(bytes);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_line_state() {
        let probe = MockLine::new("L0");
        let mut owned = probe.clone();
        owned.assert_line().unwrap();
        assert!(probe.level());
        assert_eq!(probe.writes(), 1);
    }

    #[test]
    fn failing_line_keeps_its_level() {
        let probe = MockLine::new("L1");
        let mut owned = probe.clone();
        owned.assert_line().unwrap();
        probe.set_failing(true);
        let err = owned.deassert_line().unwrap_err();
        assert!(err.to_string().contains("L1"));
        assert!(probe.level());
        assert_eq!(probe.writes(), 1);
    }

    #[test]
    fn serial_splits_crlf_lines() {
        let probe = MockSerial::new();
        let mut owned = probe.clone();
        owned.transmit(b"Rank = 1\r\n").unwrap();
        owned.transmit(b"Rank = 2\r\n").unwrap();
        assert_eq!(probe.lines(), vec!["Rank = 1\r\n", "Rank = 2\r\n"]);
    }

    #[test]
    fn failing_serial_records_nothing() {
        let probe = MockSerial::new();
        probe.set_failing(true);
        let mut owned = probe.clone();
        assert!(owned.transmit(b"x").is_err());
        assert!(probe.output().is_empty());
    }
}
