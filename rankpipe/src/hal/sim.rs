/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Host implementations of the hardware traits.

use std::io::Write;

use tracing::info;

use super::{OutputLine, SerialPort};
use crate::error::HalError;

// ── TracedLine ────────────────────────────────────────────────────────────────

/// Output line that exists only as a level in memory and reports every
/// transition as a `tracing` event.
#[derive(Debug)]
pub struct TracedLine {
    name: String,
    level: bool,
}

impl TracedLine {
    /// New line, initially deasserted.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: false,
        }
    }

    pub fn level(&self) -> bool {
        self.level
    }
}

impl OutputLine for TracedLine {
    fn set(&mut self, asserted: bool) -> Result<(), HalError> {
        if self.level != asserted {
            let level = if asserted { "high" } else { "low" };
            info!(line = %self.name, level, "line");
        }
        self.level = asserted;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ── WriterSerial ──────────────────────────────────────────────────────────────

/// Serial channel backed by any byte sink (stdout, a file, a pipe).
///
/// Each transmission is flushed so a report is visible as soon as it is sent.
#[derive(Debug)]
pub struct WriterSerial<W: Write + Send> {
    sink: W,
}

impl<W: Write + Send> WriterSerial<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write + Send> SerialPort for WriterSerial<W> {
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), HalError> {
        self.sink.write_all(bytes)?;
        self.sink.flush()?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traced_line_tracks_level() {
        let mut line = TracedLine::new("OUT0");
        assert!(!line.level());
        line.assert_line().unwrap();
        assert!(line.level());
        line.deassert_line().unwrap();
        assert!(!line.level());
        assert_eq!(line.name(), "OUT0");
    }

    #[test]
    fn writer_serial_passes_bytes_through() {
        let mut serial = WriterSerial::new(Vec::new());
        serial.transmit(b"Rank = 3\r\n").unwrap();
        serial.transmit(b"Rank = 6\r\n").unwrap();
        assert_eq!(serial.into_inner(), b"Rank = 3\r\nRank = 6\r\n");
    }
}
