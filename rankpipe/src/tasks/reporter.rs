/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::hal::{OutputLine, SerialPort};
use crate::pipeline::Queues;
use crate::rank::{pattern_for_rank, report_line, LinePattern, Rank, RANK_LINE_COUNT};
use crate::timing::PeriodicTimer;

/// Renders each rank on L0–L2 and as one serial text line.
///
/// The period only caps how often a rank is taken; a rank that arrives
/// late is still rendered as soon as the blocking receive returns.
pub struct Reporter<L, S> {
    lines: [L; RANK_LINE_COUNT],
    serial: S,
    queues: Arc<Queues>,
    period: Duration,
}

impl<L: OutputLine, S: SerialPort> Reporter<L, S> {
    pub fn new(
        lines: [L; RANK_LINE_COUNT],
        serial: S,
        queues: Arc<Queues>,
        period: Duration,
    ) -> Self {
        Self {
            lines,
            serial,
            queues,
            period,
        }
    }

    /// Clear every line, assert the rank's pattern, then transmit the text.
    ///
    /// Hardware failures are logged and skipped; they never stop the task.
    pub fn render(&mut self, rank: Rank) -> LinePattern {
        let pattern = pattern_for_rank(rank);

        for line in self.lines.iter_mut() {
            if let Err(e) = line.deassert_line() {
                warn!(line = line.name(), "clear failed: {e}");
            }
        }
        for (line, on) in self.lines.iter_mut().zip(pattern.levels()) {
            if on {
                if let Err(e) = line.assert_line() {
                    warn!(line = line.name(), "assert failed: {e}");
                }
            }
        }

        if let Err(e) = self.serial.transmit(report_line(rank).as_bytes()) {
            warn!(rank, "serial report dropped: {e}");
        }

        info!(rank, lines = %pattern, "rank reported");
        pattern
    }

    /// Wait for the next rank and render it.
    pub fn report_next(&mut self) -> Rank {
        let rank = self.queues.ranks.recv();
        self.render(rank);
        rank
    }

    pub fn run(mut self) -> ! {
        info!(period_ms = self.period.as_millis() as u64, "reporter started");
        let mut timer = PeriodicTimer::new(self.period);
        loop {
            self.report_next();
            timer.wait();
        }
    }
}
