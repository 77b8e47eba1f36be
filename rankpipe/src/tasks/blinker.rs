/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::hal::OutputLine;
use crate::timing::PeriodicTimer;

/// Asymmetric heartbeat on OUT0: asserted for `on_time`, then deasserted for
/// the rest of `period`.  Shares nothing with the rank pipeline.
pub struct Blinker<L> {
    line: L,
    on_time: Duration,
    period: Duration,
}

impl<L: OutputLine> Blinker<L> {
    pub fn new(line: L, on_time: Duration, period: Duration) -> Self {
        Self {
            line,
            on_time,
            period,
        }
    }

    /// One heartbeat: assert, hold for `on_time`, deassert.
    ///
    /// The hold is relative; the period boundary that follows is absolute,
    /// so a long hold shortens the off phase instead of stretching the period.
    pub fn blink(&mut self) {
        if let Err(e) = self.line.assert_line() {
            warn!(line = self.line.name(), "blink on failed: {e}");
        }
        thread::sleep(self.on_time);
        if let Err(e) = self.line.deassert_line() {
            warn!(line = self.line.name(), "blink off failed: {e}");
        }
    }

    pub fn run(mut self) -> ! {
        info!(
            line = self.line.name(),
            on_ms = self.on_time.as_millis() as u64,
            period_ms = self.period.as_millis() as u64,
            "blinker started"
        );
        let mut timer = PeriodicTimer::new(self.period);
        loop {
            self.blink();
            timer.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mock::MockLine;
    use std::time::Instant;

    #[test]
    fn blink_leaves_line_low_after_on_time() {
        let probe = MockLine::new("OUT0");
        let on_time = Duration::from_millis(20);
        let mut blinker = Blinker::new(probe.clone(), on_time, Duration::from_millis(50));

        let started = Instant::now();
        blinker.blink();

        assert!(started.elapsed() >= on_time);
        assert!(!probe.level());
        assert_eq!(probe.writes(), 2);
    }

    #[test]
    fn running_blinker_toggles_line() {
        let probe = MockLine::new("OUT0");
        let blinker = Blinker::new(
            probe.clone(),
            Duration::from_millis(150),
            Duration::from_millis(450),
        );
        thread::spawn(move || blinker.run());

        thread::sleep(Duration::from_millis(50));
        assert!(probe.level(), "line is high during the on phase");
        thread::sleep(Duration::from_millis(250));
        assert!(!probe.level(), "line is low during the off phase");
    }
}
