/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Absolute-time periodic wait.
//!
//! A [`PeriodicTimer`] keeps the instant of the *previous* wake-up and
//! computes the next one as `previous + period`, never as `now + period`.
//! However long a task body runs, release `k` is always
//! `anchor + k × period`, so drift does not accumulate.
//!
//! When a deadline is already in the past the wait returns immediately and
//! the schedule is **not** re-anchored: a task that fell behind gets its
//! missed releases back-to-back until it has caught up.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

/// Outcome of one [`PeriodicTimer::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Slept until the deadline.
    OnTime,
    /// The deadline had already passed by `late` when `wait` was called.
    Overrun { late: Duration },
}

/// Drift-free periodic release schedule for one task.
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    period: Duration,
    /// Instant of the most recent release (initially the anchor).
    last_wake: Instant,
}

impl PeriodicTimer {
    /// Anchor the schedule at the current instant.
    pub fn new(period: Duration) -> Self {
        Self::starting_at(Instant::now(), period)
    }

    /// Anchor the schedule at `anchor`.  Release `k` happens at
    /// `anchor + k × period`.
    pub fn starting_at(anchor: Instant, period: Duration) -> Self {
        Self {
            period,
            last_wake: anchor,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Deadline the next [`wait`](Self::wait) sleeps until.
    pub fn next_deadline(&self) -> Instant {
        self.last_wake + self.period
    }

    /// Advance the schedule by one period and sleep until that instant.
    pub fn wait(&mut self) -> Wake {
        let deadline = self.next_deadline();
        self.last_wake = deadline;

        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
            Wake::OnTime
        } else {
            let late = now - deadline;
            debug!(late_us = late.as_micros() as u64, "period overrun");
            Wake::Overrun { late }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadlines_are_multiples_of_the_period_from_the_anchor() {
        let period = Duration::from_millis(15);
        let anchor = Instant::now();
        let mut timer = PeriodicTimer::starting_at(anchor, period);

        for k in 1..=4u32 {
            assert_eq!(timer.next_deadline(), anchor + period * k);
            // Uneven body durations must not shift the schedule.
            thread::sleep(Duration::from_millis(u64::from(k)));
            timer.wait();
        }
        assert_eq!(timer.next_deadline(), anchor + period * 5);
    }

    #[test]
    fn wait_sleeps_until_the_deadline() {
        let period = Duration::from_millis(20);
        let mut timer = PeriodicTimer::new(period);
        let deadline = timer.next_deadline();

        assert_eq!(timer.wait(), Wake::OnTime);
        assert!(Instant::now() >= deadline);
    }

    #[test]
    fn missed_deadline_returns_immediately_without_reanchoring() {
        let period = Duration::from_millis(10);
        let anchor = Instant::now();
        let mut timer = PeriodicTimer::starting_at(anchor, period);

        // Fall three periods behind.
        thread::sleep(period * 3 + Duration::from_millis(5));

        let before = Instant::now();
        assert!(matches!(timer.wait(), Wake::Overrun { .. }));
        assert!(matches!(timer.wait(), Wake::Overrun { .. }));
        assert!(before.elapsed() < period);
        assert_eq!(timer.next_deadline(), anchor + period * 3);
    }
}
