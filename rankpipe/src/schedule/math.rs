/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! GCD and overflow-checked LCM over periods in milliseconds.

use super::ScheduleError;

/// Iterative Euclidean GCD.  `gcd(0, n) == n`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// LCM computed as `(a / gcd) * b` with the multiplication checked.
///
/// Zero periods are rejected rather than folded to zero: a task with no
/// period has no release schedule.
pub fn lcm(a: u64, b: u64) -> Result<u64, ScheduleError> {
    if a == 0 || b == 0 {
        return Err(ScheduleError::ZeroPeriod);
    }
    (a / gcd(a, b))
        .checked_mul(b)
        .ok_or(ScheduleError::Overflow { a, b })
}

/// LCM of every period in `periods_ms`.
pub fn lcm_all(periods_ms: &[u64]) -> Result<u64, ScheduleError> {
    let (&first, rest) = periods_ms.split_first().ok_or(ScheduleError::NoTasks)?;
    if first == 0 {
        return Err(ScheduleError::ZeroPeriod);
    }
    rest.iter().try_fold(first, |acc, &p| lcm(acc, p))
}
