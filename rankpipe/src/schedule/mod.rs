//! Static view of the four periodic tasks: priorities, periods, hyperperiod
//! and a rate check of the queue chain.
//!
//! The analysis is **advisory**.  Nothing here changes how the tasks run;
//! a mismatched configuration still works because blocking queues pace the
//! faster side down to the slower one.  The report exists so that pacing is
//! logged at startup instead of discovered from a stalled output.
//!
//! | Condition | Effect at runtime |
//! |---|---|
//! | ranker period > sampler period | sample queue fills, sampler blocks on `send` |
//! | reporter period > ranker and sampler periods | rank queue stays full, ranker blocks on `send` |

pub mod math;

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use math::lcm_all;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("no tasks to analyse")]
    NoTasks,

    #[error("a task has a zero period")]
    ZeroPeriod,

    #[error("LCM overflow computing lcm({a}, {b})")]
    Overflow { a: u64, b: u64 },
}

// ── Task table ────────────────────────────────────────────────────────────────

/// The four periodic activities of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskRole {
    Blinker,
    Sampler,
    Ranker,
    Reporter,
}

impl TaskRole {
    /// Thread name.
    pub fn name(self) -> &'static str {
        match self {
            TaskRole::Blinker => "blinker",
            TaskRole::Sampler => "sampler",
            TaskRole::Ranker => "ranker",
            TaskRole::Reporter => "reporter",
        }
    }

    /// Relative priority, higher runs first.  Producer above consumer keeps
    /// the sample queue drained no faster than it is filled.
    pub fn priority(self) -> u8 {
        match self {
            TaskRole::Sampler => 4,
            TaskRole::Ranker => 3,
            TaskRole::Blinker | TaskRole::Reporter => 2,
        }
    }
}

impl fmt::Display for TaskRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scheduling parameters of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub role: TaskRole,
    pub priority: u8,
    pub period: Duration,
}

/// All four tasks, highest priority first (ties keep declaration order:
/// blinker before reporter).
pub fn task_table(config: &PipelineConfig) -> Vec<TaskSpec> {
    let mut table: Vec<TaskSpec> = [
        (TaskRole::Blinker, config.blinker.period()),
        (TaskRole::Sampler, config.sampler.period()),
        (TaskRole::Ranker, config.ranker.period()),
        (TaskRole::Reporter, config.reporter.period()),
    ]
    .into_iter()
    .map(|(role, period)| TaskSpec {
        role,
        priority: role.priority(),
        period,
    })
    .collect();

    // Stable sort: equal priorities keep their relative order.
    table.sort_by(|a, b| b.priority.cmp(&a.priority));
    table
}

// ── Rate analysis ─────────────────────────────────────────────────────────────

/// Which queue throttles the pipeline under the configured periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throttle {
    /// Ranker releases slower than sampler; sampler blocks on the sample queue.
    SampleQueue,
    /// Reporter releases slower than ranks can be produced (the slower of
    /// sampler and ranker); ranker blocks on the rank queue.
    RankQueue,
}

/// Release counts over one hyperperiod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateReport {
    pub hyperperiod_ms: u64,
    pub sampler_releases: u64,
    pub ranker_releases: u64,
    pub reporter_releases: u64,
    /// Ranks that actually reach the serial channel per hyperperiod: the
    /// slowest stage sets the pace.
    pub ranks_delivered: u64,
    pub throttles: Vec<Throttle>,
}

/// Compute the hyperperiod of all four tasks and check that each queue is
/// drained at least as fast as it is filled.
///
/// # Errors
/// [`ScheduleError`] if a period is zero or the LCM overflows.
pub fn analyse(table: &[TaskSpec]) -> Result<RateReport, ScheduleError> {
    let periods: Vec<u64> = table
        .iter()
        .map(|t| t.period.as_millis() as u64)
        .collect();
    let hyperperiod_ms = lcm_all(&periods)?;

    let releases = |role: TaskRole| -> u64 {
        table
            .iter()
            .find(|t| t.role == role)
            .map(|t| hyperperiod_ms / t.period.as_millis() as u64)
            .unwrap_or(0)
    };
    let sampler_releases = releases(TaskRole::Sampler);
    let ranker_releases = releases(TaskRole::Ranker);
    let reporter_releases = releases(TaskRole::Reporter);

    let mut throttles = Vec::new();
    if ranker_releases < sampler_releases {
        throttles.push(Throttle::SampleQueue);
    }
    if reporter_releases < ranker_releases.min(sampler_releases) {
        throttles.push(Throttle::RankQueue);
    }

    let report = RateReport {
        hyperperiod_ms,
        sampler_releases,
        ranker_releases,
        reporter_releases,
        ranks_delivered: sampler_releases
            .min(ranker_releases)
            .min(reporter_releases),
        throttles,
    };

    info!(
        hyperperiod_ms,
        batches = report.sampler_releases,
        ranks = report.ranks_delivered,
        "Schedule analysis"
    );
    for t in table {
        debug!(
            task = %t.role,
            priority = t.priority,
            period_ms = t.period.as_millis() as u64,
            "  task"
        );
    }
    for throttle in &report.throttles {
        match throttle {
            Throttle::SampleQueue => warn!(
                sampler = sampler_releases,
                ranker = ranker_releases,
                "ranker is slower than sampler; sampler will block on the sample queue"
            ),
            Throttle::RankQueue => warn!(
                ranker = ranker_releases,
                reporter = reporter_releases,
                sampler = sampler_releases,
                "reporter is slower than rank production; ranker will block on the rank queue"
            ),
        }
    }

    Ok(report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(role: TaskRole, period_ms: u64) -> TaskSpec {
        TaskSpec {
            role,
            priority: role.priority(),
            period: Duration::from_millis(period_ms),
        }
    }

    fn table(blinker: u64, sampler: u64, ranker: u64, reporter: u64) -> Vec<TaskSpec> {
        vec![
            spec(TaskRole::Blinker, blinker),
            spec(TaskRole::Sampler, sampler),
            spec(TaskRole::Ranker, ranker),
            spec(TaskRole::Reporter, reporter),
        ]
    }

    #[test]
    fn default_table_is_ordered_by_priority() {
        let t = task_table(&PipelineConfig::default());
        let roles: Vec<TaskRole> = t.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![
                TaskRole::Sampler,
                TaskRole::Ranker,
                TaskRole::Blinker,
                TaskRole::Reporter
            ]
        );
        assert_eq!(t[0].priority, 4);
        assert_eq!(t[1].priority, 3);
    }

    #[test]
    fn default_periods_are_not_throttled() {
        let report = analyse(&task_table(&PipelineConfig::default())).unwrap();
        assert_eq!(report.hyperperiod_ms, 2_000);
        assert_eq!(report.sampler_releases, 1);
        assert_eq!(report.ranker_releases, 2);
        assert_eq!(report.reporter_releases, 2);
        assert_eq!(report.ranks_delivered, 1);
        assert!(report.throttles.is_empty());
    }

    #[test]
    fn slow_ranker_throttles_sample_queue() {
        let report = analyse(&table(2_000, 1_000, 3_000, 500)).unwrap();
        assert_eq!(report.hyperperiod_ms, 6_000);
        assert_eq!(report.throttles, vec![Throttle::SampleQueue]);
        assert_eq!(report.ranks_delivered, 2);
    }

    #[test]
    fn slow_reporter_throttles_rank_queue() {
        let report = analyse(&table(2_000, 1_000, 1_000, 4_000)).unwrap();
        assert_eq!(report.throttles, vec![Throttle::RankQueue]);
        assert_eq!(report.ranks_delivered, 1);
    }

    #[test]
    fn reporter_matching_sampler_pace_is_not_throttled() {
        // Ranker could deliver 4 ranks, but only 2 batches exist to rank.
        let report = analyse(&table(2_000, 2_000, 500, 1_000)).unwrap();
        assert_eq!(report.reporter_releases, 2);
        assert_eq!(report.ranker_releases, 4);
        assert!(report.throttles.is_empty());
    }

    #[test]
    fn coprime_periods_overflow() {
        let result = analyse(&table(100_003, 100_019, 100_043, 100_049));
        assert!(matches!(result, Err(ScheduleError::Overflow { .. })));
    }

    #[test]
    fn zero_period_is_rejected() {
        let result = analyse(&table(2_000, 0, 1_000, 1_000));
        assert_eq!(result, Err(ScheduleError::ZeroPeriod));
    }
}
