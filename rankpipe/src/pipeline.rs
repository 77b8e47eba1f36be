/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Startup: build the shared queue context, the four tasks, and spawn them.
//!
//! # Ownership model
//! The two queues live in one [`Queues`] value created once and shared
//! through an `Arc`; no task owns them and none can resize or drop them
//! while another still holds the `Arc`.  Hardware handles are *moved* into
//! the task that drives them, so line ownership is checked by the compiler.

use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use tracing::{error, info, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::hal::{OutputLine, SerialPort};
use crate::queue::BoundedQueue;
use crate::rank::{Rank, Sample, BATCH_SIZE, RANK_LINE_COUNT, RANK_QUEUE_CAPACITY};
use crate::schedule::{analyse, task_table, RateReport, ScheduleError, TaskRole};
use crate::tasks::{Blinker, Ranker, Reporter, SampleSource, Sampler};

// ── Shared context ────────────────────────────────────────────────────────────

/// The two hand-off queues.
#[derive(Debug)]
pub struct Queues {
    /// Sampler → Ranker, one batch deep.
    pub samples: BoundedQueue<Sample>,
    /// Ranker → Reporter, latest rank only.
    pub ranks: BoundedQueue<Rank>,
}

impl Queues {
    pub fn new() -> Result<Self, PipelineError> {
        Ok(Self {
            samples: make_queue("samples", BATCH_SIZE)?,
            ranks: make_queue("ranks", RANK_QUEUE_CAPACITY)?,
        })
    }
}

fn make_queue<T>(name: &'static str, capacity: usize) -> Result<BoundedQueue<T>, PipelineError> {
    BoundedQueue::new(name, capacity).map_err(|e| PipelineError::Queue {
        queue: name,
        reason: e.to_string(),
    })
}

// ── Hardware bundle ───────────────────────────────────────────────────────────

/// Every external collaborator the tasks drive.
pub struct Hardware<L, S> {
    /// Heartbeat line, owned by the blinker.
    pub out0: L,
    /// L0, L1, L2, owned by the reporter.
    pub rank_lines: [L; RANK_LINE_COUNT],
    pub serial: S,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

pub struct Pipeline;

impl Pipeline {
    /// Create the queues, build the four tasks and start them, highest
    /// priority first.
    ///
    /// A hyperperiod too large for `u64` only costs the rate report: the
    /// tasks are paced by their own timers and the queues, never by it.
    ///
    /// # Errors
    /// [`PipelineError`] if a period is zero, a queue cannot be created or a
    /// thread cannot be spawned.
    pub fn start<L, S, Src>(
        config: &PipelineConfig,
        hardware: Hardware<L, S>,
        source: Src,
    ) -> Result<PipelineHandle, PipelineError>
    where
        L: OutputLine + 'static,
        S: SerialPort + 'static,
        Src: SampleSource + 'static,
    {
        let table = task_table(config);
        let rates = match analyse(&table) {
            Ok(report) => Some(report),
            Err(e @ ScheduleError::Overflow { .. }) => {
                warn!("schedule analysis skipped: {e}");
                None
            }
            Err(e) => return Err(e.into()),
        };
        let queues = Arc::new(Queues::new()?);

        let Hardware {
            out0,
            rank_lines,
            serial,
        } = hardware;

        let mut blinker = Some(Blinker::new(
            out0,
            config.blinker.on_time(),
            config.blinker.period(),
        ));
        let mut sampler = Some(Sampler::new(
            source,
            Arc::clone(&queues),
            config.sampler.period(),
        ));
        let mut ranker = Some(Ranker::new(Arc::clone(&queues), config.ranker.period()));
        let mut reporter = Some(Reporter::new(
            rank_lines,
            serial,
            Arc::clone(&queues),
            config.reporter.period(),
        ));

        let (exit_tx, exit_rx) = mpsc::channel();
        let mut tasks = Vec::with_capacity(table.len());
        for spec in &table {
            let name = spec.role.name();
            let spawned = match spec.role {
                TaskRole::Blinker => blinker
                    .take()
                    .map(|t| spawn_task(name, &exit_tx, move || t.run())),
                TaskRole::Sampler => sampler
                    .take()
                    .map(|t| spawn_task(name, &exit_tx, move || t.run())),
                TaskRole::Ranker => ranker
                    .take()
                    .map(|t| spawn_task(name, &exit_tx, move || t.run())),
                TaskRole::Reporter => reporter
                    .take()
                    .map(|t| spawn_task(name, &exit_tx, move || t.run())),
            };
            // Each role appears once in the table.
            let Some(handle) = spawned.transpose()? else {
                continue;
            };

            info!(
                task = name,
                priority = spec.priority,
                period_ms = spec.period.as_millis() as u64,
                "task started"
            );
            tasks.push((name, handle));
        }

        Ok(PipelineHandle {
            queues,
            rates,
            tasks,
            exits: exit_rx,
        })
    }
}

/// Reports a task's thread ending, whether by return or by unwinding.
struct ExitNotice {
    task: &'static str,
    tx: mpsc::Sender<&'static str>,
}

impl Drop for ExitNotice {
    fn drop(&mut self) {
        // The receiver is gone only once nobody is waiting any more.
        let _ = self.tx.send(self.task);
    }
}

fn spawn_task<F>(
    task: &'static str,
    exits: &mpsc::Sender<&'static str>,
    body: F,
) -> Result<JoinHandle<()>, PipelineError>
where
    F: FnOnce() + Send + 'static,
{
    let notice = ExitNotice {
        task,
        tx: exits.clone(),
    };
    thread::Builder::new()
        .name(task.to_string())
        .spawn(move || {
            let _notice = notice;
            body();
        })
        .map_err(|source| PipelineError::Spawn { task, source })
}

/// Running pipeline.
pub struct PipelineHandle {
    queues: Arc<Queues>,
    rates: Option<RateReport>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
    exits: mpsc::Receiver<&'static str>,
}

impl PipelineHandle {
    /// Shared queues, for inspection.
    pub fn queues(&self) -> &Arc<Queues> {
        &self.queues
    }

    /// Startup rate analysis; `None` when the hyperperiod overflowed.
    pub fn rates(&self) -> Option<&RateReport> {
        self.rates.as_ref()
    }

    /// Block for the lifetime of the pipeline.
    ///
    /// Tasks never finish, so this only returns when one of them has died;
    /// the error names it.
    pub fn wait(mut self) -> Result<(), PipelineError> {
        let Ok(task) = self.exits.recv() else {
            return Ok(());
        };
        if let Some(pos) = self.tasks.iter().position(|(name, _)| *name == task) {
            let (_, handle) = self.tasks.swap_remove(pos);
            if handle.join().is_err() {
                error!(task, "task panicked");
            }
        }
        Err(PipelineError::TaskExited {
            task: task.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queues_have_fixed_capacities() {
        let q = Queues::new().unwrap();
        assert_eq!(q.samples.capacity(), 6);
        assert_eq!(q.ranks.capacity(), 1);
        assert!(q.samples.is_empty());
        assert!(q.ranks.is_empty());
    }
}
