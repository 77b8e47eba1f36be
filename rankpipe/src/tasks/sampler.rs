/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Producer side of the sample queue.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::pipeline::Queues;
use crate::rank::{Batch, Sample, BATCH_SIZE};
use crate::timing::PeriodicTimer;

// ── Sample sources ────────────────────────────────────────────────────────────

/// Where sample values come from.
pub trait SampleSource: Send {
    fn next_sample(&mut self) -> Sample;
}

/// Uniform pseudo-random values in `[0, upper_bound)`, seeded once.
#[derive(Debug)]
pub struct RandomSource {
    rng: StdRng,
    upper_bound: Sample,
    seed: u64,
}

impl RandomSource {
    /// Reproducible source.  `upper_bound` must be non-zero.
    pub fn seeded(seed: u64, upper_bound: Sample) -> Self {
        debug_assert!(upper_bound > 0);
        Self {
            rng: StdRng::seed_from_u64(seed),
            upper_bound,
            seed,
        }
    }

    /// Source seeded from the current wall-clock time.
    pub fn from_clock(upper_bound: Sample) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::seeded(seed, upper_bound)
    }

    /// Seed actually in use, for reproducing a run.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl SampleSource for RandomSource {
    fn next_sample(&mut self) -> Sample {
        self.rng.gen_range(0..self.upper_bound)
    }
}

/// Replays a fixed sequence, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    samples: Vec<Sample>,
    next: usize,
}

impl ScriptedSource {
    /// # Panics
    /// If `samples` is empty.
    pub fn new(samples: impl Into<Vec<Sample>>) -> Self {
        let samples = samples.into();
        assert!(!samples.is_empty(), "scripted source needs at least one sample");
        Self { samples, next: 0 }
    }
}

impl SampleSource for ScriptedSource {
    fn next_sample(&mut self) -> Sample {
        let v = self.samples[self.next];
        self.next = (self.next + 1) % self.samples.len();
        v
    }
}

// ── Sampler ───────────────────────────────────────────────────────────────────

/// Produces one batch per period, one blocking `send` per sample.
///
/// A full sample queue stalls the sampler rather than losing a value.
pub struct Sampler<S> {
    source: S,
    queues: Arc<Queues>,
    period: Duration,
}

impl<S: SampleSource> Sampler<S> {
    pub fn new(source: S, queues: Arc<Queues>, period: Duration) -> Self {
        Self {
            source,
            queues,
            period,
        }
    }

    /// Draw [`BATCH_SIZE`] samples and enqueue each as soon as it is drawn.
    ///
    /// Returns the batch as sent, in send order.
    pub fn produce_batch(&mut self) -> Batch {
        let mut batch = [0; BATCH_SIZE];
        for slot in batch.iter_mut() {
            let value = self.source.next_sample();
            self.queues.samples.send(value);
            *slot = value;
        }
        debug!(?batch, "batch sent");
        batch
    }

    pub fn run(mut self) -> ! {
        info!(period_ms = self.period.as_millis() as u64, "sampler started");
        let mut timer = PeriodicTimer::new(self.period);
        loop {
            self.produce_batch();
            timer.wait();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
