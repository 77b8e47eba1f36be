/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Consumer of the sample queue, producer of the rank queue.
//!
//! Strict N:1 aggregation: exactly [`BATCH_SIZE`] receives feed exactly one
//! send.  Because the sampler enqueues a whole batch per cycle and this task
//! always consumes a whole batch, batch boundaries in the queue never shift
//! and one rank never mixes two production cycles.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::pipeline::Queues;
use crate::rank::{compute_rank, Batch, Rank, BATCH_SIZE};
use crate::timing::PeriodicTimer;

pub struct Ranker {
    queues: Arc<Queues>,
    period: Duration,
}

impl Ranker {
    pub fn new(queues: Arc<Queues>, period: Duration) -> Self {
        Self { queues, period }
    }

    /// Receive exactly one batch, blocking until all of it has arrived.
    pub fn collect_batch(&self) -> Batch {
        let mut batch = [0; BATCH_SIZE];
        for slot in batch.iter_mut() {
            *slot = self.queues.samples.recv();
        }
        batch
    }

    /// Collect a batch, rank its first element and hand the rank on.
    ///
    /// Blocks while the previous rank is still unread.
    pub fn rank_next_batch(&self) -> Rank {
        let batch = self.collect_batch();
        let rank = compute_rank(&batch);
        debug!(?batch, target = batch[0], rank, "batch ranked");
        self.queues.ranks.send(rank);
        rank
    }

    pub fn run(self) -> ! {
        info!(period_ms = self.period.as_millis() as u64, "ranker started");
        let mut timer = PeriodicTimer::new(self.period);
        loop {
            self.rank_next_batch();
            timer.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(queues: &Queues, values: &[u32]) {
        for &v in values {
            queues.samples.send(v);
        }
    }

    #[test]
    fn ranks_one_batch_and_forwards_rank() {
        let queues = Arc::new(Queues::new().unwrap());
        fill(&queues, &[5000, 100, 9000, 5000, 1, 7000]);

        let ranker = Ranker::new(Arc::clone(&queues), Duration::from_millis(10));
        assert_eq!(ranker.rank_next_batch(), 4);
        assert!(queues.samples.is_empty());
        assert_eq!(queues.ranks.try_recv().unwrap(), 4);
    }

    #[test]
    fn consecutive_batches_are_ranked_independently() {
        let queues = Arc::new(Queues::new().unwrap());
        let ranker = Ranker::new(Arc::clone(&queues), Duration::from_millis(10));

        // A first element of 0 cannot drag the next batch's target down.
        fill(&queues, &[0, 5, 5, 5, 5, 5]);
        assert_eq!(ranker.rank_next_batch(), 1);
        assert_eq!(queues.ranks.recv(), 1);

        fill(&queues, &[9, 9, 9, 9, 9, 9]);
        assert_eq!(ranker.rank_next_batch(), 6);
        assert_eq!(queues.ranks.recv(), 6);
    }
}
