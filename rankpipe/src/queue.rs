/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fixed-capacity blocking FIFO used for every hand-off between tasks.
//!
//! ```text
//!   producer ──send()──►  [ ring buffer, capacity N ]  ──recv()──► consumer
//!               │ blocks while full        │ blocks while empty
//!               └──────── not_full ◄───────┴──────► not_empty ──┘
//! ```
//!
//! The ring is a `VecDeque` allocated once with exactly `capacity` slots and
//! never grown.  One mutex guards it; two condition variables carry the
//! "space freed" and "item arrived" wake-ups.  The mutex is only ever held
//! for the push/pop itself, and released while waiting on a condition
//! variable, so no task holds a lock across a blocking wait.
//!
//! The queue itself never drops, overwrites or reorders items.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::QueueError;

// ── BoundedQueue ──────────────────────────────────────────────────────────────

/// Occupancy bookkeeping kept under the same lock as the items.
#[derive(Debug)]
struct Slots<T> {
    items: VecDeque<T>,
    /// Highest `items.len()` ever observed.
    peak: usize,
}

/// Bounded multi-producer / multi-consumer FIFO with blocking push and pop.
///
/// Created once at startup and shared by reference (normally through an
/// `Arc`) for the whole process lifetime.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    name: &'static str,
    capacity: usize,
    slots: Mutex<Slots<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue that holds at most `capacity` items.
    ///
    /// # Errors
    /// [`QueueError::ZeroCapacity`] if `capacity == 0`; such a queue could
    /// never accept an item and every `send` would block forever.
    pub fn new(name: &'static str, capacity: usize) -> Result<Self, QueueError<T>> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }
        Ok(Self {
            name,
            capacity,
            slots: Mutex::new(Slots {
                items: VecDeque::with_capacity(capacity),
                peak: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        })
    }

    // ── Blocking operations ───────────────────────────────────────────────────

    /// Append `item`, waiting as long as it takes for a free slot.
    pub fn send(&self, item: T) {
        let mut slots = self.lock();
        if slots.items.len() >= self.capacity {
            trace!(queue = self.name, "send blocked: queue full");
        }
        while slots.items.len() >= self.capacity {
            slots = self
                .not_full
                .wait(slots)
                .unwrap_or_else(PoisonError::into_inner);
        }
        self.push_locked(slots, item);
    }

    /// Remove the oldest item, waiting as long as it takes for one to arrive.
    pub fn recv(&self) -> T {
        let mut slots = self.lock();
        if slots.items.is_empty() {
            trace!(queue = self.name, "recv blocked: queue empty");
        }
        loop {
            if let Some(item) = slots.items.pop_front() {
                drop(slots);
                self.not_full.notify_one();
                return item;
            }
            slots = self
                .not_empty
                .wait(slots)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    // ── Bounded-wait operations ───────────────────────────────────────────────

    /// Like [`send`](Self::send) but gives up after `timeout`.
    ///
    /// # Errors
    /// [`QueueError::SendTimeout`] carrying the undelivered item.
    pub fn send_timeout(&self, item: T, timeout: Duration) -> Result<(), QueueError<T>> {
        let started = Instant::now();
        let slots = self.lock();
        let (slots, result) = self
            .not_full
            .wait_timeout_while(slots, timeout, |s| s.items.len() >= self.capacity)
            .unwrap_or_else(PoisonError::into_inner);

        if result.timed_out() && slots.items.len() >= self.capacity {
            return Err(QueueError::SendTimeout {
                item,
                waited: started.elapsed(),
            });
        }
        self.push_locked(slots, item);
        Ok(())
    }

    /// Like [`recv`](Self::recv) but gives up after `timeout`.
    ///
    /// # Errors
    /// [`QueueError::RecvTimeout`] if nothing arrived in time.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, QueueError<T>> {
        let started = Instant::now();
        let slots = self.lock();
        let (mut slots, _) = self
            .not_empty
            .wait_timeout_while(slots, timeout, |s| s.items.is_empty())
            .unwrap_or_else(PoisonError::into_inner);

        match slots.items.pop_front() {
            Some(item) => {
                drop(slots);
                self.not_full.notify_one();
                Ok(item)
            }
            None => Err(QueueError::RecvTimeout {
                waited: started.elapsed(),
            }),
        }
    }

    // ── Non-blocking operations ───────────────────────────────────────────────

    /// Append `item` only if a slot is free right now.
    ///
    /// # Errors
    /// [`QueueError::Full`] carrying the item.
    pub fn try_send(&self, item: T) -> Result<(), QueueError<T>> {
        let slots = self.lock();
        if slots.items.len() >= self.capacity {
            return Err(QueueError::Full(item));
        }
        self.push_locked(slots, item);
        Ok(())
    }

    /// Remove the oldest item only if one is waiting right now.
    ///
    /// # Errors
    /// [`QueueError::Empty`].
    pub fn try_recv(&self) -> Result<T, QueueError<T>> {
        let mut slots = self.lock();
        let item = slots.items.pop_front().ok_or(QueueError::Empty)?;
        drop(slots);
        self.not_full.notify_one();
        Ok(item)
    }

    // ── Inspection ────────────────────────────────────────────────────────────

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Fixed capacity given at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Highest occupancy ever reached.  Never exceeds [`capacity`](Self::capacity).
    pub fn peak_len(&self) -> usize {
        self.lock().peak
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    /// The guarded data stays consistent even if a holder panicked: every
    /// mutation is a single push or pop.
    fn lock(&self) -> MutexGuard<'_, Slots<T>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Caller has already checked there is room.
    fn push_locked(&self, mut slots: MutexGuard<'_, Slots<T>>, item: T) {
        debug_assert!(slots.items.len() < self.capacity);
        slots.items.push_back(item);
        slots.peak = slots.peak.max(slots.items.len());
        drop(slots);
        self.not_empty.notify_one();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
