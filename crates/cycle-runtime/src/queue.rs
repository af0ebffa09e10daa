// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Single-threaded cooperative run queue.
//!
//! [`RunQueue`] dispatches tasks strictly in the order they become ready:
//! no task preempts another, and a task runs to completion — including any
//! blocking work inside it — before the next task is considered. There are
//! no locks because there is exactly one thread of control.
//!
//! Two enqueue flavors:
//!
//! - [`RunQueue::call`] — a one-shot task, ready immediately. It may keep
//!   itself alive by returning [`TaskOutcome::Reschedule`].
//! - [`RunQueue::call_every`] — a recurring task on a fixed cadence. Each
//!   completion schedules the next run at `ready_at + period`; a run that
//!   overruns its period makes subsequent runs late, and no correction or
//!   catch-up skipping is applied.
//!
//! Every task receives `&mut C`, the single context value threaded through
//! the queue — shared mutable state without interior mutability.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// What a task asks the queue to do after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// One-shot tasks are dropped; recurring tasks keep their cadence.
    Done,
    /// Run again after the given delay, measured from now.
    Reschedule(Duration),
    /// Stop dispatching entirely.
    Stop,
}

type TaskFn<'t, C> = Box<dyn FnMut(&mut C) -> TaskOutcome + 't>;

struct Entry<'t, C> {
    ready_at: Instant,
    seq: u64,
    period: Option<Duration>,
    task: TaskFn<'t, C>,
}

impl<'t, C> PartialEq for Entry<'t, C> {
    fn eq(&self, other: &Self) -> bool {
        self.ready_at == other.ready_at && self.seq == other.seq
    }
}

impl<'t, C> Eq for Entry<'t, C> {}

impl<'t, C> PartialOrd for Entry<'t, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'t, C> Ord for Entry<'t, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Ready time first; the enqueue sequence breaks ties so tasks that
        // become ready together dispatch in arrival order.
        self.ready_at
            .cmp(&other.ready_at)
            .then(self.seq.cmp(&other.seq))
    }
}

/// The cooperative dispatcher.
///
/// # Example
/// ```
/// use cycle_runtime::{RunQueue, TaskOutcome};
///
/// let mut queue: RunQueue<u32> = RunQueue::new();
/// queue.call(|count| {
///     *count += 1;
///     TaskOutcome::Done
/// });
///
/// let mut count = 0;
/// queue.dispatch_forever(&mut count);
/// assert_eq!(count, 1);
/// ```
pub struct RunQueue<'t, C> {
    heap: BinaryHeap<Reverse<Entry<'t, C>>>,
    next_seq: u64,
}

impl<'t, C> RunQueue<'t, C> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Enqueues a one-shot task, ready immediately.
    pub fn call(&mut self, task: impl FnMut(&mut C) -> TaskOutcome + 't) {
        let seq = self.bump_seq();
        self.heap.push(Reverse(Entry {
            ready_at: Instant::now(),
            seq,
            period: None,
            task: Box::new(task),
        }));
    }

    /// Enqueues a recurring task; the first run happens one period from now.
    pub fn call_every(
        &mut self,
        period: Duration,
        task: impl FnMut(&mut C) -> TaskOutcome + 't,
    ) {
        let seq = self.bump_seq();
        self.heap.push(Reverse(Entry {
            ready_at: Instant::now() + period,
            seq,
            period: Some(period),
            task: Box::new(task),
        }));
    }

    /// Returns the number of scheduled tasks.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when no tasks are scheduled.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Dispatches tasks until the queue drains or a task returns
    /// [`TaskOutcome::Stop`].
    ///
    /// Sleeps between dispatches when the earliest task is not yet ready.
    /// On `Stop`, remaining tasks stay scheduled in the queue.
    pub fn dispatch_forever(&mut self, context: &mut C) {
        while self.dispatch_one(context) {}
    }

    /// Runs the earliest-ready task. Returns false when dispatch should end.
    fn dispatch_one(&mut self, context: &mut C) -> bool {
        let Some(Reverse(mut entry)) = self.heap.pop() else {
            return false;
        };

        let now = Instant::now();
        if entry.ready_at > now {
            std::thread::sleep(entry.ready_at - now);
        }

        match ((entry.task)(context), entry.period) {
            (TaskOutcome::Stop, _) => return false,
            (TaskOutcome::Done, Some(period)) => {
                // Fixed cadence: a late run shifts nothing; the next slot
                // was fixed when this one became ready.
                entry.ready_at += period;
                entry.seq = self.bump_seq();
                self.heap.push(Reverse(entry));
            }
            (TaskOutcome::Reschedule(delay), _) => {
                entry.ready_at = Instant::now() + delay;
                entry.seq = self.bump_seq();
                self.heap.push(Reverse(entry));
            }
            (TaskOutcome::Done, None) => {}
        }

        true
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl<'t, C> Default for RunQueue<'t, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t, C> std::fmt::Debug for RunQueue<'t, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunQueue")
            .field("scheduled", &self.len())
            .finish()
    }
}
