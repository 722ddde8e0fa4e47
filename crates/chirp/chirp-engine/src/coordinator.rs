//! Shared producer/worker coordination state.
//!
//! The coordinator tracks how many tasks have been published but not yet
//! taken off the queue, plus the done flag the producer sets when the
//! input stream ends. Workers park on the condition variable while there
//! is nothing to do; the producer signals one waiter per published task
//! and broadcasts once on shutdown.
//!
//! The pending count is the producer's ledger, not the queue's: it is
//! incremented after a successful enqueue and decremented by whichever
//! worker dequeues the item. It may dip below zero transiently when a
//! worker races ahead of the producer's increment; the shutdown predicate
//! (`done` and the count at zero) is unaffected because the count settles
//! once the producer stops.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Condvar, Mutex};

pub struct Coordinator {
    pending: AtomicI64,
    /// The done flag is only ever written under this mutex, and the
    /// shutdown broadcast happens with it held, so a worker between its
    /// predicate check and its wait cannot miss the transition.
    done: Mutex<bool>,
    wake: Condvar,
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            pending: AtomicI64::new(0),
            done: Mutex::new(false),
            wake: Condvar::new(),
        }
    }

    /// Producer side: a task has been enqueued. Wakes one parked worker.
    pub fn task_published(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Worker side: a task has been removed from the queue.
    pub fn task_taken(&self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }

    /// Producer side: input is exhausted. Wakes every parked worker.
    pub fn finish(&self) {
        let mut done = self.done.lock().unwrap();
        *done = true;
        self.wake.notify_all();
    }

    /// Worker side: parks until there is work or shutdown has begun.
    ///
    /// A single conditional wait; the caller's loop re-checks the state by
    /// draining the queue, so a spurious or stale wakeup costs one empty
    /// drain, nothing more.
    pub fn wait_for_work(&self) {
        let done = self.done.lock().unwrap();
        if self.pending.load(Ordering::SeqCst) == 0 && !*done {
            let _done = self.wake.wait(done).unwrap();
        }
    }

    /// Worker side: true once shutdown has begun and the pending ledger is
    /// settled at zero.
    pub fn should_exit(&self) -> bool {
        let done = self.done.lock().unwrap();
        *done && self.pending.load(Ordering::SeqCst) == 0
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}
