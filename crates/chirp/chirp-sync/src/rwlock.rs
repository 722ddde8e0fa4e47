//! Reader/writer lock built from one mutex and one condition variable.
//!
//! # Protocol
//!
//! **Writer** (`write`):
//! 1. Lock the mutex
//! 2. While readers are present, wait on the condvar
//! 3. Keep the mutex locked for the whole write: the held `MutexGuard`
//!    inside [`WriteGuard`] is what serializes writers against each other
//! 4. On guard drop: signal one waiter, then release the mutex
//!
//! **Reader** (`read`):
//! 1. Lock the mutex
//! 2. While the reader count exceeds [`MAX_READERS`], wait on the condvar
//! 3. Increment the count and release the mutex (readers run concurrently)
//! 4. On guard drop: relock, decrement; signal once when the count reaches
//!    zero (a writer may proceed) and once more when it is back under the
//!    cap (a parked reader may proceed)
//!
//! A single condition variable serves all three wait reasons: a writer
//! waiting for readers to drain, a reader waiting for the cap, and a
//! future writer waiting behind the mutex. Every wait sits in a
//! `while`-loop over its predicate, so spurious and cross-purpose wakeups
//! fall through harmlessly.
//!
//! # Fairness
//!
//! None guaranteed. The signal-one policy can starve a writer under heavy
//! reader churn; acceptable for this workload.

use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard};

/// Cap on the concurrent reader population. A reader that finds more than
/// this many readers inside parks until one leaves.
pub const MAX_READERS: usize = 64;

/// A reader/writer lock with a bounded reader population.
///
/// At most one writer or up to `MAX_READERS + 1` readers hold the lock at
/// any instant (the +1 comes from the park-then-increment admission check,
/// which admits a reader while exactly `MAX_READERS` are inside).
pub struct BoundedRwLock<T> {
    /// Number of readers currently admitted. Only touched with `state` held.
    state: Mutex<usize>,
    cond: Condvar,
    data: UnsafeCell<T>,
}

// SAFETY: the reader-count protocol guarantees a `&mut T` only exists while
// the count is zero and the mutex is held, and `&T`s only exist while the
// count is nonzero. Sending the lock moves `T`, sharing it shares `T`.
unsafe impl<T: Send> Send for BoundedRwLock<T> {}
unsafe impl<T: Send + Sync> Sync for BoundedRwLock<T> {}

impl<T> BoundedRwLock<T> {
    pub fn new(value: T) -> Self {
        Self {
            state: Mutex::new(0),
            cond: Condvar::new(),
            data: UnsafeCell::new(value),
        }
    }

    /// Acquires the lock exclusively, parking until all readers have left.
    ///
    /// The returned guard holds the internal mutex until it is dropped, so
    /// no reader can be admitted and no second writer can even begin its
    /// drain-wait while the guard lives.
    pub fn write(&self) -> WriteGuard<'_, T> {
        let mut readers = self.state.lock().unwrap();
        while *readers != 0 {
            readers = self.cond.wait(readers).unwrap();
        }
        WriteGuard {
            lock: self,
            readers,
        }
    }

    /// Acquires the lock shared, parking while the reader population is
    /// over the cap.
    pub fn read(&self) -> ReadGuard<'_, T> {
        let mut readers = self.state.lock().unwrap();
        while *readers > MAX_READERS {
            readers = self.cond.wait(readers).unwrap();
        }
        *readers += 1;
        drop(readers);
        ReadGuard { lock: self }
    }

    /// Consumes the lock and returns the protected value.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: fmt::Debug> fmt::Debug for BoundedRwLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedRwLock").finish_non_exhaustive()
    }
}

/// Exclusive guard returned by [`BoundedRwLock::write`].
pub struct WriteGuard<'a, T> {
    lock: &'a BoundedRwLock<T>,
    /// Held for the guard's whole lifetime; releasing it is what lets the
    /// next writer (or reader) in.
    #[allow(dead_code)]
    readers: MutexGuard<'a, usize>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: we hold the mutex and observed zero readers, so no other
        // reference to the data exists.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: as above; exclusivity holds until the guard drops.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        // Signal before the mutex is released (the guard field drops right
        // after this body); whichever waiter wins re-checks its predicate.
        self.lock.cond.notify_one();
    }
}

/// Shared guard returned by [`BoundedRwLock::read`].
pub struct ReadGuard<'a, T> {
    lock: &'a BoundedRwLock<T>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the reader count is nonzero while this guard lives, so
        // no writer can get past its drain-wait; shared access only.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        let mut readers = self.lock.state.lock().unwrap();
        *readers -= 1;
        if *readers == 0 {
            // A writer may be waiting for the drain.
            self.lock.cond.notify_one();
        }
        if *readers <= MAX_READERS {
            // A reader may be parked on the cap. A writer woken by this
            // signal with readers still present just re-checks and sleeps.
            self.lock.cond.notify_one();
        }
    }
}
