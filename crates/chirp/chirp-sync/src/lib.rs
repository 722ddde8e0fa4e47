//! `chirp-sync`: blocking synchronization primitives for the feed server.
//!
//! The one export is [`BoundedRwLock`], a reader/writer lock built from a
//! single mutex and a single condition variable, with a bounded reader
//! population. The feed store uses it for coarse-grained locking: writers
//! get the whole list exclusively, readers share it up to the cap.

mod rwlock;

pub use rwlock::{BoundedRwLock, ReadGuard, WriteGuard, MAX_READERS};
