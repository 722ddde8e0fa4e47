//! `chirp-queue`: an unbounded lock-free FIFO for pending tasks.
//!
//! This is the Michael–Scott queue: a singly-linked list with atomic
//! `head`/`tail` pointers, where every mutation is a compare-and-swap and
//! threads that observe a half-finished enqueue help it along instead of
//! blocking. The producer pushes raw request payloads; workers pop them in
//! blocks. Neither side ever takes a lock or waits.
//!
//! Node reclamation uses epoch-based memory management, which is what makes
//! the dequeue side safe against reuse races: a node retired by one thread
//! is only freed once no thread can still be holding a reference from an
//! earlier read.

mod queue;

pub use queue::TaskQueue;
