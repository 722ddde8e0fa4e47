//! Michael–Scott lock-free FIFO queue.
//!
//! # Structure
//!
//! ```text
//!  head ──► [sentinel] ──► [oldest] ──► … ──► [newest] ◄── tail
//! ```
//!
//! `head` always points at a sentinel node whose payload is never read; the
//! first real element is `head.next`. `tail` points at the last node or its
//! immediate predecessor; the lag is transient and any thread that sees it
//! repairs it with a CAS before making progress.
//!
//! # Linearization
//!
//! An enqueue takes effect at its successful CAS of `tail.next` from null;
//! a dequeue takes effect at its successful CAS of `head`. FIFO order holds
//! across those points. A node's `next` pointer is written exactly once,
//! from null to its successor; nothing else in a linked node is ever
//! mutated.

use std::mem::MaybeUninit;
use std::ptr;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

use crossbeam_epoch::{self as epoch, Atomic, Guard, Owned, Shared};
use crossbeam_utils::CachePadded;

struct Node<T> {
    /// Uninitialized in sentinel position, initialized everywhere else.
    payload: MaybeUninit<T>,
    next: Atomic<Node<T>>,
}

impl<T> Node<T> {
    fn sentinel() -> Owned<Self> {
        Owned::new(Node {
            payload: MaybeUninit::uninit(),
            next: Atomic::null(),
        })
    }
}

/// An unbounded lock-free multi-producer/multi-consumer FIFO.
pub struct TaskQueue<T> {
    head: CachePadded<Atomic<Node<T>>>,
    tail: CachePadded<Atomic<Node<T>>>,
}

// SAFETY: payloads move through the queue by value; a payload is owned by
// exactly one side at a time (enqueuer until the linking CAS, dequeuer from
// the head CAS on). No `&T` is ever handed out.
unsafe impl<T: Send> Send for TaskQueue<T> {}
unsafe impl<T: Send> Sync for TaskQueue<T> {}

impl<T> TaskQueue<T> {
    /// Creates an empty queue: one sentinel node, pointed at by both ends.
    pub fn new() -> Self {
        let queue = Self {
            head: CachePadded::new(Atomic::null()),
            tail: CachePadded::new(Atomic::null()),
        };
        // SAFETY: the queue is not shared yet; no other thread can observe
        // the intermediate null state.
        unsafe {
            let guard = epoch::unprotected();
            let sentinel = Node::sentinel().into_shared(guard);
            queue.head.store(sentinel, Relaxed);
            queue.tail.store(sentinel, Relaxed);
        }
        queue
    }

    /// Appends a value at the tail. Never blocks, never fails.
    pub fn enqueue(&self, value: T) {
        let guard = epoch::pin();
        let new = Owned::new(Node {
            payload: MaybeUninit::new(value),
            next: Atomic::null(),
        })
        .into_shared(&guard);

        loop {
            let tail = self.tail.load(Acquire, &guard);
            // SAFETY: head/tail are never null after construction, and a
            // pinned guard keeps any node we loaded alive.
            let tail_ref = unsafe { tail.deref() };
            let next = tail_ref.next.load(Acquire, &guard);

            // Snapshot consistency check: if the tail moved under us, the
            // `next` we read belongs to a stale node.
            if self.tail.load(Acquire, &guard) != tail {
                continue;
            }

            if !next.is_null() {
                // Tail is lagging behind a half-finished enqueue: help
                // swing it forward, then retry.
                let _ = self
                    .tail
                    .compare_exchange(tail, next, Release, Relaxed, &guard);
                continue;
            }

            // Logical enqueue: link the node. This is the linearization
            // point on success.
            if tail_ref
                .next
                .compare_exchange(Shared::null(), new, Release, Relaxed, &guard)
                .is_ok()
            {
                // Physical enqueue: swing the tail. Best-effort; if it
                // fails, the next operation that notices will help.
                let _ = self
                    .tail
                    .compare_exchange(tail, new, Release, Relaxed, &guard);
                return;
            }
        }
    }

    /// Removes and returns the oldest value, or `None` if the queue is
    /// empty at the linearization point. Never blocks.
    pub fn dequeue(&self) -> Option<T> {
        let guard = epoch::pin();
        self.dequeue_with(&guard)
    }

    fn dequeue_with(&self, guard: &Guard) -> Option<T> {
        loop {
            let head = self.head.load(Acquire, guard);
            // SAFETY: see `enqueue`; the guard pins the epoch.
            let head_ref = unsafe { head.deref() };
            let next = head_ref.next.load(Acquire, guard);
            let tail = self.tail.load(Acquire, guard);

            if self.head.load(Acquire, guard) != head {
                continue;
            }

            // SAFETY: a non-null `next` stays allocated while we hold the
            // guard, even if another dequeuer retires it concurrently.
            let next_ref = match unsafe { next.as_ref() } {
                // Sentinel has no successor: empty at this instant.
                None => return None,
                Some(node) => node,
            };

            if head == tail {
                // Non-empty but tail still points at the sentinel: an
                // enqueue is mid-flight. Help, then retry.
                let _ = self
                    .tail
                    .compare_exchange(tail, next, Release, Relaxed, guard);
                continue;
            }

            if self
                .head
                .compare_exchange(head, next, Release, Relaxed, guard)
                .is_ok()
            {
                // SAFETY: the successful head CAS makes `next` the new
                // sentinel and transfers its payload to us exclusively; no
                // later operation reads a sentinel's payload. The old
                // sentinel is retired through the epoch so any thread still
                // holding a reference from before our CAS stays safe.
                unsafe {
                    let value = ptr::read(next_ref.payload.as_ptr());
                    guard.defer_destroy(head);
                    return Some(value);
                }
            }
        }
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for TaskQueue<T> {
    fn drop(&mut self) {
        // SAFETY: `&mut self` means no concurrent operations; with an
        // unprotected guard the deferred destructions run immediately.
        unsafe {
            let guard = epoch::unprotected();
            while self.dequeue_with(guard).is_some() {}
            let sentinel = self.head.load(Relaxed, guard);
            drop(sentinel.into_owned());
        }
    }
}
