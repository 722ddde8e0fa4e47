//! `chirp-feed`: the timestamp-ordered post store.
//!
//! A feed is a singly-linked list of posts sorted by timestamp, bracketed
//! by two sentinel nodes (−∞ at the head, +∞ at the tail) so every walk
//! terminates without boundary checks. All access is coarse-grained through
//! a [`chirp_sync::BoundedRwLock`]: mutations take the write side,
//! traversals the read side.

mod feed;

pub use feed::{Feed, FeedPost};
