use chirp_sync::BoundedRwLock;
use serde::Serialize;

/// One post as it appears in a FEED response: body plus sort-key timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPost {
    pub body: String,
    pub timestamp: f64,
}

/// A node in the feed chain. The head sentinel carries `f64::NEG_INFINITY`,
/// the terminal sentinel `f64::INFINITY` with no successor; every real post
/// sits strictly between them in ascending timestamp order.
struct Post {
    body: String,
    timestamp: f64,
    next: Option<Box<Post>>,
}

struct PostList {
    head: Box<Post>,
}

impl PostList {
    fn new() -> Self {
        let terminal = Box::new(Post {
            body: String::new(),
            timestamp: f64::INFINITY,
            next: None,
        });
        let head = Box::new(Post {
            body: String::new(),
            timestamp: f64::NEG_INFINITY,
            next: Some(terminal),
        });
        Self { head }
    }
}

impl Drop for PostList {
    fn drop(&mut self) {
        // Unlink iteratively: the default recursive Box drop overflows the
        // stack on very long feeds.
        let mut next = self.head.next.take();
        while let Some(mut post) = next {
            next = post.next.take();
        }
    }
}

/// A single user's feed, sorted by timestamp, safe for concurrent use.
///
/// Writers (`add`, `remove`) hold the lock exclusively; readers
/// (`contains`, `snapshot`) share it. Timestamps are the identity key:
/// the non-finite sentinel values are unreachable through this API, so
/// sentinels are never compared as real posts.
pub struct Feed {
    list: BoundedRwLock<PostList>,
}

impl Feed {
    pub fn new() -> Self {
        Self {
            list: BoundedRwLock::new(PostList::new()),
        }
    }

    /// Inserts a post at its timestamp-sorted position.
    ///
    /// A timestamp already present in the feed is left untouched: inserting
    /// a duplicate would break the strictly-ascending chain invariant, so
    /// the call is a no-op. Non-finite timestamps are ignored for the same
    /// reason.
    pub fn add(&self, body: &str, timestamp: f64) {
        if !timestamp.is_finite() {
            return;
        }
        let mut list = self.list.write();
        let mut pred: &mut Post = &mut list.head;
        while pred.next.as_ref().is_some_and(|n| n.timestamp < timestamp) {
            pred = pred.next.as_mut().expect("checked by loop condition");
        }
        if pred.next.as_ref().is_some_and(|n| n.timestamp == timestamp) {
            return;
        }
        let next = pred.next.take();
        pred.next = Some(Box::new(Post {
            body: body.to_string(),
            timestamp,
            next,
        }));
    }

    /// Unlinks the post with the given timestamp. Returns whether a post
    /// was removed.
    pub fn remove(&self, timestamp: f64) -> bool {
        if !timestamp.is_finite() {
            return false;
        }
        let mut list = self.list.write();
        let mut pred: &mut Post = &mut list.head;
        while pred.next.as_ref().is_some_and(|n| n.timestamp < timestamp) {
            pred = pred.next.as_mut().expect("checked by loop condition");
        }
        match pred.next.take() {
            Some(mut curr) if curr.timestamp == timestamp => {
                pred.next = curr.next.take();
                true
            }
            curr => {
                pred.next = curr;
                false
            }
        }
    }

    /// Returns whether a post with the given timestamp is present.
    pub fn contains(&self, timestamp: f64) -> bool {
        if !timestamp.is_finite() {
            return false;
        }
        let list = self.list.read();
        let mut curr: &Post = &list.head;
        while curr.timestamp < timestamp {
            match curr.next {
                Some(ref next) => curr = next,
                None => return false,
            }
        }
        curr.timestamp == timestamp
    }

    /// Returns every post, newest first.
    pub fn snapshot(&self) -> Vec<FeedPost> {
        let list = self.list.read();
        let mut posts = Vec::new();
        let mut curr = list.head.next.as_deref();
        while let Some(post) = curr {
            if post.timestamp.is_finite() {
                posts.push(FeedPost {
                    body: post.body.clone(),
                    timestamp: post.timestamp,
                });
            }
            curr = post.next.as_deref();
        }
        posts.reverse();
        posts
    }
}

impl Default for Feed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn timestamps(feed: &Feed) -> Vec<f64> {
        feed.snapshot().into_iter().map(|p| p.timestamp).collect()
    }

    #[test]
    fn snapshot_is_newest_first() {
        let feed = Feed::new();
        feed.add("first", 1.0);
        feed.add("third", 3.0);
        feed.add("second", 2.0);
        assert_eq!(timestamps(&feed), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn snapshot_of_empty_feed_is_empty() {
        let feed = Feed::new();
        assert!(feed.snapshot().is_empty());
    }

    #[test]
    fn contains_tracks_add_and_remove() {
        let feed = Feed::new();
        feed.add("a", 5.0);
        feed.add("b", 7.0);
        assert!(feed.contains(5.0));
        assert!(feed.contains(7.0));

        assert!(feed.remove(5.0));
        assert!(!feed.contains(5.0));
        assert!(feed.contains(7.0));
    }

    #[test]
    fn remove_of_missing_timestamp_returns_false() {
        let feed = Feed::new();
        feed.add("a", 1.0);
        assert!(!feed.remove(42.0));
        assert_eq!(timestamps(&feed), vec![1.0]);
    }

    #[test]
    fn duplicate_add_is_a_no_op() {
        let feed = Feed::new();
        feed.add("original", 10.0);
        feed.add("imposter", 10.0);

        let posts = feed.snapshot();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].body, "original");
    }

    #[test]
    fn interior_insert_keeps_neighbors() {
        let feed = Feed::new();
        feed.add("low", 1.0);
        feed.add("high", 9.0);
        feed.add("mid", 5.0);
        assert_eq!(timestamps(&feed), vec![9.0, 5.0, 1.0]);

        assert!(feed.remove(5.0));
        assert_eq!(timestamps(&feed), vec![9.0, 1.0]);
    }

    #[test]
    fn non_finite_timestamps_are_rejected() {
        let feed = Feed::new();
        feed.add("nope", f64::INFINITY);
        feed.add("nope", f64::NAN);
        assert!(feed.snapshot().is_empty());
        assert!(!feed.remove(f64::INFINITY));
        assert!(!feed.contains(f64::NEG_INFINITY));
    }

    #[test]
    fn concurrent_adds_all_land_sorted() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;

        let feed = Arc::new(Feed::new());
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let feed = Arc::clone(&feed);
                thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        feed.add("post", (t * PER_THREAD + i) as f64);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stamps = timestamps(&feed);
        assert_eq!(stamps.len(), THREADS * PER_THREAD);
        // Newest first, strictly decreasing.
        assert!(stamps.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn readers_run_while_list_is_large() {
        let feed = Arc::new(Feed::new());
        for i in 0..1_000 {
            feed.add("post", i as f64);
        }

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let feed = Arc::clone(&feed);
                thread::spawn(move || {
                    for i in 0..1_000 {
                        assert!(feed.contains(i as f64));
                    }
                })
            })
            .collect();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
