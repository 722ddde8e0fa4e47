//! `chirp-protocol`: the line-oriented JSON wire schema.
//!
//! Requests arrive one JSON object per stdin line; responses leave one JSON
//! object per stdout line. Decoding is split in two deliberately:
//!
//! - [`CommandProbe`] reads only the `command` field. The producer uses it
//!   to route a line (enqueue vs. shut down) without paying for a full
//!   decode; the raw line itself is what travels through the task queue.
//! - [`Request`] is the full decode a worker performs after dequeue, and
//!   [`Request::into_task`] validates it into a typed [`Task`].
//!
//! An unknown command is not an error: it yields `Ok(None)` and the line is
//! dropped without a response, so a client never sees a spurious success
//! for a command that was never executed. A known command missing one of
//! its required fields is malformed and yields a [`ProtocolError`].

mod request;
mod response;

pub use request::{CommandProbe, Request, Task};
pub use response::{FeedResponse, StatusResponse};

/// Decode-side failures for a single request line.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid request JSON")]
    Json(#[from] serde_json::Error),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}
