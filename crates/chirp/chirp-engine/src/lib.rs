//! `chirp-engine`: the producer/consumer core of the feed server.
//!
//! One producer (the calling thread) reads JSON request lines and feeds
//! them through a lock-free queue to a fixed pool of worker threads,
//! spawned once at startup. Workers park on a shared condition variable
//! while the queue is empty, drain it in bounded blocks when woken, run
//! each task against the feed and emit one response line per task.
//! Shutdown is cooperative: a DONE request (or end of input) flips the
//! done flag under the coordinator mutex and broadcasts, and every worker
//! exits once it observes the flag with no work left.
//!
//! Responses are correlated to requests only by their `id`; across workers
//! they may appear on the output stream in any order.

mod coordinator;
mod dispatch;
mod output;
mod runtime;

pub use coordinator::Coordinator;
pub use output::ResponseWriter;
pub use runtime::{run_concurrent, run_sequential};

/// Fatal engine failures. Per-line decode problems are diagnostics, not
/// errors; what lands here ends the process with a nonzero status.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to read request line")]
    Input(#[source] std::io::Error),

    #[error("failed to encode response")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write response line")]
    Output(#[source] std::io::Error),

    #[error("worker thread panicked")]
    WorkerPanic,
}
