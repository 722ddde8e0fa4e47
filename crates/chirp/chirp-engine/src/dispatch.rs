use std::io::Write;

use chirp_feed::Feed;
use chirp_protocol::{FeedResponse, StatusResponse, Task};

use crate::{EngineError, ResponseWriter};

/// Runs one task against the feed and emits its response line.
///
/// ADD always reports success (a duplicate timestamp is absorbed by the
/// feed without dislodging the existing post); REMOVE and CONTAINS report
/// what the feed found; FEED returns the snapshot newest first; DONE is a
/// control message and produces no output.
pub(crate) fn execute<W: Write>(
    feed: &Feed,
    task: &Task,
    writer: &ResponseWriter<W>,
) -> Result<(), EngineError> {
    match task {
        Task::Add {
            id,
            body,
            timestamp,
        } => {
            feed.add(body, *timestamp);
            writer.write_line(&StatusResponse {
                success: true,
                id: *id,
            })
        }
        Task::Remove { id, timestamp } => {
            let success = feed.remove(*timestamp);
            writer.write_line(&StatusResponse { success, id: *id })
        }
        Task::Contains { id, timestamp } => {
            let success = feed.contains(*timestamp);
            writer.write_line(&StatusResponse { success, id: *id })
        }
        Task::Feed { id } => writer.write_line(&FeedResponse {
            id: *id,
            feed: feed.snapshot(),
        }),
        Task::Done => Ok(()),
    }
}
