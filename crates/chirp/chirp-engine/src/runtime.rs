//! The producer loop, the worker loop, and the two run modes.

use std::io::{BufRead, Write};
use std::thread;

use chirp_feed::Feed;
use chirp_protocol::{CommandProbe, Request, Task};
use chirp_queue::TaskQueue;
use tracing::{debug, warn};

use crate::{dispatch, Coordinator, EngineError, ResponseWriter};

/// Reads request lines and feeds the queue until DONE or end of input.
///
/// Only the command field is decoded here; workers pay for the full decode
/// after dequeue. Lines that do not parse far enough to expose a command
/// are diagnosed and skipped: enqueuing them would inflate the pending
/// ledger with work no worker can account for. End of input without a DONE
/// is treated as DONE so workers never park forever.
///
/// Returns the number of published tasks.
fn producer<R: BufRead>(
    input: R,
    queue: &TaskQueue<String>,
    coordinator: &Coordinator,
) -> Result<u64, EngineError> {
    let mut published = 0u64;
    for line in input.lines() {
        let line = line.map_err(EngineError::Input)?;
        match CommandProbe::decode(&line) {
            Err(error) => {
                warn!(%error, %line, "skipping malformed request line");
            }
            Ok(probe) if probe.is_done() => {
                coordinator.finish();
                return Ok(published);
            }
            Ok(_) => {
                queue.enqueue(line);
                coordinator.task_published();
                published += 1;
            }
        }
    }
    coordinator.finish();
    Ok(published)
}

/// One worker thread: park, drain a block, execute it, repeat until
/// shutdown.
fn worker<W: Write>(
    feed: &Feed,
    queue: &TaskQueue<String>,
    coordinator: &Coordinator,
    writer: &ResponseWriter<W>,
    block: usize,
) -> Result<(), EngineError> {
    loop {
        coordinator.wait_for_work();

        // Drain up to `block` tasks. The pending ledger is decremented per
        // dequeued line, decodable or not: the line has left the queue
        // either way and shutdown accounting must settle.
        let mut tasks: Vec<Task> = Vec::with_capacity(block);
        for _ in 0..block {
            let Some(line) = queue.dequeue() else {
                break;
            };
            coordinator.task_taken();
            match Request::decode(&line).and_then(Request::into_task) {
                Ok(Some(task)) => tasks.push(task),
                Ok(None) => debug!(%line, "ignoring unknown command"),
                Err(error) => warn!(%error, %line, "skipping malformed request line"),
            }
        }

        // Decide exit before touching the feed: the done flag is stable
        // once observed true, and the ledger only settles downward after
        // the producer stops.
        let exit = coordinator.should_exit();

        for task in &tasks {
            dispatch::execute(feed, task, writer)?;
        }

        if exit {
            return Ok(());
        }
    }
}

/// Concurrent mode: one producer on the calling thread, `workers` worker
/// threads, all joined before returning.
pub fn run_concurrent<R, W>(
    input: R,
    writer: &ResponseWriter<W>,
    workers: usize,
    block: usize,
) -> Result<(), EngineError>
where
    R: BufRead,
    W: Write + Send,
{
    let feed = Feed::new();
    let queue: TaskQueue<String> = TaskQueue::new();
    let coordinator = Coordinator::new();

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let handle = thread::Builder::new()
                .name(format!("feed-worker-{index}"))
                .spawn_scoped(scope, || worker(&feed, &queue, &coordinator, writer, block))
                .expect("failed to spawn worker thread");
            handles.push(handle);
        }

        let produced = producer(input, &queue, &coordinator);
        if produced.is_err() {
            // Input died mid-stream; release the workers so the joins
            // below can complete.
            coordinator.finish();
        }

        let mut first_error = match produced {
            Ok(published) => {
                debug!(published, "producer finished");
                None
            }
            Err(error) => Some(error),
        };

        for handle in handles {
            let result = handle.join().unwrap_or(Err(EngineError::WorkerPanic));
            if let Err(error) = result {
                first_error.get_or_insert(error);
            }
        }

        match first_error {
            None => Ok(()),
            Some(error) => Err(error),
        }
    })
}

/// Sequential mode: every request is decoded and executed inline, in input
/// order, on the calling thread. The feed still takes its lock for every
/// operation; there is simply never contention.
pub fn run_sequential<R, W>(input: R, writer: &ResponseWriter<W>) -> Result<(), EngineError>
where
    R: BufRead,
    W: Write,
{
    let feed = Feed::new();
    for line in input.lines() {
        let line = line.map_err(EngineError::Input)?;
        let task = match Request::decode(&line).and_then(Request::into_task) {
            Ok(Some(task)) => task,
            Ok(None) => {
                debug!(%line, "ignoring unknown command");
                continue;
            }
            Err(error) => {
                warn!(%error, %line, "skipping malformed request line");
                continue;
            }
        };
        if matches!(task, Task::Done) {
            break;
        }
        dispatch::execute(&feed, &task, writer)?;
    }
    Ok(())
}
