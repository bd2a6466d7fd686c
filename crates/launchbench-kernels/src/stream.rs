//! In-order work queue standing in for a device stream.

use launchbench_common::{BenchError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Launches a stream holds before `submit` blocks.
pub const DEFAULT_QUEUE_DEPTH: usize = 8;

type Job = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

enum Command {
    Run(Job),
    Sync(Sender<Option<BenchError>>),
}

/// A bounded FIFO queue drained by one worker thread.
///
/// Jobs run strictly in submission order. Once `depth` jobs are pending,
/// `submit` blocks until the worker takes the next one. The first job error is sticky: later
/// jobs are skipped and the error is returned by the next `synchronize`.
pub struct Stream {
    name: String,
    sender: Option<SyncSender<Command>>,
    worker: Option<JoinHandle<()>>,
}

impl Stream {
    pub fn new(name: &str) -> Result<Self> {
        Self::with_depth(name, DEFAULT_QUEUE_DEPTH)
    }

    pub fn with_depth(name: &str, depth: usize) -> Result<Self> {
        let (sender, receiver) = mpsc::sync_channel(depth.max(1));
        let worker = thread::Builder::new()
            .name(format!("stream-{name}"))
            .spawn(move || drain(receiver))
            .map_err(|e| BenchError::Stream(format!("failed to start stream {name}: {e}")))?;
        debug!(stream = name, depth, "stream created");

        Ok(Self { name: name.to_string(), sender: Some(sender), worker: Some(worker) })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue `job` and return without waiting for it to run.
    pub fn submit(&self, job: impl FnOnce() -> Result<()> + Send + 'static) -> Result<()> {
        self.send(Command::Run(Box::new(job)))
    }

    /// Wait until every submitted job has finished.
    pub fn synchronize(&self) -> Result<()> {
        let (ack, done) = mpsc::channel();
        self.send(Command::Sync(ack))?;
        match done.recv() {
            Ok(None) => Ok(()),
            Ok(Some(err)) => Err(err),
            Err(_) => Err(self.disconnected()),
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        let sender = self.sender.as_ref().ok_or_else(|| self.disconnected())?;
        sender.send(command).map_err(|_| self.disconnected())
    }

    fn disconnected(&self) -> BenchError {
        BenchError::Stream(format!("stream {} worker has exited", self.name))
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        // Closing the channel lets the worker finish queued jobs and exit.
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        debug!(stream = %self.name, "stream destroyed");
    }
}

fn drain(receiver: Receiver<Command>) {
    let mut sticky: Option<BenchError> = None;
    for command in receiver {
        match command {
            Command::Run(job) => {
                if sticky.is_some() {
                    continue;
                }
                sticky = match panic::catch_unwind(AssertUnwindSafe(job)) {
                    Ok(Ok(())) => None,
                    Ok(Err(err)) => Some(err),
                    Err(_) => Some(BenchError::Launch("kernel panicked on stream".into())),
                };
            }
            Command::Sync(ack) => {
                let _ = ack.send(sticky.take());
            }
        }
    }
}
