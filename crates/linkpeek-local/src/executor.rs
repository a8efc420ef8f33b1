//! Designated execution contexts for HTML rendering.

use std::sync::mpsc;
use std::thread::{self, JoinHandle, ThreadId};

use linkpeek_core::{Error, Job, RenderExecutor, Result};

/// Treats every caller as the designated context: rendering runs on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl RenderExecutor for InlineExecutor {
    fn is_current(&self) -> bool {
        true
    }

    fn execute(&self, job: Job) -> Result<()> {
        job();
        Ok(())
    }
}

/// A single dedicated thread that runs rendering jobs in submission order.
///
/// Dropping it closes the queue and joins the thread once queued jobs have drained.
#[derive(Debug)]
pub struct RenderThread {
    sender: Option<mpsc::Sender<Job>>,
    thread_id: ThreadId,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    pub fn spawn() -> Result<Self> {
        Self::spawn_named("linkpeek-render")
    }

    pub fn spawn_named(name: &str) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<Job>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    // A panicking job drops its reply sender; the waiting caller falls back.
                    if std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)).is_err() {
                        tracing::warn!("render job panicked");
                    }
                }
                tracing::debug!("render thread queue closed");
            })
            .map_err(|e| Error::Executor(format!("failed to spawn render thread: {e}")))?;
        let thread_id = handle.thread().id();
        tracing::debug!(thread = name, "render thread started");
        Ok(Self {
            sender: Some(tx),
            thread_id,
            handle: Some(handle),
        })
    }
}

impl RenderExecutor for RenderThread {
    fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    fn execute(&self, job: Job) -> Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| Error::Executor("render thread is shutting down".to_string()))?;
        sender
            .send(job)
            .map_err(|_| Error::Executor("render thread has stopped".to_string()))
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            // Joining ourselves would never return.
            if thread::current().id() != self.thread_id {
                let _ = handle.join();
            }
        }
    }
}
