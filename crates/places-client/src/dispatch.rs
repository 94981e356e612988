//! Hand-off of request outcomes to the caller's execution context.
//!
//! Background tasks never run user callbacks themselves. They post a job to a
//! [`ContextHandle`]; the thread that owns the matching [`ContextLoop`] (a UI
//! thread, a `main` loop, a test) runs the job when it pumps the loop.
//!
//! ```text
//! worker task ── post(job) ──► unbounded queue ──► ContextLoop::run_next ──► callback
//! ```

use tokio::sync::mpsc;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Creates a connected handle/loop pair.
pub fn delivery_context() -> (ContextHandle, ContextLoop) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ContextHandle { tx }, ContextLoop { rx })
}

/// Cloneable sender side of a delivery context.
#[derive(Debug, Clone)]
pub struct ContextHandle {
    tx: mpsc::UnboundedSender<Job>,
}

impl ContextHandle {
    /// Queues `job` to run on the context. Returns `false` if the loop has
    /// been dropped, in which case the job is discarded.
    pub fn post<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.tx.send(Box::new(job)).is_err() {
            tracing::warn!("delivery context closed; outcome dropped");
            return false;
        }
        true
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiver side of a delivery context. Jobs run on whichever thread calls
/// its `run_*` methods, in the order they were posted.
#[derive(Debug)]
pub struct ContextLoop {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl ContextLoop {
    /// Waits for the next job and runs it. Returns `false` once every handle
    /// is dropped and the queue is empty.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Blocking variant of [`ContextLoop::run_next`] for threads outside a
    /// Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_run_next(&mut self) -> bool {
        match self.rx.blocking_recv() {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Runs every job already queued without waiting. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Runs jobs until every handle is dropped.
    pub async fn run(mut self) {
        while self.run_next().await {}
    }
}
