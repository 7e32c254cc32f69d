//! Writer pool
//!
//! Fixed set of background threads draining a job channel.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::error::{Result, StoreError};

use super::{WriteHandler, WriteJob};

/// Background writer threads fed through an unbounded channel
///
/// Submitting never blocks. Concurrency of disk writes is bounded by the
/// number of threads.
pub struct WriterPool {
    sender: Mutex<Option<Sender<WriteJob>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WriterPool {
    /// Spawn `threads` workers (at least one) running `handler`
    pub fn spawn<H: WriteHandler>(threads: usize, handler: Arc<H>) -> Result<Self> {
        let (sender, receiver) = unbounded::<WriteJob>();

        let mut workers = Vec::with_capacity(threads.max(1));
        for index in 0..threads.max(1) {
            let receiver = receiver.clone();
            let handler = Arc::clone(&handler);
            let worker = thread::Builder::new()
                .name(format!("elstore-writer-{}", index))
                .spawn(move || Self::run(receiver, handler))?;
            workers.push(worker);
        }

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
        })
    }

    fn run<H: WriteHandler>(receiver: Receiver<WriteJob>, handler: Arc<H>) {
        for job in receiver.iter() {
            handler.handle(job);
        }
    }

    /// Queue a job; hands it back if the pool is shut down
    pub fn submit(&self, job: WriteJob) -> std::result::Result<(), WriteJob> {
        match self.sender.lock().as_ref() {
            Some(sender) => sender.send(job).map_err(|e| e.into_inner()),
            None => Err(job),
        }
    }

    /// Stop accepting jobs and join every worker after it drains the queue
    pub fn shutdown(&self) -> Result<()> {
        self.sender.lock().take();

        let workers = std::mem::take(&mut *self.workers.lock());
        let mut panicked = 0usize;
        for worker in workers {
            if worker.join().is_err() {
                panicked += 1;
            }
        }

        if panicked > 0 {
            tracing::warn!("{} writer thread(s) panicked", panicked);
            return Err(StoreError::PipelineClosed);
        }
        Ok(())
    }

    /// Number of live worker handles
    pub fn worker_count(&self) -> usize {
        self.workers.lock().len()
    }
}

impl Drop for WriterPool {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
