//! Fixed-size worker pool draining the request queue
//!
//! Each worker loops: dequeue one request, run its session to completion,
//! repeat. The session body runs as a separate task that the worker awaits,
//! so an error or a panic inside a session is reported to the worker instead
//! of ending it. Workers observe shutdown only while awaiting: either the
//! queue or their current session.

use crate::error::SessionError;
use crate::queue::RequestQueue;
use log::{debug, error, info, warn};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

pub type WorkerId = usize;

/// Process-wide cooperative shutdown flag
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the flag is set
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

pub struct WorkerPool {
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts `size` workers, each feeding dequeued requests to `handler`
    pub fn spawn<T, H, Fut>(
        size: usize,
        queue: Arc<RequestQueue<T>>,
        shutdown: Shutdown,
        handler: H,
    ) -> Self
    where
        T: Send + 'static,
        H: Fn(WorkerId, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), SessionError>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let workers = (0..size)
            .map(|id| {
                let queue = Arc::clone(&queue);
                let shutdown = shutdown.clone();
                let handler = Arc::clone(&handler);
                tokio::spawn(run_worker(id, queue, shutdown, handler))
            })
            .collect();

        info!("Worker pool started with {} workers", size);
        Self { workers }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Waits for every worker to stop (after shutdown was triggered)
    pub async fn join(self) {
        for (id, worker) in self.workers.into_iter().enumerate() {
            if let Err(e) = worker.await {
                error!("Worker {}: terminated abnormally: {}", id, e);
            }
        }
    }
}

async fn run_worker<T, H, Fut>(
    id: WorkerId,
    queue: Arc<RequestQueue<T>>,
    shutdown: Shutdown,
    handler: Arc<H>,
) where
    T: Send + 'static,
    H: Fn(WorkerId, T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SessionError>> + Send + 'static,
{
    debug!("Worker {}: created", id);

    loop {
        let request = tokio::select! {
            biased;
            _ = shutdown.wait() => break,
            request = queue.dequeue() => request,
        };

        let mut session = tokio::spawn((*handler)(id, request));

        tokio::select! {
            result = &mut session => report(id, result, &shutdown),
            _ = shutdown.wait() => {
                info!("Worker {}: closing in-flight session for shutdown", id);
                session.abort();
                let _ = session.await;
                break;
            }
        }
    }

    debug!("Worker {}: stopped", id);
}

fn report(id: WorkerId, result: Result<Result<(), SessionError>, JoinError>, shutdown: &Shutdown) {
    match result {
        Ok(Ok(())) => debug!("Worker {}: session completed", id),
        Ok(Err(e)) if e.is_fatal() => {
            error!("Worker {}: {}; starting shutdown", id, e);
            shutdown.trigger();
        }
        Ok(Err(e)) => warn!("Worker {}: session terminated: {}", id, e),
        Err(e) if e.is_panic() => error!("Worker {}: session panicked", id),
        Err(e) => warn!("Worker {}: session cancelled: {}", id, e),
    }
}
