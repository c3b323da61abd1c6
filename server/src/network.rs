//! TCP front end: accepts connections and hands them to the worker pool

use crate::config::ServerConfig;
use crate::error::{ServerError, SessionError};
use crate::pool::{Shutdown, WorkerId, WorkerPool};
use crate::queue::RequestQueue;
use crate::session::{ServerContext, Session};
use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// An accepted connection waiting for a worker
#[derive(Debug)]
pub struct Request {
    pub stream: TcpStream,
    pub addr: SocketAddr,
}

pub struct Server {
    listener: TcpListener,
    pool_size: usize,
    context: ServerContext,
    shutdown: Shutdown,
}

impl Server {
    pub async fn bind(config: &ServerConfig, context: ServerContext) -> Result<Self, ServerError> {
        config.validate()?;
        let listener = TcpListener::bind(config.address()).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            pool_size: config.pool_size,
            context,
            shutdown: Shutdown::new(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle that stops `run` when triggered
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Accepts connections until shutdown, then closes everything down
    pub async fn run(self) -> Result<(), ServerError> {
        let queue = Arc::new(RequestQueue::new());
        let context = self.context.clone();
        let pool = WorkerPool::spawn(
            self.pool_size,
            Arc::clone(&queue),
            self.shutdown.clone(),
            move |worker_id, request: Request| serve(worker_id, request, context.clone()),
        );

        let result = self.accept_loop(&queue).await;

        info!("Server shutting down");
        self.shutdown.trigger();
        let unserved = queue.drain();
        if !unserved.is_empty() {
            info!("Closing {} queued connections", unserved.len());
        }
        drop(unserved);

        pool.join().await;
        info!("All workers stopped");
        result
    }

    async fn accept_loop(&self, queue: &RequestQueue<Request>) -> Result<(), ServerError> {
        loop {
            tokio::select! {
                _ = self.shutdown.wait() => return Ok(()),
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        debug!("Accepted connection from {}", addr);
                        if let Err(e) = queue.enqueue(Request { stream, addr }) {
                            error!("Failed to queue connection from {}: {}", addr, e);
                            return Err(e.into());
                        }
                    }
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                },
            }
        }
    }
}

async fn serve(
    worker_id: WorkerId,
    request: Request,
    context: ServerContext,
) -> Result<(), SessionError> {
    let Request { stream, addr } = request;
    info!("Worker {}: serving {}", worker_id, addr);

    let mut session = Session::new(stream, context, worker_id);
    let outcome = session.run().await?;

    info!("Worker {}: {} disconnected ({:?})", worker_id, addr, outcome);
    Ok(())
}
