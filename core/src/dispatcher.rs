//! Non-blocking dispatch of backend calls onto a worker pool.
//!
//! # Design
//! The request is built on the caller's thread from the configuration
//! current at dispatch time, so a request in flight keeps its URL even if
//! `initialize` swaps the configuration afterwards. Workers only run the
//! transport and send the raw `HttpOutcome` back over a per-request channel.
//! Classification and parsing happen when the caller collects the result
//! through `Pending`, on the caller's own thread.
//!
//! Completion order between requests is not defined.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::JoinHandle;

use crate::client::{Call, SncClient};
use crate::config::{BackendConfig, DispatcherConfig};
use crate::error::{ApiError, TransportError};
use crate::http::HttpOutcome;
use crate::operation::Operation;
use crate::transport::{Transport, UreqTransport};
use crate::types::OperationResult;

type Job = Box<dyn FnOnce() + Send + 'static>;
type Finish<T> = Box<dyn FnOnce(&SncClient, HttpOutcome) -> T + Send + 'static>;

/// Builders return either a `Call` or `Result<Call, ApiError>`.
pub trait IntoCall {
    fn into_call(self) -> Result<Call, ApiError>;
}

impl IntoCall for Call {
    fn into_call(self) -> Result<Call, ApiError> {
        Ok(self)
    }
}

impl IntoCall for Result<Call, ApiError> {
    fn into_call(self) -> Result<Call, ApiError> {
        self
    }
}

/// Result of a dispatched call that may not have completed yet.
pub struct Pending<T> {
    outcome: Receiver<HttpOutcome>,
    client: SncClient,
    finish: Finish<T>,
}

impl<T> Pending<T> {
    fn new<F>(outcome: Receiver<HttpOutcome>, client: SncClient, finish: F) -> Self
    where
        F: FnOnce(&SncClient, HttpOutcome) -> T + Send + 'static,
    {
        Self {
            outcome,
            client,
            finish: Box::new(finish),
        }
    }

    /// Block until the request completes.
    pub fn wait(self) -> T {
        let outcome = self.outcome.recv().unwrap_or_else(|_| Err(worker_lost()));
        (self.finish)(&self.client, outcome)
    }

    /// Return the result if the request has completed, or hand `self` back.
    pub fn try_wait(self) -> Result<T, Self> {
        match self.outcome.try_recv() {
            Ok(outcome) => Ok((self.finish)(&self.client, outcome)),
            Err(TryRecvError::Disconnected) => Ok((self.finish)(&self.client, Err(worker_lost()))),
            Err(TryRecvError::Empty) => Err(self),
        }
    }
}

fn worker_lost() -> TransportError {
    TransportError::new("dispatcher stopped before the request completed")
}

/// Fire-and-forget backend calls on a fixed pool of worker threads.
pub struct Dispatcher {
    client: RwLock<SncClient>,
    transport: Arc<dyn Transport>,
    jobs: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new<T: Transport>(transport: T, config: BackendConfig, pool: DispatcherConfig) -> std::io::Result<Self> {
        let (jobs, queue) = mpsc::channel::<Job>();
        let queue = Arc::new(Mutex::new(queue));

        let workers = (0..pool.workers.max(1))
            .map(|i| {
                let queue = Arc::clone(&queue);
                std::thread::Builder::new()
                    .name(format!("snc-worker-{i}"))
                    .spawn(move || worker_loop(queue))
            })
            .collect::<std::io::Result<Vec<_>>>()?;

        tracing::info!(base_url = config.base_url(), workers = workers.len(), "SNC backend initialized");
        Ok(Self {
            client: RwLock::new(SncClient::new(config)),
            transport: Arc::new(transport),
            jobs: Some(jobs),
            workers,
        })
    }

    /// Dispatcher over the ureq transport with the default pool size.
    pub fn with_ureq(config: BackendConfig) -> std::io::Result<Self> {
        Self::new(UreqTransport::new(), config, DispatcherConfig::default())
    }

    /// Replace the configuration. Requests already dispatched keep the URL
    /// they were built with.
    pub fn initialize(&self, config: BackendConfig) {
        tracing::info!(base_url = config.base_url(), "SNC backend initialized");
        *self.client.write().unwrap_or_else(PoisonError::into_inner) = SncClient::new(config);
    }

    pub fn config(&self) -> BackendConfig {
        self.snapshot().config().clone()
    }

    /// Dispatch a generic endpoint; the result is `(success, message)`.
    pub fn dispatch<B, C>(&self, build: B) -> Result<Pending<OperationResult>, ApiError>
    where
        B: FnOnce(&SncClient) -> C,
        C: IntoCall,
    {
        let (outcome, client, operation) = self.dispatch_inner(build)?;
        Ok(Pending::new(outcome, client, move |client: &SncClient, outcome| {
            client.parse_operation(operation, outcome)
        }))
    }

    /// Dispatch an endpoint with a typed result, e.g.
    /// `dispatch_with(|c| c.build_latest_detection(), |c, o| c.parse_latest_detection(o))`.
    pub fn dispatch_with<B, C, F, T>(&self, build: B, finish: F) -> Result<Pending<T>, ApiError>
    where
        B: FnOnce(&SncClient) -> C,
        C: IntoCall,
        F: FnOnce(&SncClient, HttpOutcome) -> T + Send + 'static,
    {
        let (outcome, client, _) = self.dispatch_inner(build)?;
        Ok(Pending::new(outcome, client, finish))
    }

    fn snapshot(&self) -> SncClient {
        self.client.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn dispatch_inner<B, C>(&self, build: B) -> Result<(Receiver<HttpOutcome>, SncClient, Operation), ApiError>
    where
        B: FnOnce(&SncClient) -> C,
        C: IntoCall,
    {
        let client = self.snapshot();
        let call = build(&client).into_call()?;
        let kind = call.operation;
        let operation = kind.name();
        tracing::debug!(
            operation,
            method = call.request.method.as_str(),
            url = %call.request.url,
            "dispatching request"
        );

        let (done, outcome) = mpsc::channel();
        let transport = Arc::clone(&self.transport);
        let job: Job = Box::new(move || {
            let result = transport.execute(&call.request);
            match &result {
                Ok(response) => tracing::debug!(operation, status = response.status, "request completed"),
                Err(err) => tracing::warn!(operation, error = %err, "request failed without a response"),
            }
            let _ = done.send(result);
        });

        if let Some(jobs) = &self.jobs {
            if jobs.send(job).is_err() {
                tracing::warn!(operation, "worker pool is gone, request dropped");
            }
        }

        Ok((outcome, client, kind))
    }
}

fn worker_loop(queue: Arc<Mutex<Receiver<Job>>>) {
    loop {
        let next = match queue.lock() {
            Ok(queue) => queue.recv(),
            Err(_) => return,
        };
        let Ok(job) = next else { return };
        // A panicking transport drops the job's sender, so its caller sees a
        // transport failure; the worker itself stays in the pool.
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!("transport panicked while executing a request");
        }
    }
}

impl Drop for Dispatcher {
    /// Closes the queue and waits for queued requests to finish.
    fn drop(&mut self) {
        self.jobs.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
