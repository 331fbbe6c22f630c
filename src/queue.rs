//! Bounded mapping queue.
//!
//! One dispatcher task pulls jobs in submission order and runs each to completion before
//! taking the next; inside a job, files are mapped concurrently under a semaphore. Every
//! job gets a child cancellation token that a deadline timer cancels, so a job either
//! posts a complete `{path → outline}` map or `None`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::config::{Config, MapperConfig, QueueConfig};
use crate::error::{MapError, Result};
use crate::language::has_map_support;
use crate::mapper::map_file;
use crate::types::{FileMap, FileMapBodies, NO_MAP_TOO_LARGE};

/// A batch travelling through the queue.
pub struct MapJob {
    pub inputs: HashMap<String, String>,
    /// Caller-side cancellation. The dispatcher derives the job's deadline token from it.
    pub cancel: CancellationToken,
    /// Receives the full result map, or `None` when the job was cancelled or timed out.
    pub results: oneshot::Sender<Option<FileMapBodies>>,
}

impl MapJob {
    pub fn new(
        inputs: HashMap<String, String>,
        cancel: CancellationToken,
    ) -> (Self, oneshot::Receiver<Option<FileMapBodies>>) {
        let (results, rx) = oneshot::channel();
        (
            Self {
                inputs,
                cancel,
                results,
            },
            rx,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub accepted: u64,
    pub started: u64,
    pub completed: u64,
    /// Highest number of files seen holding a semaphore permit at once.
    pub peak_active: usize,
}

#[derive(Default)]
struct Counters {
    accepted: AtomicU64,
    started: AtomicU64,
    completed: AtomicU64,
    active: AtomicUsize,
    peak_active: AtomicUsize,
}

/// Marks one file as actively mapping for as long as it lives.
struct ActiveGuard<'a>(&'a Counters);

impl<'a> ActiveGuard<'a> {
    fn enter(counters: &'a Counters) -> Self {
        let now = counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak_active.fetch_max(now, Ordering::SeqCst);
        Self(counters)
    }
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy)]
struct WorkerSettings {
    max_concurrency: usize,
    job_timeout: Duration,
    max_file_bytes: usize,
}

#[derive(Clone)]
pub struct MapQueue {
    tx: mpsc::Sender<MapJob>,
    counters: Arc<Counters>,
    settings: WorkerSettings,
}

impl MapQueue {
    /// Create the queue and spawn its dispatcher. Must be called inside a tokio runtime.
    pub fn new(queue: &QueueConfig, mapper: &MapperConfig) -> Self {
        let settings = WorkerSettings {
            max_concurrency: queue.effective_concurrency(),
            job_timeout: queue.job_timeout(),
            max_file_bytes: mapper.effective_max_file_bytes(),
        };
        let (tx, rx) = mpsc::channel(queue.capacity.max(1));
        let counters = Arc::new(Counters::default());

        debug!(
            capacity = queue.capacity,
            max_concurrency = settings.max_concurrency,
            timeout_secs = settings.job_timeout.as_secs(),
            "starting map queue"
        );
        tokio::spawn(dispatch(rx, settings, counters.clone()));

        Self {
            tx,
            counters,
            settings,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.queue, &config.mapper)
    }

    /// Submit a job without waiting. Fails with [`MapError::QueueFull`] when every slot
    /// is taken.
    pub fn enqueue(&self, job: MapJob) -> Result<()> {
        match self.tx.try_send(job) {
            Ok(()) => {
                self.counters.accepted.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(MapError::QueueFull),
            Err(TrySendError::Closed(_)) => Err(MapError::QueueClosed),
        }
    }

    /// Submit a batch and wait for its result.
    pub async fn map(&self, inputs: HashMap<String, String>, cancel: CancellationToken) -> Result<FileMapBodies> {
        let (job, rx) = MapJob::new(inputs, cancel.clone());
        self.enqueue(job)?;

        match rx.await {
            Ok(Some(bodies)) => Ok(bodies),
            Ok(None) if cancel.is_cancelled() => Err(MapError::Cancelled),
            Ok(None) => Err(MapError::DeadlineExceeded(self.settings.job_timeout.as_secs())),
            Err(_) => Err(MapError::QueueClosed),
        }
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            accepted: self.counters.accepted.load(Ordering::SeqCst),
            started: self.counters.started.load(Ordering::SeqCst),
            completed: self.counters.completed.load(Ordering::SeqCst),
            peak_active: self.counters.peak_active.load(Ordering::SeqCst),
        }
    }
}

async fn dispatch(mut rx: mpsc::Receiver<MapJob>, settings: WorkerSettings, counters: Arc<Counters>) {
    while let Some(job) = rx.recv().await {
        let MapJob {
            inputs,
            cancel,
            results,
        } = job;
        let job_no = counters.started.fetch_add(1, Ordering::SeqCst) + 1;

        if cancel.is_cancelled() {
            debug!(job = job_no, "job cancelled before start");
            let _ = results.send(None);
            counters.completed.fetch_add(1, Ordering::SeqCst);
            continue;
        }

        debug!(job = job_no, files = inputs.len(), "job started");
        let job_cancel = cancel.child_token();
        let deadline = tokio::spawn({
            let token = job_cancel.clone();
            let timeout = settings.job_timeout;
            async move {
                tokio::time::sleep(timeout).await;
                warn!(job = job_no, "job deadline exceeded after {}s", timeout.as_secs());
                token.cancel();
            }
        });

        let bodies = run_job(inputs, &job_cancel, settings, &counters).await;
        deadline.abort();

        debug!(job = job_no, ok = bodies.is_some(), "job finished");
        // the caller may have stopped listening
        let _ = results.send(bodies);
        counters.completed.fetch_add(1, Ordering::SeqCst);
    }
    debug!("map queue closed");
}

/// Map every input of one job. `None` when the job's token fired at any point.
async fn run_job(
    inputs: HashMap<String, String>,
    cancel: &CancellationToken,
    settings: WorkerSettings,
    counters: &Arc<Counters>,
) -> Option<FileMapBodies> {
    let semaphore = Arc::new(Semaphore::new(settings.max_concurrency));
    let bodies = Arc::new(Mutex::new(FileMapBodies::with_capacity(inputs.len())));
    let mut tasks = JoinSet::new();

    for (path, content) in inputs {
        // sentinels never take a permit
        if !has_map_support(&path) {
            bodies.lock().await.insert(path, FileMap::no_map().to_string());
            continue;
        }
        if content.len() > settings.max_file_bytes {
            bodies.lock().await.insert(path, format!("{NO_MAP_TOO_LARGE}\n"));
            continue;
        }

        let semaphore = semaphore.clone();
        let bodies = bodies.clone();
        let cancel = cancel.clone();
        let counters = counters.clone();

        tasks.spawn(async move {
            if cancel.is_cancelled() {
                return;
            }
            let _permit = tokio::select! {
                permit = semaphore.acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => return,
                },
                _ = cancel.cancelled() => return,
            };
            let _active = ActiveGuard::enter(&counters);

            let token = cancel.clone();
            let task_path = path.clone();
            let mapped = tokio::task::spawn_blocking(move || map_file(&token, &task_path, content.as_bytes())).await;

            let body = match mapped {
                Ok(Ok(map)) => map.to_string(),
                Ok(Err(e)) if e.is_cancellation() => return,
                Ok(Err(e)) => {
                    warn!(path = %path, "error mapping file: {e}");
                    FileMap::no_map().to_string()
                }
                Err(e) => {
                    error!(path = %path, "mapping task failed: {e}");
                    FileMap::no_map().to_string()
                }
            };

            bodies.lock().await.insert(path, body);
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!("map task join error: {e}");
        }
    }

    if cancel.is_cancelled() {
        return None;
    }

    let mut guard = bodies.lock().await;
    Some(std::mem::take(&mut *guard))
}
