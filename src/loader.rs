//! Dataset loading for a page.
//!
//! Ownership model:
//! - `DatasetLoader` holds a shared `Transport` and performs one fetch + decode
//!   per call; it keeps no cache.
//! - `DatasetLoader::spawn` moves a single load onto a worker thread and hands
//!   back a `BackgroundLoad` that the page polls without blocking.
//! - Dropping a `BackgroundLoad` joins the worker.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::PageConfig;
use crate::errors::RouteError;
use crate::source::{LoadedContent, decode};
use crate::transport::Transport;

const BACKGROUND_STOPPED_REASON: &str = "background load stopped before producing a result";

/// Fetches and decodes page datasets through a shared transport.
#[derive(Clone)]
pub struct DatasetLoader {
    transport: Arc<dyn Transport>,
}

impl DatasetLoader {
    /// Loader fetching through `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Underlying transport description (for logs and CLI output).
    pub fn describe(&self) -> String {
        self.transport.describe()
    }

    /// Fetch and decode the dataset named by `config`, exactly once.
    pub fn load(&self, config: &PageConfig) -> Result<LoadedContent, RouteError> {
        let started = Instant::now();
        let result = self
            .transport
            .fetch_text(&config.page_id, &config.dataset)
            .and_then(|body| decode(&config.page_id, &body, config.format, &config.layout));
        match &result {
            Ok(content) => info!(
                "[route_planner:loader] source='{}' location='{}' loaded {} entries in {:.2?}",
                config.page_id,
                config.dataset,
                content.len(),
                started.elapsed()
            ),
            Err(err) => warn!(
                "[route_planner:loader] source='{}' location='{}' via {} failed: {}",
                config.page_id,
                config.dataset,
                self.transport.describe(),
                err
            ),
        }
        result
    }

    /// Start loading `config` on a worker thread.
    pub fn spawn(&self, config: PageConfig) -> BackgroundLoad {
        let loader = self.clone();
        let source_id = config.page_id.clone();
        let (sender, receiver) = mpsc::sync_channel(1);
        let handle = thread::spawn(move || {
            let _ = sender.send(loader.load(&config));
        });
        BackgroundLoad {
            source_id,
            receiver: Some(receiver),
            handle: Some(handle),
        }
    }
}

/// In-flight load started by [`DatasetLoader::spawn`].
pub struct BackgroundLoad {
    source_id: String,
    receiver: Option<mpsc::Receiver<Result<LoadedContent, RouteError>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl BackgroundLoad {
    /// Result of the load if it has finished; `None` while still running or
    /// after the result was already taken.
    pub fn try_take(&mut self) -> Option<Result<LoadedContent, RouteError>> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(result) => {
                self.finish();
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.finish();
                Some(Err(self.stopped()))
            }
        }
    }

    /// Block until the load finishes.
    pub fn wait(mut self) -> Result<LoadedContent, RouteError> {
        let result = match self.receiver.as_ref() {
            Some(receiver) => receiver.recv().unwrap_or_else(|_| Err(self.stopped())),
            None => Err(self.stopped()),
        };
        self.finish();
        result
    }

    /// True once a result was taken out of this handle.
    pub fn is_finished(&self) -> bool {
        self.receiver.is_none()
    }

    fn stopped(&self) -> RouteError {
        RouteError::SourceUnavailable {
            source_id: self.source_id.clone(),
            reason: BACKGROUND_STOPPED_REASON.to_string(),
        }
    }

    fn finish(&mut self) {
        self.receiver.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for BackgroundLoad {
    fn drop(&mut self) {
        self.finish();
    }
}
