//! Debounced, self-retrying chart feed.
//!
//! A [`FeedController`] owns a background task that fetches the chart listing
//! for the current [`FilterState`] and publishes the result through a
//! `tokio::sync::watch` channel. Filter changes restart a quiescence window;
//! a failed fetch arms one automatic retry.

use std::future::pending;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use journal_core::defaults::{FETCH_RETRY_DELAY, FILTER_DEBOUNCE};
use journal_core::{ChartEntry, ChartFilterParams, Error, Result};

use crate::filter_state::FilterState;

const COMMAND_BUFFER: usize = 32;

/// Anything that can produce a filtered chart listing.
#[async_trait]
pub trait ChartSource: Send + Sync + 'static {
    async fn fetch_charts(&self, params: &ChartFilterParams) -> Result<Vec<ChartEntry>>;
}

/// Published state of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    Loading,
    Ready(Vec<ChartEntry>),
    /// Last fetch failed; carries a display message.
    Failed(String),
}

impl FeedState {
    pub fn charts(&self) -> &[ChartEntry] {
        match self {
            FeedState::Ready(charts) => charts,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FeedState::Loading)
    }
}

#[derive(Debug)]
enum Command {
    SetFilter(FilterState),
    Retry,
    Evict(String),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchOrigin {
    Initial,
    Filter,
    Manual,
    AutoRetry,
}

/// Handle to a running feed task.
///
/// Dropping every handle stops the task once its current fetch completes.
#[derive(Clone)]
pub struct FeedController {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<FeedState>,
}

impl FeedController {
    /// Spawn the feed task. The first fetch runs immediately.
    pub fn spawn(source: Arc<dyn ChartSource>, filter: FilterState) -> Self {
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state) = watch::channel(FeedState::Loading);
        let worker = FeedWorker {
            source,
            filter,
            commands: command_rx,
            state: state_tx,
            debounce_deadline: None,
            retry_deadline: None,
        };
        tokio::spawn(worker.run());
        Self { commands, state }
    }

    /// Replace the filter snapshot. Restarts the debounce window when the
    /// filter differs from the one the feed holds.
    pub async fn set_filter(&self, filter: FilterState) -> Result<()> {
        self.send(Command::SetFilter(filter)).await
    }

    /// Fetch now, cancelling any pending automatic retry.
    pub async fn retry(&self) -> Result<()> {
        self.send(Command::Retry).await
    }

    /// Drop a chart from the published listing without refetching.
    pub async fn evict(&self, id: impl Into<String>) -> Result<()> {
        self.send(Command::Evict(id.into())).await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.clone()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| Error::Internal("Feed task is not running".into()))
    }
}

struct FeedWorker {
    source: Arc<dyn ChartSource>,
    filter: FilterState,
    commands: mpsc::Receiver<Command>,
    state: watch::Sender<FeedState>,
    debounce_deadline: Option<Instant>,
    retry_deadline: Option<Instant>,
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending().await,
    }
}

impl FeedWorker {
    async fn run(mut self) {
        debug!(subsystem = "client", component = "feed", "Feed task started");
        self.fetch(FetchOrigin::Initial).await;

        loop {
            let debounce = self.debounce_deadline;
            let retry = self.retry_deadline;
            tokio::select! {
                command = self.commands.recv() => match command {
                    None | Some(Command::Shutdown) => break,
                    Some(Command::SetFilter(filter)) => {
                        if filter != self.filter {
                            self.filter = filter;
                            self.debounce_deadline = Some(Instant::now() + FILTER_DEBOUNCE);
                        }
                    }
                    Some(Command::Retry) => self.fetch(FetchOrigin::Manual).await,
                    Some(Command::Evict(id)) => self.evict(&id),
                },
                _ = sleep_until_opt(debounce) => {
                    self.debounce_deadline = None;
                    self.fetch(FetchOrigin::Filter).await;
                }
                _ = sleep_until_opt(retry) => {
                    self.retry_deadline = None;
                    self.fetch(FetchOrigin::AutoRetry).await;
                }
            }
        }

        debug!(subsystem = "client", component = "feed", "Feed task stopped");
    }

    async fn fetch(&mut self, origin: FetchOrigin) {
        // Any fetch supersedes a pending automatic retry.
        self.retry_deadline = None;
        self.state.send_replace(FeedState::Loading);

        let params = self.filter.to_params();
        match self.source.fetch_charts(&params).await {
            Ok(charts) => {
                debug!(
                    subsystem = "client",
                    component = "feed",
                    origin = ?origin,
                    result_count = charts.len(),
                    "Feed refreshed"
                );
                self.state.send_replace(FeedState::Ready(charts));
            }
            Err(e) => {
                warn!(
                    subsystem = "client",
                    component = "feed",
                    origin = ?origin,
                    error = %e,
                    "Chart fetch failed"
                );
                self.state
                    .send_replace(FeedState::Failed("Failed to load charts".to_string()));
                if origin != FetchOrigin::AutoRetry {
                    info!(
                        subsystem = "client",
                        component = "feed",
                        delay_ms = FETCH_RETRY_DELAY.as_millis() as u64,
                        "Scheduling automatic retry"
                    );
                    self.retry_deadline = Some(Instant::now() + FETCH_RETRY_DELAY);
                }
            }
        }
    }

    fn evict(&mut self, id: &str) {
        self.state.send_if_modified(|state| match state {
            FeedState::Ready(charts) => {
                let before = charts.len();
                charts.retain(|c| c.id != id);
                charts.len() != before
            }
            _ => false,
        });
    }
}
