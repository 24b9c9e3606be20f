//! Log poller — follows new blocks on a JSON-RPC node and publishes the
//! watched contracts' logs to an [`EventHub`].
//!
//! Runs as a background tokio task driven by an interval; the public handle
//! talks to it over an mpsc command channel. Errors are logged and the next
//! tick picks up from the last block that was fully processed, so no range is
//! skipped.

use super::EventHub;
use crate::contract::ContractEvent;
use crate::error::RpcError;
use crate::network::DEFAULT_POLL_INTERVAL_MS;
use crate::rpc::{LogFilter, RpcHttp};
use alloy_primitives::Address;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: Duration,
    /// First block to fetch logs from. `None` starts at the current head, so
    /// only logs emitted after start-up are published.
    pub start_block: Option<u64>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            start_block: None,
        }
    }
}

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    PollNow,
    Stop,
}

// ─── Background task state ───────────────────────────────────────────────────

struct TaskState {
    rpc: Arc<RpcHttp>,
    hub: Arc<EventHub>,
    addresses: Vec<Address>,
    cmd_rx: mpsc::Receiver<Command>,
    /// Next block whose logs have not been published yet.
    next_block: Option<u64>,
}

// ─── Public LogPoller ────────────────────────────────────────────────────────

pub struct LogPoller {
    cmd_tx: Option<mpsc::Sender<Command>>,
    task_handle: Option<JoinHandle<()>>,
}

impl LogPoller {
    /// Start polling logs of `addresses`. Must be called inside a tokio runtime.
    pub fn start(
        rpc: Arc<RpcHttp>,
        hub: Arc<EventHub>,
        addresses: Vec<Address>,
        config: PollerConfig,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let state = TaskState {
            rpc,
            hub,
            addresses,
            cmd_rx,
            next_block: config.start_block,
        };

        let handle = tokio::spawn(run_task(state, config.interval));
        Self {
            cmd_tx: Some(cmd_tx),
            task_handle: Some(handle),
        }
    }

    /// Poll immediately instead of waiting for the next tick.
    pub fn poll_now(&self) {
        if let Some(tx) = &self.cmd_tx {
            // A full channel already has a poll queued.
            let _ = tx.try_send(Command::PollNow);
        }
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the task and wait for it to finish its current poll.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(Command::Stop).await;
        }
        if let Some(handle) = self.task_handle.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }
    }
}

impl Drop for LogPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for LogPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogPoller")
            .field("running", &self.is_running())
            .finish()
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task(mut state: TaskState, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            cmd = state.cmd_rx.recv() => match cmd {
                Some(Command::PollNow) => {}
                Some(Command::Stop) | None => {
                    tracing::debug!("Log poller stopped");
                    return;
                }
            },
        }

        match poll_once(&mut state).await {
            Ok(0) => {}
            Ok(n) => tracing::debug!("Published {} log(s)", n),
            Err(e) => tracing::warn!("Log poll failed: {}", e),
        }
    }
}

/// Fetch and publish logs from `next_block` up to the current head.
async fn poll_once(state: &mut TaskState) -> Result<usize, RpcError> {
    let head = state.rpc.block_number().await?;

    let from = match state.next_block {
        Some(block) => block,
        None => {
            // First poll without a start block: begin after the current head.
            state.next_block = Some(head + 1);
            return Ok(0);
        }
    };
    if from > head {
        return Ok(0);
    }

    let filter = LogFilter::range(state.addresses.clone(), from, head);
    let logs = state.rpc.get_logs(&filter).await?;

    let batch: Vec<ContractEvent> = logs
        .iter()
        .filter(|log| !log.removed)
        .map(|log| log.decode())
        .collect();

    state.next_block = Some(head + 1);
    state.hub.publish(&batch);
    Ok(batch.len())
}
