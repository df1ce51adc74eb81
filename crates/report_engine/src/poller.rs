use std::sync::{mpsc, Arc};
use std::time::Duration;

use client_logging::{client_debug, client_info, client_warn};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, TaskApi};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Why a poll loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// The backend reported `succeeded` or `failed`.
    Terminal,
    /// A status query failed; the loop does not retry.
    QueryFailed,
    Cancelled,
}

/// Queries `task_id` every `period` until a terminal payload, a failed query or cancellation.
///
/// The first query happens one period after the call. Ticks are serial: the next
/// period starts counting only after the previous response has been emitted.
pub async fn run_poll_loop(
    api: &dyn TaskApi,
    task_id: &str,
    period: Duration,
    sink: &dyn EventSink,
    cancel: &CancellationToken,
) -> PollExit {
    let period = period.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollExit::Cancelled,
            _ = ticker.tick() => {}
        }
        tick += 1;

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollExit::Cancelled,
            result = api.task_status(task_id) => result,
        };

        match result {
            Ok(payload) => {
                let terminal = payload.is_terminal();
                client_debug!(
                    "Poll tick={} task_id={} status={} progress={:?}",
                    tick,
                    task_id,
                    payload.status,
                    payload.progress
                );
                sink.emit(EngineEvent::Status {
                    task_id: task_id.to_string(),
                    payload,
                });
                if terminal {
                    client_info!("Task {} reached a terminal status after {} polls", task_id, tick);
                    return PollExit::Terminal;
                }
            }
            Err(error) => {
                client_warn!("Status query for task {} failed: {}", task_id, error);
                sink.emit(EngineEvent::StatusFailed {
                    task_id: task_id.to_string(),
                    error,
                });
                return PollExit::QueryFailed;
            }
        }
    }
}

/// Owns the cancellation side of one running poll loop.
///
/// `stop` may be called any number of times; dropping the guard stops the loop too.
pub struct PollGuard {
    task_id: String,
    cancel: CancellationToken,
}

impl PollGuard {
    pub fn spawn(
        runtime: &tokio::runtime::Handle,
        api: Arc<dyn TaskApi>,
        task_id: String,
        period: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let loop_cancel = cancel.clone();
        let loop_task_id = task_id.clone();
        client_info!("Start polling task {} every {:?}", task_id, period);

        runtime.spawn(async move {
            let exit = run_poll_loop(
                api.as_ref(),
                &loop_task_id,
                period,
                sink.as_ref(),
                &loop_cancel,
            )
            .await;
            // A loop that ended on its own reads as stopped before anyone hears about it.
            loop_cancel.cancel();
            sink.emit(EngineEvent::PollStopped {
                task_id: loop_task_id,
                exit,
            });
        });

        Self { task_id, cancel }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            client_info!("Stop polling task {}", self.task_id);
        }
        self.cancel.cancel();
    }

    /// True once `stop` was called or the loop returned by itself.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.stop();
    }
}
