use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::{client_debug, client_error, client_info, client_warn};

use crate::poller::{ChannelEventSink, EventSink, PollGuard};
use crate::{
    ClientError, ClientSettings, CreateTaskBody, EngineEvent, EngineStopped, ReqwestTaskApi,
    TaskApi,
};

enum EngineCommand {
    CreateTask(CreateTaskBody),
    StartPolling { task_id: String },
    StopPolling { task_id: String },
    Shutdown,
}

/// Runs task-service calls on a background runtime and reports back through events.
///
/// At most one poll loop is active. Dropping the handle stops it and joins the worker.
/// Once the worker is gone every call reports [`EngineStopped`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let poll_interval = settings.poll_interval;
        let api = Arc::new(ReqwestTaskApi::new(settings)?);
        Ok(Self::with_api(api, poll_interval))
    }

    pub fn with_api(api: Arc<dyn TaskApi>, poll_interval: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    client_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut worker = Worker {
                api,
                poll_interval,
                sink: Arc::new(ChannelEventSink::new(event_tx)),
                active: None,
            };
            while let Ok(command) = cmd_rx.recv() {
                if matches!(command, EngineCommand::Shutdown) {
                    break;
                }
                worker.handle(runtime.handle(), command);
            }
            worker.stop_active();
            client_debug!("Engine worker exiting");
        });

        Self {
            cmd_tx,
            event_rx,
            worker: Some(worker),
        }
    }

    pub fn create_task(&self, body: CreateTaskBody) -> Result<(), EngineStopped> {
        self.send(EngineCommand::CreateTask(body))
    }

    /// Starts polling `task_id`, stopping any loop for another task first.
    pub fn start_polling(&self, task_id: impl Into<String>) -> Result<(), EngineStopped> {
        self.send(EngineCommand::StartPolling {
            task_id: task_id.into(),
        })
    }

    pub fn stop_polling(&self, task_id: impl Into<String>) -> Result<(), EngineStopped> {
        self.send(EngineCommand::StopPolling {
            task_id: task_id.into(),
        })
    }

    /// `Ok(None)` when no event is queued right now.
    pub fn try_recv(&self) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(EngineStopped),
        }
    }

    /// `Ok(None)` when `timeout` passed without an event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }

    /// Stops any poll loop, then joins the worker. Later calls are no-ops.
    pub fn shutdown(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                client_error!("Engine worker panicked");
            }
        }
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineStopped> {
        self.cmd_tx.send(command).map_err(|_| {
            client_error!("Engine worker is gone, command dropped");
            EngineStopped
        })
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Worker {
    api: Arc<dyn TaskApi>,
    poll_interval: Duration,
    sink: Arc<dyn EventSink>,
    active: Option<PollGuard>,
}

impl Worker {
    fn handle(&mut self, runtime: &tokio::runtime::Handle, command: EngineCommand) {
        match command {
            EngineCommand::CreateTask(body) => {
                let api = self.api.clone();
                let sink = self.sink.clone();
                runtime.spawn(async move {
                    match api.create_task(&body).await {
                        Ok(created) => {
                            client_info!("Task created task_id={}", created.task_id);
                            sink.emit(EngineEvent::TaskCreated {
                                task_id: created.task_id,
                            });
                        }
                        Err(error) => {
                            client_warn!("Task creation failed: {}", error);
                            sink.emit(EngineEvent::TaskCreateFailed { error });
                        }
                    }
                });
            }
            EngineCommand::StartPolling { task_id } => {
                if let Some(active) = &self.active {
                    if active.task_id() == task_id && !active.is_stopped() {
                        client_debug!("Task {} is already being polled", task_id);
                        return;
                    }
                }
                self.stop_active();
                self.active = Some(PollGuard::spawn(
                    runtime,
                    self.api.clone(),
                    task_id,
                    self.poll_interval,
                    self.sink.clone(),
                ));
            }
            EngineCommand::StopPolling { task_id } => {
                let is_active = self
                    .active
                    .as_ref()
                    .is_some_and(|active| active.task_id() == task_id);
                if is_active {
                    self.stop_active();
                } else {
                    client_debug!("Stop for task {} ignored, not active", task_id);
                }
            }
            EngineCommand::Shutdown => self.stop_active(),
        }
    }

    fn stop_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.stop();
        }
    }
}
