use std::time::Duration;

use client_logging::{client_debug, client_info, client_warn};
use report_core::{
    clamp_progress, Artifacts, Effect, LifecycleState, Msg, SubmissionRequest, SubmitFailure,
    TaskHandle, TaskStatus, TaskStatusSnapshot,
};
use report_engine::{
    ClientError, ClientSettings, CreateTaskBody, EngineEvent, EngineHandle, EngineStopped,
    FailureKind, TaskStatusPayload,
};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    /// Hands effects to the engine in order. Stops at the first one the engine cannot take.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Result<(), EngineStopped> {
        for effect in effects {
            match effect {
                Effect::CreateTask(request) => {
                    client_info!(
                        "CreateTask prompt_len={} email={}",
                        request.user_prompt.len(),
                        request.email
                    );
                    self.engine.create_task(create_body(request))?;
                }
                Effect::StartPolling { handle } => {
                    self.engine.start_polling(handle.as_str())?;
                }
                Effect::StopPolling { handle } => {
                    self.engine.stop_polling(handle.as_str())?;
                }
            }
        }
        Ok(())
    }

    /// Waits up to `timeout` for engine events and returns them as messages.
    ///
    /// Events already queued are delivered before a stopped engine is reported.
    pub fn poll_messages(&self, timeout: Duration) -> Result<Vec<Msg>, EngineStopped> {
        let Some(first) = self.engine.recv_timeout(timeout)? else {
            return Ok(Vec::new());
        };
        let mut events = vec![first];
        while let Ok(Some(event)) = self.engine.try_recv() {
            events.push(event);
        }
        Ok(events.into_iter().filter_map(map_event).collect())
    }

    #[cfg(test)]
    pub fn shutdown_engine(&mut self) {
        self.engine.shutdown();
    }
}

/// The failure to feed back when the engine is gone, so a pending lifecycle still ends.
pub fn engine_lost_msg(lifecycle: &LifecycleState) -> Option<Msg> {
    match lifecycle {
        LifecycleState::Idle => None,
        LifecycleState::Creating => Some(Msg::TaskCreateFailed(SubmitFailure::ServiceBusy)),
        LifecycleState::Polling(handle) => Some(Msg::StatusQueryFailed {
            handle: handle.clone(),
        }),
    }
}

fn create_body(request: SubmissionRequest) -> CreateTaskBody {
    CreateTaskBody {
        user_prompt: request.user_prompt,
        email: request.email,
        language: request.language,
        time_range: request.time_range,
        count_hint: request.count_hint,
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::TaskCreated { task_id } => Some(Msg::TaskCreated {
            handle: TaskHandle::new(task_id),
        }),
        EngineEvent::TaskCreateFailed { error } => {
            Some(Msg::TaskCreateFailed(map_submit_failure(&error)))
        }
        EngineEvent::Status { task_id, payload } => Some(Msg::StatusReceived {
            handle: TaskHandle::new(task_id),
            snapshot: map_snapshot(payload),
        }),
        EngineEvent::StatusFailed { task_id, error } => {
            client_warn!("Task {} status query failed: {}", task_id, error);
            Some(Msg::StatusQueryFailed {
                handle: TaskHandle::new(task_id),
            })
        }
        EngineEvent::PollStopped { task_id, exit } => {
            client_debug!("Poll loop for task {} ended: {:?}", task_id, exit);
            None
        }
    }
}

fn map_submit_failure(error: &ClientError) -> SubmitFailure {
    match error.kind {
        FailureKind::QuotaExceeded => SubmitFailure::QuotaExceeded,
        _ => SubmitFailure::ServiceBusy,
    }
}

fn map_snapshot(payload: TaskStatusPayload) -> TaskStatusSnapshot {
    TaskStatusSnapshot::new(
        TaskStatus::parse(&payload.status),
        clamp_progress(payload.progress.unwrap_or(0.0)),
    )
    .with_error(payload.error)
    .with_step(payload.current_step, payload.step_message)
    .with_artifacts(
        payload
            .artifacts
            .map(|artifacts| Artifacts::new(artifacts.report_pdf_path, artifacts.email_sent_to)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use report_engine::{ArtifactsPayload, PollExit};

    fn payload(status: &str) -> TaskStatusPayload {
        TaskStatusPayload {
            task_id: Some("t1".to_string()),
            status: status.to_string(),
            progress: Some(40.4),
            error: None,
            current_step: Some("search".to_string()),
            step_message: Some(String::new()),
            artifacts: Some(ArtifactsPayload {
                report_pdf_path: Some("/files/t1.pdf".to_string()),
                email_sent_to: None,
            }),
        }
    }

    #[test]
    fn status_payload_maps_to_snapshot() {
        let snapshot = map_snapshot(payload("running"));
        assert_eq!(
            snapshot,
            TaskStatusSnapshot::new(TaskStatus::Running, 40)
                .with_step(Some("search".to_string()), None)
                .with_artifacts(Some(Artifacts::new(Some("/files/t1.pdf".to_string()), None)))
        );
    }

    #[test]
    fn missing_progress_reads_as_zero() {
        let mut raw = payload("queued");
        raw.progress = None;
        assert_eq!(map_snapshot(raw).progress, 0);
    }

    #[test]
    fn only_quota_errors_get_the_quota_message() {
        let quota = ClientError {
            kind: FailureKind::QuotaExceeded,
            message: "429".to_string(),
        };
        assert_eq!(map_submit_failure(&quota), SubmitFailure::QuotaExceeded);
        for kind in [
            FailureKind::HttpStatus(500),
            FailureKind::Network,
            FailureKind::Timeout,
            FailureKind::Decode,
        ] {
            let error = ClientError {
                kind,
                message: String::new(),
            };
            assert_eq!(map_submit_failure(&error), SubmitFailure::ServiceBusy);
        }
    }

    #[test]
    fn engine_events_map_to_messages() {
        assert_eq!(
            map_event(EngineEvent::TaskCreated {
                task_id: "t1".to_string()
            }),
            Some(Msg::TaskCreated {
                handle: TaskHandle::new("t1")
            })
        );
        assert_eq!(
            map_event(EngineEvent::StatusFailed {
                task_id: "t1".to_string(),
                error: ClientError {
                    kind: FailureKind::Network,
                    message: "refused".to_string(),
                },
            }),
            Some(Msg::StatusQueryFailed {
                handle: TaskHandle::new("t1")
            })
        );
        assert_eq!(
            map_event(EngineEvent::PollStopped {
                task_id: "t1".to_string(),
                exit: PollExit::Terminal,
            }),
            None
        );
    }

    #[test]
    fn lost_engine_fails_whatever_is_pending() {
        assert_eq!(engine_lost_msg(&LifecycleState::Idle), None);
        assert_eq!(
            engine_lost_msg(&LifecycleState::Creating),
            Some(Msg::TaskCreateFailed(SubmitFailure::ServiceBusy))
        );
        assert_eq!(
            engine_lost_msg(&LifecycleState::Polling(TaskHandle::new("t1"))),
            Some(Msg::StatusQueryFailed {
                handle: TaskHandle::new("t1")
            })
        );
    }

    #[test]
    fn request_maps_field_for_field() {
        let body = create_body(SubmissionRequest {
            user_prompt: "news".to_string(),
            email: "a@b.com".to_string(),
            language: "Chinese".to_string(),
            time_range: "最近7天內".to_string(),
            count_hint: "5-10篇".to_string(),
        });
        assert_eq!(body.user_prompt, "news");
        assert_eq!(body.email, "a@b.com");
        assert_eq!(body.count_hint, "5-10篇");
    }
}
