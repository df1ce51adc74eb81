//! Report engine: task-service HTTP client, poll loop and effect execution.
mod client;
mod engine;
mod poller;
mod types;

pub use client::{ClientSettings, ReqwestTaskApi, TaskApi};
pub use engine::EngineHandle;
pub use poller::{run_poll_loop, ChannelEventSink, EventSink, PollExit, PollGuard};
pub use types::{
    is_quota_error, ArtifactsPayload, ClientError, CreateTaskBody, CreateTaskResponse,
    EngineEvent, EngineStopped, FailureKind, TaskStatusPayload,
};
