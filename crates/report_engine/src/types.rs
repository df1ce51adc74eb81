use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::PollExit;

/// `POST <tasks-base>/news-report` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTaskBody {
    pub user_prompt: String,
    pub email: String,
    pub language: String,
    pub time_range: String,
    pub count_hint: String,
}

/// `POST <tasks-base>/news-report` success body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTaskResponse {
    pub task_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET <tasks-base>/{task_id}` body. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskStatusPayload {
    #[serde(default)]
    pub task_id: Option<String>,
    /// Empty when the body omits it, which reads as a non-terminal status.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(default)]
    pub step_message: Option<String>,
    #[serde(default)]
    pub artifacts: Option<ArtifactsPayload>,
}

impl TaskStatusPayload {
    /// `succeeded` and `failed` end a task; every other name keeps polling.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ArtifactsPayload {
    #[serde(default)]
    pub report_pdf_path: Option<String>,
    #[serde(default)]
    pub email_sent_to: Option<String>,
}

/// The engine worker thread has exited; no command will run and no event will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("report engine has stopped")]
pub struct EngineStopped;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    TaskCreated {
        task_id: String,
    },
    TaskCreateFailed {
        error: ClientError,
    },
    Status {
        task_id: String,
        payload: TaskStatusPayload,
    },
    StatusFailed {
        task_id: String,
        error: ClientError,
    },
    PollStopped {
        task_id: String,
        exit: PollExit,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    /// Error response whose structured detail mentions the quota.
    QuotaExceeded,
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::QuotaExceeded => write!(f, "quota exceeded"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "invalid response body"),
        }
    }
}

/// Looks for `detail[0].msg` containing `quota` in an error body.
///
/// Anything that is not JSON, or lacks that shape, is simply not a quota error.
pub fn is_quota_error(body: &[u8]) -> bool {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return false;
    };
    value
        .get("detail")
        .and_then(|detail| detail.get(0))
        .and_then(|entry| entry.get("msg"))
        .and_then(Value::as_str)
        .is_some_and(|msg| msg.contains("quota"))
}
