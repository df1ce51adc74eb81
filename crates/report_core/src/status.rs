use std::fmt;

/// Opaque backend identifier for one report task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskHandle(String);

impl TaskHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend status vocabulary. Unknown names are kept and treated as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
    Other(String),
}

impl TaskStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => TaskStatus::Queued,
            "running" => TaskStatus::Running,
            "succeeded" => TaskStatus::Succeeded,
            "failed" => TaskStatus::Failed,
            other => TaskStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Queued => "queued",
            TaskStatus::Running => "running",
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
            TaskStatus::Other(name) => name,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

/// Byproducts reported by the backend. Empty strings are stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Artifacts {
    pub report_pdf_path: Option<String>,
    pub email_sent_to: Option<String>,
}

impl Artifacts {
    pub fn new(report_pdf_path: Option<String>, email_sent_to: Option<String>) -> Self {
        Self {
            report_pdf_path: non_empty(report_pdf_path),
            email_sent_to: non_empty(email_sent_to),
        }
    }
}

/// Latest status payload for the active handle. Each poll replaces it whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatusSnapshot {
    pub status: TaskStatus,
    pub progress: u8,
    pub error: Option<String>,
    pub current_step: Option<String>,
    pub step_message: Option<String>,
    pub artifacts: Option<Artifacts>,
}

impl TaskStatusSnapshot {
    pub fn new(status: TaskStatus, progress: u8) -> Self {
        Self {
            status,
            progress: progress.min(100),
            error: None,
            current_step: None,
            step_message: None,
            artifacts: None,
        }
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = non_empty(error);
        self
    }

    pub fn with_step(mut self, current_step: Option<String>, step_message: Option<String>) -> Self {
        self.current_step = non_empty(current_step);
        self.step_message = non_empty(step_message);
        self
    }

    pub fn with_artifacts(mut self, artifacts: Option<Artifacts>) -> Self {
        self.artifacts = artifacts;
        self
    }

    pub(crate) fn report_path(&self) -> Option<&str> {
        self.artifacts
            .as_ref()
            .and_then(|artifacts| artifacts.report_pdf_path.as_deref())
    }

    pub(crate) fn delivered_to(&self) -> Option<&str> {
        self.artifacts
            .as_ref()
            .and_then(|artifacts| artifacts.email_sent_to.as_deref())
    }
}

/// Maps a raw backend progress number onto 0..=100.
pub fn clamp_progress(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u8
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
