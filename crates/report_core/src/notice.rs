use crate::ValidationError;

const QUOTA_EXCEEDED_TEXT: &str = "API quota exhausted, please try again later";
const SERVICE_BUSY_TEXT: &str = "Service busy, please try again later";
const UNREACHABLE_TEXT: &str = "Cannot reach the server, check that the backend is running";
const TASK_FAILED_TEXT: &str = "Task failed, please try again later";

/// Why a creation request did not produce a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitFailure {
    QuotaExceeded,
    /// Any other error response, or the request never completed.
    ServiceBusy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

/// The single user-facing message currently shown, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Validation(ValidationError),
    SubmitFailed(SubmitFailure),
    Succeeded { delivered_to: String },
    /// Backend reported `failed`; carries its error text when it sent one.
    TaskFailed(Option<String>),
    Unreachable,
}

impl Notice {
    pub fn kind(&self) -> NoticeKind {
        match self {
            Notice::Succeeded { .. } => NoticeKind::Success,
            _ => NoticeKind::Error,
        }
    }

    pub fn text(&self) -> String {
        match self {
            Notice::Validation(err) => err.to_string(),
            Notice::SubmitFailed(SubmitFailure::QuotaExceeded) => QUOTA_EXCEEDED_TEXT.to_string(),
            Notice::SubmitFailed(SubmitFailure::ServiceBusy) => SERVICE_BUSY_TEXT.to_string(),
            Notice::Succeeded { delivered_to } => {
                format!("All steps complete! Report sent to: {delivered_to}")
            }
            Notice::TaskFailed(Some(text)) => text.clone(),
            Notice::TaskFailed(None) => TASK_FAILED_TEXT.to_string(),
            Notice::Unreachable => UNREACHABLE_TEXT.to_string(),
        }
    }
}
