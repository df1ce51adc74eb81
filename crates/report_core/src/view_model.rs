use url::Url;

use crate::{is_valid_email, AppState, LifecycleState, NoticeKind, TaskStatusSnapshot};

const LABEL_IDLE: &str = "Generate report";
const LABEL_CREATING: &str = "Creating task...";
const LABEL_POLLING: &str = "Generating...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButtonView {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub status_label: String,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPanelView {
    pub step: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLinkView {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    pub kind: NoticeKind,
    pub text: String,
}

/// Everything a renderer needs for the report form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFormViewModel {
    pub task_id: Option<String>,
    pub submit: SubmitButtonView,
    /// Non-empty email that would fail validation.
    pub email_format_warning: bool,
    pub progress: Option<ProgressView>,
    pub step: Option<StepPanelView>,
    pub download: Option<DownloadLinkView>,
    pub notice: Option<NoticeView>,
}

pub(crate) fn project(state: &AppState) -> ReportFormViewModel {
    let lifecycle = state.lifecycle();
    let snapshot = state.snapshot();
    let email = state.email();

    ReportFormViewModel {
        task_id: lifecycle.handle().map(|handle| handle.to_string()),
        submit: submit_button(lifecycle),
        email_format_warning: !email.trim().is_empty() && !is_valid_email(email),
        progress: snapshot.map(progress_view),
        step: snapshot.and_then(step_panel),
        download: snapshot
            .and_then(TaskStatusSnapshot::report_path)
            .map(|path| DownloadLinkView {
                href: resolve_artifact_url(&state.settings().service_origin, path),
            }),
        notice: state.notice().map(|notice| NoticeView {
            kind: notice.kind(),
            text: notice.text(),
        }),
    }
}

/// Resolves a backend artifact path against the task-service origin.
pub fn resolve_artifact_url(origin: &str, path: &str) -> String {
    match Url::parse(origin).and_then(|base| base.join(path)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}/{}", origin.trim_end_matches('/'), path.trim_start_matches('/')),
    }
}

fn submit_button(lifecycle: &LifecycleState) -> SubmitButtonView {
    match lifecycle {
        LifecycleState::Idle => SubmitButtonView {
            label: LABEL_IDLE,
            enabled: true,
        },
        LifecycleState::Creating => SubmitButtonView {
            label: LABEL_CREATING,
            enabled: false,
        },
        LifecycleState::Polling(_) => SubmitButtonView {
            label: LABEL_POLLING,
            enabled: false,
        },
    }
}

fn progress_view(snapshot: &TaskStatusSnapshot) -> ProgressView {
    ProgressView {
        status_label: snapshot.status.as_str().to_string(),
        percent: snapshot.progress,
    }
}

fn step_panel(snapshot: &TaskStatusSnapshot) -> Option<StepPanelView> {
    if snapshot.current_step.is_none() && snapshot.step_message.is_none() {
        return None;
    }
    Some(StepPanelView {
        step: snapshot.current_step.clone(),
        message: snapshot.step_message.clone(),
    })
}
