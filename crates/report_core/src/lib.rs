//! Report core: pure task-lifecycle state machine and view-model projection.
mod effect;
mod msg;
mod notice;
mod request;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use notice::{Notice, NoticeKind, SubmitFailure};
pub use request::{is_valid_email, ReportDefaults, SubmissionRequest, ValidationError};
pub use state::{AppState, FormSettings, LifecycleState, DEFAULT_SERVICE_ORIGIN};
pub use status::{clamp_progress, Artifacts, TaskHandle, TaskStatus, TaskStatusSnapshot};
pub use update::update;
pub use view_model::{
    resolve_artifact_url, DownloadLinkView, NoticeView, ProgressView, ReportFormViewModel,
    StepPanelView, SubmitButtonView,
};
