use crate::view_model::{self, ReportFormViewModel};
use crate::{Notice, ReportDefaults, TaskHandle, TaskStatusSnapshot};

/// Origin used to resolve relative artifact paths when none is configured.
pub const DEFAULT_SERVICE_ORIGIN: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Creating,
    Polling(TaskHandle),
}

impl LifecycleState {
    pub fn is_idle(&self) -> bool {
        matches!(self, LifecycleState::Idle)
    }

    pub fn handle(&self) -> Option<&TaskHandle> {
        match self {
            LifecycleState::Polling(handle) => Some(handle),
            LifecycleState::Idle | LifecycleState::Creating => None,
        }
    }

    fn is_polling(&self, handle: &TaskHandle) -> bool {
        self.handle() == Some(handle)
    }
}

/// Per-view settings fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSettings {
    pub defaults: ReportDefaults,
    /// Scheme, host and port of the task service; artifact paths resolve against it.
    pub service_origin: String,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            defaults: ReportDefaults::default(),
            service_origin: DEFAULT_SERVICE_ORIGIN.to_string(),
        }
    }
}

/// Lifecycle state of one report form. Construct one per view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    settings: FormSettings,
    prompt: String,
    email: String,
    lifecycle: LifecycleState,
    snapshot: Option<TaskStatusSnapshot>,
    notice: Option<Notice>,
    /// Email used for the in-flight submission; fallback delivery address.
    submitted_email: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: FormSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn view(&self) -> ReportFormViewModel {
        view_model::project(self)
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn lifecycle(&self) -> &LifecycleState {
        &self.lifecycle
    }

    pub fn snapshot(&self) -> Option<&TaskStatusSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_prompt(&mut self, prompt: String) {
        if self.prompt != prompt {
            self.prompt = prompt;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_email(&mut self, email: String) {
        if self.email != email {
            self.email = email;
            self.mark_dirty();
        }
    }

    pub(crate) fn reject_input(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    /// Idle -> Creating. Clears the previous notice and snapshot.
    pub(crate) fn begin_creating(&mut self, email: String) {
        self.lifecycle = LifecycleState::Creating;
        self.notice = None;
        self.snapshot = None;
        self.submitted_email = Some(email);
        self.mark_dirty();
    }

    pub(crate) fn is_creating(&self) -> bool {
        self.lifecycle == LifecycleState::Creating
    }

    pub(crate) fn is_polling(&self, handle: &TaskHandle) -> bool {
        self.lifecycle.is_polling(handle)
    }

    /// Creating -> Polling(handle).
    pub(crate) fn begin_polling(&mut self, handle: TaskHandle) {
        self.lifecycle = LifecycleState::Polling(handle);
        self.mark_dirty();
    }

    pub(crate) fn apply_snapshot(&mut self, snapshot: TaskStatusSnapshot) {
        self.snapshot = Some(snapshot);
        self.mark_dirty();
    }

    pub(crate) fn submitted_email(&self) -> &str {
        self.submitted_email.as_deref().unwrap_or(&self.email)
    }

    /// Any state -> Idle, dropping handle and snapshot. `notice` replaces the current one.
    pub(crate) fn finish(&mut self, notice: Option<Notice>) {
        self.lifecycle = LifecycleState::Idle;
        self.snapshot = None;
        self.submitted_email = None;
        if notice.is_some() {
            self.notice = notice;
        }
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
