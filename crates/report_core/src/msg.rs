#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the search requirement.
    PromptChanged(String),
    /// User edited the recipient email.
    EmailChanged(String),
    /// User clicked Generate.
    SubmitClicked,
    /// Backend accepted the job.
    TaskCreated { handle: crate::TaskHandle },
    /// Job creation failed (error response or transport failure).
    TaskCreateFailed(crate::SubmitFailure),
    /// One poll tick returned a status payload.
    StatusReceived {
        handle: crate::TaskHandle,
        snapshot: crate::TaskStatusSnapshot,
    },
    /// One poll tick could not get a status payload.
    StatusQueryFailed { handle: crate::TaskHandle },
    /// The consuming view is being torn down.
    Disposed,
    /// UI/render tick to coalesce rendering.
    Tick,
}
