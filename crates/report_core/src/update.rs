use crate::{AppState, Effect, Msg, Notice, SubmissionRequest, TaskStatus};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PromptChanged(text) => {
            state.set_prompt(text);
            Vec::new()
        }
        Msg::EmailChanged(text) => {
            state.set_email(text);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // Only one task at a time: the gate stays shut until the machine is Idle again.
            if !state.lifecycle().is_idle() {
                return (state, Vec::new());
            }
            match SubmissionRequest::validate(
                state.prompt(),
                state.email(),
                &state.settings().defaults,
            ) {
                Ok(request) => {
                    state.begin_creating(request.email.clone());
                    vec![Effect::CreateTask(request)]
                }
                Err(err) => {
                    state.reject_input(Notice::Validation(err));
                    Vec::new()
                }
            }
        }
        Msg::TaskCreated { handle } => {
            if !state.is_creating() {
                return (state, Vec::new());
            }
            state.begin_polling(handle.clone());
            vec![Effect::StartPolling { handle }]
        }
        Msg::TaskCreateFailed(failure) => {
            if !state.is_creating() {
                return (state, Vec::new());
            }
            state.finish(Some(Notice::SubmitFailed(failure)));
            Vec::new()
        }
        Msg::StatusReceived { handle, snapshot } => {
            // Late responses for a handle we no longer track are dropped.
            if !state.is_polling(&handle) {
                return (state, Vec::new());
            }
            match snapshot.status {
                TaskStatus::Succeeded => {
                    let delivered_to = snapshot
                        .delivered_to()
                        .unwrap_or_else(|| state.submitted_email())
                        .to_string();
                    state.finish(Some(Notice::Succeeded { delivered_to }));
                    vec![Effect::StopPolling { handle }]
                }
                TaskStatus::Failed => {
                    state.finish(Some(Notice::TaskFailed(snapshot.error)));
                    vec![Effect::StopPolling { handle }]
                }
                TaskStatus::Queued | TaskStatus::Running | TaskStatus::Other(_) => {
                    state.apply_snapshot(snapshot);
                    Vec::new()
                }
            }
        }
        Msg::StatusQueryFailed { handle } => {
            if !state.is_polling(&handle) {
                return (state, Vec::new());
            }
            state.finish(Some(Notice::Unreachable));
            vec![Effect::StopPolling { handle }]
        }
        Msg::Disposed => {
            let active = state.lifecycle().handle().cloned();
            if state.lifecycle().is_idle() {
                return (state, Vec::new());
            }
            state.finish(None);
            active
                .map(|handle| vec![Effect::StopPolling { handle }])
                .unwrap_or_default()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}
