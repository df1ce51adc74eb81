use pretty_assertions::assert_eq;
use report_core::{
    update, AppState, Artifacts, Effect, LifecycleState, Msg, Notice, NoticeKind, TaskHandle,
    TaskStatus, TaskStatusSnapshot,
};

fn init_logging() {
    client_logging::initialize_for_tests();
}

fn polling(handle: &str, email: &str) -> AppState {
    let (state, _) = update(AppState::new(), Msg::PromptChanged("台積電新聞".to_string()));
    let (state, _) = update(state, Msg::EmailChanged(email.to_string()));
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::TaskCreated {
            handle: TaskHandle::new(handle),
        },
    );
    state
}

fn status(state: AppState, handle: &str, snapshot: TaskStatusSnapshot) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::StatusReceived {
            handle: TaskHandle::new(handle),
            snapshot,
        },
    )
}

fn stop(handle: &str) -> Vec<Effect> {
    vec![Effect::StopPolling {
        handle: TaskHandle::new(handle),
    }]
}

#[test]
fn running_snapshot_is_stored_without_effects() {
    init_logging();
    let state = polling("t1", "a@b.com");
    let (mut state, effects) = status(state, "t1", TaskStatusSnapshot::new(TaskStatus::Running, 40));

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert_eq!(
        *state.lifecycle(),
        LifecycleState::Polling(TaskHandle::new("t1"))
    );
    assert_eq!(state.snapshot().unwrap().progress, 40);
    assert_eq!(state.view().progress.unwrap().percent, 40);
}

#[test]
fn each_snapshot_replaces_the_previous_one() {
    init_logging();
    let state = polling("t1", "a@b.com");
    let first = TaskStatusSnapshot::new(TaskStatus::Running, 20).with_step(
        Some("search".to_string()),
        Some("Searching news".to_string()),
    );
    let (state, _) = status(state, "t1", first);
    let (state, _) = status(state, "t1", TaskStatusSnapshot::new(TaskStatus::Running, 60));

    let snapshot = state.snapshot().unwrap();
    assert_eq!(snapshot.progress, 60);
    assert_eq!(snapshot.current_step, None);
    assert_eq!(snapshot.step_message, None);
}

#[test]
fn unknown_status_names_keep_polling() {
    init_logging();
    let state = polling("t1", "a@b.com");
    let (state, effects) = status(
        state,
        "t1",
        TaskStatusSnapshot::new(TaskStatus::parse("rendering_pdf"), 80),
    );
    assert!(effects.is_empty());
    assert!(state.lifecycle().handle().is_some());
    assert_eq!(state.view().progress.unwrap().status_label, "rendering_pdf");
}

#[test]
fn scenario_running_then_succeeded() {
    init_logging();
    let state = polling("t1", "a@b.com");

    let (state, effects) = status(state, "t1", TaskStatusSnapshot::new(TaskStatus::Running, 40));
    assert!(effects.is_empty());
    assert_eq!(state.view().progress.unwrap().percent, 40);
    assert_eq!(state.notice(), None);

    let done = TaskStatusSnapshot::new(TaskStatus::Succeeded, 100).with_artifacts(Some(
        Artifacts::new(None, Some("a@b.com".to_string())),
    ));
    let (state, effects) = status(state, "t1", done);

    assert_eq!(effects, stop("t1"));
    assert_eq!(*state.lifecycle(), LifecycleState::Idle);
    assert_eq!(state.snapshot(), None);
    let view = state.view();
    assert_eq!(view.task_id, None);
    assert!(view.submit.enabled);
    let notice = view.notice.unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert!(notice.text.contains("a@b.com"));
}

#[test]
fn success_without_delivery_address_uses_submitted_email() {
    init_logging();
    let state = polling("t1", "me@example.com");
    // Editing the field mid-task must not change the fallback address.
    let (state, _) = update(state, Msg::EmailChanged("other@example.com".to_string()));
    let (state, _) = status(state, "t1", TaskStatusSnapshot::new(TaskStatus::Succeeded, 100));

    assert_eq!(
        state.notice(),
        Some(&Notice::Succeeded {
            delivered_to: "me@example.com".to_string()
        })
    );
}

#[test]
fn failed_status_surfaces_backend_error_verbatim() {
    init_logging();
    let state = polling("t1", "a@b.com");
    let failed = TaskStatusSnapshot::new(TaskStatus::Failed, 30).with_error(Some("X".to_string()));
    let (state, effects) = status(state, "t1", failed);

    assert_eq!(effects, stop("t1"));
    assert_eq!(*state.lifecycle(), LifecycleState::Idle);
    assert_eq!(state.snapshot(), None);
    assert_eq!(state.view().notice.unwrap().text, "X");
}

#[test]
fn failed_status_without_error_uses_generic_text() {
    init_logging();
    let state = polling("t1", "a@b.com");
    let (state, _) = status(state, "t1", TaskStatusSnapshot::new(TaskStatus::Failed, 30));
    assert_eq!(state.notice(), Some(&Notice::TaskFailed(None)));
    assert!(!state.view().notice.unwrap().text.is_empty());
}

#[test]
fn query_failure_is_a_hard_stop() {
    init_logging();
    let state = polling("t1", "a@b.com");
    let (state, _) = status(state, "t1", TaskStatusSnapshot::new(TaskStatus::Running, 10));
    let (state, effects) = update(
        state,
        Msg::StatusQueryFailed {
            handle: TaskHandle::new("t1"),
        },
    );

    assert_eq!(effects, stop("t1"));
    assert_eq!(*state.lifecycle(), LifecycleState::Idle);
    assert_eq!(state.snapshot(), None);
    assert_eq!(state.notice(), Some(&Notice::Unreachable));
}

#[test]
fn results_for_other_handles_are_ignored() {
    init_logging();
    let state = polling("t2", "a@b.com");
    let (next, effects) = status(
        state.clone(),
        "t1",
        TaskStatusSnapshot::new(TaskStatus::Succeeded, 100),
    );
    assert!(effects.is_empty());
    assert_eq!(next, state);

    let (next, effects) = update(
        state.clone(),
        Msg::StatusQueryFailed {
            handle: TaskHandle::new("t1"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn dispose_while_polling_stops_the_loop() {
    init_logging();
    let state = polling("t1", "a@b.com");
    let (state, _) = status(state, "t1", TaskStatusSnapshot::new(TaskStatus::Running, 10));
    let (state, effects) = update(state, Msg::Disposed);

    assert_eq!(effects, stop("t1"));
    assert_eq!(*state.lifecycle(), LifecycleState::Idle);
    assert_eq!(state.snapshot(), None);

    // Responses still in flight after disposal change nothing.
    let (next, effects) = status(
        state.clone(),
        "t1",
        TaskStatusSnapshot::new(TaskStatus::Succeeded, 100),
    );
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn dispose_while_creating_drops_the_late_handle() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::PromptChanged("news".to_string()));
    let (state, _) = update(state, Msg::EmailChanged("a@b.com".to_string()));
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, effects) = update(state, Msg::Disposed);
    assert!(effects.is_empty());
    assert_eq!(*state.lifecycle(), LifecycleState::Idle);

    let (state, effects) = update(
        state,
        Msg::TaskCreated {
            handle: TaskHandle::new("t1"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(*state.lifecycle(), LifecycleState::Idle);
}

#[test]
fn dispose_when_idle_is_noop() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::Disposed);
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn next_submission_clears_terminal_message() {
    init_logging();
    let state = polling("t1", "a@b.com");
    let (state, _) = status(state, "t1", TaskStatusSnapshot::new(TaskStatus::Succeeded, 100));
    assert!(state.notice().is_some());

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(effects.len(), 1);
    assert_eq!(state.notice(), None);
    assert_eq!(*state.lifecycle(), LifecycleState::Creating);
}

#[test]
fn tick_leaves_idle_and_polling_state_untouched() {
    init_logging();
    let idle = AppState::new();
    let (next, effects) = update(idle.clone(), Msg::Tick);
    assert_eq!(next, idle);
    assert!(effects.is_empty());

    let state = polling("t1", "a@b.com");
    let (next, effects) = update(state.clone(), Msg::Tick);
    assert_eq!(next, state);
    assert!(effects.is_empty());
}
