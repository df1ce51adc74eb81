use std::process::ExitCode;
use std::time::{Duration, Instant};

use chrono::Local;
use client_logging::{client_error, client_info, client_warn};
use log::LevelFilter;
use report_core::{update, AppState, Msg, NoticeKind};
use report_engine::EngineStopped;

use super::cli::{value_or_ask, Args};
use super::config::ClientConfig;
use super::effects::{engine_lost_msg, EffectRunner};
use super::ui;

/// How long one loop iteration waits for engine events before ticking.
const TICK: Duration = Duration::from_millis(75);

pub fn run_app(args: Args) -> anyhow::Result<ExitCode> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    client_logging::initialize(
        args.log.into(),
        level,
        &client_logging::default_log_file(),
    );

    let config = ClientConfig::load(args.config.as_deref())?.with_tasks_base(args.tasks_base);
    let form_settings = config.form_settings()?;
    let runner = EffectRunner::new(config.client_settings())?;

    let prompt = value_or_ask(args.prompt, "Search requirement")?;
    let email = value_or_ask(args.email, "Recipient email")?;
    let deadline = args
        .timeout_secs
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    let mut session = Session::new(AppState::with_settings(form_settings), runner);
    session.dispatch(Msg::PromptChanged(prompt));
    session.dispatch(Msg::EmailChanged(email));
    session.dispatch(Msg::SubmitClicked);

    if session.run_until_idle(deadline) == SessionEnd::TimedOut {
        println!("Stopped tracking the task (timeout).");
        return Ok(ExitCode::from(2));
    }

    let code = match session.state.notice().map(|notice| notice.kind()) {
        Some(NoticeKind::Success) => ExitCode::SUCCESS,
        Some(NoticeKind::Error) | None => ExitCode::FAILURE,
    };
    client_info!("Session finished");
    Ok(code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Finished,
    TimedOut,
}

/// One report form bound to one engine. Dropping it tears the view down.
struct Session {
    state: AppState,
    runner: EffectRunner,
    last_frame: Vec<String>,
}

impl Session {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self {
            state,
            runner,
            last_frame: Vec::new(),
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.render(&state);
        }
        self.state = state;
        if let Err(err) = self.runner.enqueue(effects) {
            self.engine_lost(err);
        }
    }

    /// Delivers whatever the engine produced within `timeout`, then ticks.
    fn pump(&mut self, timeout: Duration) {
        match self.runner.poll_messages(timeout) {
            Ok(messages) => {
                for msg in messages {
                    self.dispatch(msg);
                }
            }
            Err(err) => self.engine_lost(err),
        }
        self.dispatch(Msg::Tick);
    }

    /// Pumps until the form is idle again, or disposes it once `deadline` passes.
    fn run_until_idle(&mut self, deadline: Option<Instant>) -> SessionEnd {
        while !self.state.lifecycle().is_idle() {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                client_warn!("Timed out waiting for the task, stopping");
                self.dispatch(Msg::Disposed);
                return SessionEnd::TimedOut;
            }
            self.pump(TICK);
        }
        SessionEnd::Finished
    }

    fn engine_lost(&mut self, err: EngineStopped) {
        // The failure lands in Idle, so a second loss while enqueueing its StopPolling maps to nothing.
        if let Some(msg) = engine_lost_msg(self.state.lifecycle()) {
            client_error!("{}, abandoning {:?}", err, self.state.lifecycle());
            self.dispatch(msg);
        }
    }

    fn render(&mut self, state: &AppState) {
        let frame = ui::render::render(&state.view());
        if frame == self.last_frame {
            return;
        }
        let stamp = Local::now().format("%H:%M:%S");
        println!("--- {stamp}");
        for line in &frame {
            println!("{line}");
        }
        self.last_frame = frame;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Stop any poll loop still owned by this view before the engine goes away.
        if !self.state.lifecycle().is_idle() {
            self.dispatch(Msg::Disposed);
        }
    }
}
