use report_core::{NoticeKind, ReportFormViewModel};

use super::constants::*;

/// Renders the form view model as terminal lines.
pub fn render(view: &ReportFormViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let button = if view.submit.enabled {
        format!("[ {} ]", view.submit.label)
    } else {
        format!("( {} )", view.submit.label)
    };
    match &view.task_id {
        Some(task_id) => lines.push(format!("{button}  task {task_id}")),
        None => lines.push(button),
    }

    if view.email_format_warning {
        lines.push("! Email address looks malformed".to_string());
    }

    if let Some(progress) = &view.progress {
        lines.push(format!(
            "{} {:>3}%  {}",
            progress_bar(progress.percent),
            progress.percent,
            progress.status_label
        ));
    }

    if let Some(step) = &view.step {
        if let Some(name) = &step.step {
            lines.push(format!("Step: {name}"));
        }
        if let Some(message) = &step.message {
            lines.extend(
                message
                    .lines()
                    .map(|line| format!("{STEP_MESSAGE_INDENT}{line}")),
            );
        }
    }

    if let Some(download) = &view.download {
        lines.push(format!("Report PDF: {}", download.href));
    }

    if let Some(notice) = &view.notice {
        let marker = match notice.kind {
            NoticeKind::Success => "OK",
            NoticeKind::Error => "ERR",
        };
        lines.push(format!("{marker}: {}", notice.text));
    }

    lines
}

fn progress_bar(percent: u8) -> String {
    let percent = usize::from(percent.min(100));
    let filled = percent * PROGRESS_BAR_WIDTH / 100;
    let mut bar = String::with_capacity(PROGRESS_BAR_WIDTH + 2);
    bar.push('[');
    bar.extend(std::iter::repeat(PROGRESS_FILLED).take(filled));
    bar.extend(std::iter::repeat(PROGRESS_EMPTY).take(PROGRESS_BAR_WIDTH - filled));
    bar.push(']');
    bar
}
