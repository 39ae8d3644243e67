use common::{Computed, ContestSnapshot, ContestStatus};
use console::style;

use crate::client::{ContestProblemRecord, ContestRecord};

const BAR_WIDTH: usize = 20;

pub fn header(contest: &ContestRecord) -> String {
    format!(
        "{} {}\n  {} -> {}  ({} participants)",
        style(format!("#{}", contest.id)).dim(),
        style(&contest.title).bold(),
        contest.start_time,
        contest.end_time,
        contest.participants,
    )
}

fn status_label(status: Computed<ContestStatus>) -> String {
    let label = format!("{:<9}", status.to_string());
    match status {
        Computed::Valid(ContestStatus::Live) => style(label).green().bold().to_string(),
        Computed::Valid(ContestStatus::Upcoming) => style(label).cyan().to_string(),
        Computed::Valid(ContestStatus::Cancelled) => style(label).red().to_string(),
        Computed::Valid(ContestStatus::Completed) | Computed::Invalid => {
            style(label).dim().to_string()
        }
    }
}

fn progress_bar(progress: Computed<f64>) -> String {
    match progress {
        Computed::Valid(p) => {
            let filled = ((p / 100.0) * BAR_WIDTH as f64).round() as usize;
            let filled = filled.min(BAR_WIDTH);
            format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
        }
        Computed::Invalid => format!("[{}]", "-".repeat(BAR_WIDTH)),
    }
}

/// One-line summary of a snapshot; every field falls back to its
/// placeholder when the contest's timestamps did not parse.
pub fn status_line(snapshot: &Computed<ContestSnapshot>) -> String {
    let (status, time_left, starts_in, progress) = match snapshot {
        Computed::Valid(s) => (
            Computed::Valid(s.status),
            Computed::Valid(s.time_left),
            Computed::Valid(s.starts_in),
            Computed::Valid(s.progress),
        ),
        Computed::Invalid => (
            Computed::Invalid,
            Computed::Invalid,
            Computed::Invalid,
            Computed::Invalid,
        ),
    };

    let countdown = match status {
        Computed::Valid(ContestStatus::Upcoming) => format!("starts in {starts_in}"),
        _ => format!("{time_left} left"),
    };

    format!(
        "{} {}  {} {:>5.1}%",
        status_label(status),
        countdown,
        progress_bar(progress),
        progress,
    )
}

pub fn problems(problems: &[ContestProblemRecord]) -> String {
    if problems.is_empty() {
        return style("  (no problems yet)").dim().to_string();
    }
    problems
        .iter()
        .map(|p| format!("  {:>3}  {}", style(&p.label).bold(), p.problem_title))
        .collect::<Vec<_>>()
        .join("\n")
}
