//! Log parsing: turn raw `act` output into a [`Failure`].
//!
//! Parsing is a single pass over the text for each field; nothing is carried
//! between calls. [`classify`] decides whether the log describes a failure at
//! all, and the extractors in [`extract`] fill in the rest of the record.

use itertools::Itertools;

use crate::failure::Failure;

pub use classify::{FAILURE_PATTERNS, SUCCESS_PATTERNS, classify};

mod classify;
pub mod extract;

/// Workflow, job and step names used when the log doesn't carry them.
pub const UNKNOWN: &str = "unknown";

/// Message used when no line in the log looks like an error.
pub const NO_MESSAGE: &str = "No error message found";

/// Parse an `act` log into a [`Failure`].
///
/// If `workflow` is provided it is used as-is; otherwise the workflow name is
/// taken from the log. Returns `None` if the log doesn't describe a failure.
#[tracing::instrument(skip(log), fields(log_len = log.len()))]
pub fn parse(log: &str, workflow: Option<&str>) -> Option<Failure> {
    let Some(kind) = classify(log) else {
        tracing::debug!("no failure pattern matched");
        return None;
    };

    let lines = log.split('\n').collect_vec();
    let workflow = match workflow {
        Some(workflow) if !workflow.is_empty() => workflow.to_string(),
        _ => extract::workflow_name(&lines),
    };
    let (job, step) = extract::job_step(&lines);
    let (file_path, line_number) = extract::location(&lines).unzip();

    let failure = Failure::builder()
        .workflow(workflow)
        .job(job)
        .step(step)
        .kind(kind)
        .message(extract::error_message(&lines))
        .maybe_file_path(file_path)
        .maybe_line_number(line_number.flatten())
        .maybe_stack_trace(extract::stack_trace(&lines))
        .maybe_duration(extract::duration(&lines))
        .build();

    tracing::debug!(?failure, "parsed failure");
    Some(failure)
}
