//! Markdown rendering of a [`Failure`], formatted for pasting into an AI chat.

use std::path::Path;

use itertools::Itertools;

use crate::failure::Failure;

/// Timestamp format used in the report header.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a failure as a Markdown report.
///
/// Sections are separated by a blank line; sections with nothing to show
/// (source context, stack trace) are left out entirely.
#[tracing::instrument(skip_all, fields(kind = %failure.kind))]
pub fn render(failure: &Failure) -> String {
    [
        Some(header(failure)),
        Some(summary(failure)),
        details(failure),
        stack_trace(failure),
    ]
    .into_iter()
    .flatten()
    .join("\n\n")
}

fn header(failure: &Failure) -> String {
    format!(
        "## 🔍 Act-Lens Failure Report\n\n\
         **Workflow**: {} → {} → {}\n\
         **Failed at**: {}\n\
         **Duration**: {}",
        failure.workflow,
        failure.job,
        failure.step,
        failure.timestamp.format(TIMESTAMP_FORMAT),
        failure.format_duration(),
    )
}

fn summary(failure: &Failure) -> String {
    let mut lines = vec![
        String::from("### Error Summary"),
        format!("- Type: `{}`", failure.kind),
    ];
    if let Some(location) = failure.location() {
        lines.push(format!("- Location: `{location}`"));
    }
    lines.push(format!("- Message: {}", failure.message));
    lines.join("\n")
}

fn details(failure: &Failure) -> Option<String> {
    if failure.context_lines.is_empty() {
        return None;
    }

    let language = failure
        .file_path
        .as_deref()
        .map(fence_language)
        .unwrap_or_default();

    let body = failure.context_lines.join("\n");
    Some(format!("### Error Details\n```{language}\n{body}\n```"))
}

fn stack_trace(failure: &Failure) -> Option<String> {
    let trace = failure.stack_trace.as_deref()?;
    Some(format!("### Stack Trace\n```\n{trace}\n```"))
}

/// The code fence language for a source file, by extension.
fn fence_language(file: &str) -> &'static str {
    let extension = Path::new(file)
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default();

    match extension {
        "py" => "python",
        "rs" => "rust",
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "go" => "go",
        "sh" | "bash" => "shell",
        "yml" | "yaml" => "yaml",
        _ => "",
    }
}
