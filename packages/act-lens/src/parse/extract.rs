//! Field extractors over the lines of an `act` log.
//!
//! Each extractor is independent and scans the lines once. Lines are expected
//! to be the log split on `\n`, with `act`'s `[workflow/job]` prefixes intact.

use std::sync::LazyLock;

use regex::Regex;

use super::{NO_MESSAGE, UNKNOWN};

static WORKFLOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^/\]]+)/").expect("compile workflow pattern"));

static JOB_STEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\s+(.+)").expect("compile job/step pattern"));

static PYTHON_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"File "([^"]+)", line (\d+)"#).expect("compile python frame pattern")
});

static RUST_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:-->\s*|panicked at (?:'.*', )?)([^\s:']+):(\d+):\d+")
        .expect("compile rust location pattern")
});

static MILLISECONDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d+\.?\d*)(ms|milliseconds?)\]").expect("compile milliseconds pattern")
});

static SECONDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d+\.?\d*)(s|seconds?)\]").expect("compile seconds pattern")
});

static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)m\s*(\d+)s\]").expect("compile minutes pattern"));

/// Substrings that mark a line as the error message candidate.
const MESSAGE_KEYWORDS: &[&str] = &["Error", "FAILED", "Failure", "❌"];

/// The workflow name from the first `[<workflow>/<job>]` prefix in the log.
pub fn workflow_name(lines: &[&str]) -> String {
    lines
        .iter()
        .find_map(|line| WORKFLOW.captures(line))
        .map(|captures| captures[1].to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// The last line that looks like an error, trimmed.
pub fn error_message(lines: &[&str]) -> String {
    lines
        .iter()
        .rev()
        .find(|line| MESSAGE_KEYWORDS.iter().any(|keyword| line.contains(keyword)))
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| NO_MESSAGE.to_string())
}

/// The file and line of the failure.
///
/// Python traceback frames are preferred over Rust diagnostics; within each
/// style the first occurrence wins. A line number of zero (or one that doesn't
/// fit a `u32`) is reported as unknown, but the file is still returned.
pub fn location(lines: &[&str]) -> Option<(String, Option<u32>)> {
    let captures = lines
        .iter()
        .find_map(|line| PYTHON_FRAME.captures(line))
        .or_else(|| lines.iter().find_map(|line| RUST_LOCATION.captures(line)))?;

    let line_number = captures[2].parse::<u32>().ok().filter(|&line| line > 0);
    Some((captures[1].to_string(), line_number))
}

/// The stack trace starting at a `Traceback` header.
///
/// Collection ends, inclusively, at the first non-blank line that isn't
/// indented and contains a `:` (the exception line, e.g. `ValueError: ...`).
/// Another `Traceback` seen before that restarts collection. Returns `None` if
/// nothing beyond the header was collected.
pub fn stack_trace(lines: &[&str]) -> Option<String> {
    let mut trace = Vec::new();
    let mut in_trace = false;

    for &line in lines {
        if line.contains("Traceback") {
            in_trace = true;
            trace = vec![line];
            continue;
        }

        if in_trace {
            trace.push(line);
            if !line.trim().is_empty() && !line.starts_with(' ') && line.contains(':') {
                break;
            }
        }
    }

    (trace.len() > 1).then(|| trace.join("\n"))
}

/// The job and step from the last `[<job>] <step>` line.
pub fn job_step(lines: &[&str]) -> (String, String) {
    lines
        .iter()
        .rev()
        .find_map(|line| JOB_STEP.captures(line))
        .map(|captures| (captures[1].to_string(), captures[2].trim().to_string()))
        .unwrap_or_else(|| (UNKNOWN.to_string(), UNKNOWN.to_string()))
}

/// Run time in seconds from the last line carrying an `act` timing suffix.
///
/// Recognizes `[106.8ms]`, `[9.98s]` and `[2m 30s]`.
pub fn duration(lines: &[&str]) -> Option<f64> {
    lines.iter().rev().find_map(|line| line_duration(line))
}

fn line_duration(line: &str) -> Option<f64> {
    if let Some(captures) = MILLISECONDS.captures(line) {
        return captures[1].parse::<f64>().ok().map(|ms| ms / 1000.0);
    }
    if let Some(captures) = SECONDS.captures(line) {
        return captures[1].parse::<f64>().ok();
    }
    if let Some(captures) = MINUTES.captures(line) {
        let minutes = captures[1].parse::<f64>().ok()?;
        let seconds = captures[2].parse::<f64>().ok()?;
        return Some(minutes * 60.0 + seconds);
    }
    None
}
