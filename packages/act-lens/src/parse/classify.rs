//! Failure classification by pattern priority.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::failure::FailureKind;

/// Failure patterns in priority order; the first match wins.
///
/// These are matched case-insensitively against the whole log.
pub const FAILURE_PATTERNS: &[(&str, FailureKind)] = &[
    (r"AssertionError", FailureKind::Assertion),
    (r"TimeoutError|timed out", FailureKind::Timeout),
    (r"SyntaxError", FailureKind::Syntax),
    (r"ImportError|ModuleNotFoundError", FailureKind::Import),
    (r"AttributeError", FailureKind::Attribute),
    (r"TypeError", FailureKind::Type),
    (r"ValueError", FailureKind::Value),
    (r"KeyError", FailureKind::Key),
    (r"IndexError", FailureKind::Index),
    (r"FileNotFoundError", FailureKind::FileNotFound),
    (r"PermissionError", FailureKind::Permission),
    (
        r"❌\s*(Failure|failed)|Error: Process completed with exit code [1-9]",
        FailureKind::BuildFailure,
    ),
    (r"Error:", FailureKind::Unknown),
];

/// Markers of a successful run. Matched case-sensitively.
pub const SUCCESS_PATTERNS: &[&str] = &[
    r"✅.*Success",
    r"All checks passed",
    r"Success: no issues found",
];

/// Evidence that a run really failed even though success markers are present.
const FAILURE_EVIDENCE: &str = r"exit code [1-9]|❌.*failed";

static FAILURES: LazyLock<Vec<(Regex, FailureKind)>> = LazyLock::new(|| {
    FAILURE_PATTERNS
        .iter()
        .map(|(pattern, kind)| {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("compile failure pattern");
            (regex, *kind)
        })
        .collect()
});

static SUCCESSES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SUCCESS_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).expect("compile success pattern"))
        .collect()
});

static EVIDENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FAILURE_EVIDENCE).expect("compile failure evidence pattern"));

/// Classify a log, returning the highest priority [`FailureKind`] it matches.
///
/// A bare `Error:` line is ambiguous: `act` prints one for jobs it reports as
/// successful too. A [`FailureKind::Unknown`] match is therefore dropped when
/// the log carries success markers and no exit code or failure marker backs it
/// up. Every other kind is reported regardless of success markers.
#[tracing::instrument(skip_all)]
pub fn classify(log: &str) -> Option<FailureKind> {
    for (pattern, kind) in FAILURES.iter() {
        if !pattern.is_match(log) {
            continue;
        }

        if *kind == FailureKind::Unknown && looks_successful(log) {
            tracing::debug!("ignoring generic error in a successful run");
            continue;
        }

        tracing::debug!(%kind, pattern = pattern.as_str(), "classified log");
        return Some(*kind);
    }

    None
}

fn looks_successful(log: &str) -> bool {
    SUCCESSES.iter().any(|pattern| pattern.is_match(log)) && !EVIDENCE.is_match(log)
}
