//! The failure record extracted from an `act` log.

use std::str::FromStr;

use bon::Builder;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_plain::derive_display_from_serialize;

/// The class of failure detected in a log.
///
/// Displays as the upper-case name used in reports, e.g. `BUILD_FAILURE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    Assertion,
    Timeout,
    Syntax,
    Import,
    Attribute,
    Type,
    Value,
    Key,
    Index,
    FileNotFound,
    Permission,
    BuildFailure,
    Unknown,
}

derive_display_from_serialize!(FailureKind);

/// Parsing ignores case: `assertion`, `Assertion` and `ASSERTION` are the same kind.
impl FromStr for FailureKind {
    type Err = serde_plain::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_plain::from_str(&s.trim().to_uppercase())
    }
}

/// Everything we know about a failed workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
pub struct Failure {
    /// Workflow file or workflow name, e.g. `ci.yml`.
    #[builder(into)]
    pub workflow: String,

    /// Job name as printed by `act`, e.g. `CI/test`.
    #[builder(into)]
    pub job: String,

    /// Step name, e.g. `❌  Failure - Main Run tests`.
    #[builder(into)]
    pub step: String,

    /// When the failure was recorded.
    #[builder(default = Local::now())]
    pub timestamp: DateTime<Local>,

    /// Run time in seconds, if `act` reported one.
    pub duration: Option<f64>,

    #[serde(rename = "error_type")]
    pub kind: FailureKind,

    #[builder(into)]
    pub message: String,

    #[builder(into)]
    pub file_path: Option<String>,

    /// 1-indexed; never zero.
    pub line_number: Option<u32>,

    /// Source lines around the failure location.
    #[builder(default)]
    pub context_lines: Vec<String>,

    #[builder(into)]
    pub stack_trace: Option<String>,
}

impl Failure {
    /// Human readable run time: `45.0s` below a minute, `2m 5s` above.
    ///
    /// A missing duration renders as `0.0s`.
    pub fn format_duration(&self) -> String {
        let duration = self.duration.unwrap_or_default().max(0.0);
        if duration < 60.0 {
            return format!("{duration:.1}s");
        }

        let minutes = (duration / 60.0).floor() as u64;
        let seconds = (duration % 60.0).floor() as u64;
        format!("{minutes}m {seconds}s")
    }

    /// The failure location as `path:line`, or just `path` if the line is unknown.
    pub fn location(&self) -> Option<String> {
        let path = self.file_path.as_deref()?;
        match self.line_number {
            Some(line) if line > 0 => Some(format!("{path}:{line}")),
            _ => Some(path.to_string()),
        }
    }
}
