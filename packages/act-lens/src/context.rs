//! Source context around a failure location.

use std::fs::read_to_string;
use std::path::Path;

use crate::failure::Failure;

/// Default number of lines shown on either side of the failing line.
pub const DEFAULT_RADIUS: usize = 3;

/// Read up to `radius` lines either side of `line` (1-indexed) from `file`.
///
/// Relative paths are resolved against `root`. Each returned line is prefixed
/// with its line number; the failing line is marked with `>`. Files that can't
/// be read, and lines past the end of the file, produce no context.
#[tracing::instrument]
pub fn read_context(root: &Path, file: &str, line: u32, radius: usize) -> Vec<String> {
    let path = root.join(file);
    let content = match read_to_string(&path) {
        Ok(content) => content,
        Err(error) => {
            tracing::debug!(?error, ?path, "source not readable, skipping context");
            return Vec::new();
        }
    };

    let lines = content.lines().collect::<Vec<_>>();
    let target = line as usize;
    if target == 0 || target > lines.len() {
        tracing::debug!(target, total = lines.len(), "line outside of file");
        return Vec::new();
    }

    let start = target.saturating_sub(radius).max(1);
    let end = (target + radius).min(lines.len());
    let width = end.to_string().len();

    (start..=end)
        .map(|number| {
            let marker = if number == target { ">" } else { " " };
            let text = lines[number - 1];
            format!("{marker} {number:>width$} | {text}")
        })
        .collect()
}

/// Fill in a failure's context lines from its source file, if the location is known.
///
/// Leaves the failure untouched when it has no line number, already carries
/// context, or `radius` is zero.
pub fn attach(failure: &mut Failure, root: &Path, radius: usize) {
    if radius == 0 || !failure.context_lines.is_empty() {
        return;
    }
    if let (Some(file), Some(line)) = (failure.file_path.as_deref(), failure.line_number) {
        failure.context_lines = read_context(root, file, line, radius);
    }
}
