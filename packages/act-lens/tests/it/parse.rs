use pretty_assertions::assert_eq as pretty_assert_eq;

use crate::{NOISY_SUCCESS_LOG, PYTEST_FAILURE_LOG, Project};

#[test]
fn test_parse_log_file_renders_markdown() {
    let project = Project::new();
    project.write("act.log", PYTEST_FAILURE_LOG);

    let output = project.act_lens(&["parse", "act.log"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.starts_with("## 🔍 Act-Lens Failure Report\n"), "{}", output.stdout);
    assert!(output.stdout.contains("**Workflow**: CI → "), "{}", output.stdout);
    assert!(output.stdout.contains("**Duration**: 2m 5s"), "{}", output.stdout);
    assert!(output.stdout.contains("- Type: `ASSERTION`"), "{}", output.stdout);
    assert!(output.stdout.contains("- Location: `tests/test_math.py:3`"), "{}", output.stdout);
    assert!(output.stdout.contains("### Stack Trace"), "{}", output.stdout);
    assert!(output.stdout.contains("AssertionError: expected 6"), "{}", output.stdout);

    // The source file isn't in the project, so there is nothing to show.
    assert!(!output.stdout.contains("### Error Details"), "{}", output.stdout);
}

#[test]
fn test_parse_includes_source_context() {
    let project = Project::new();
    project.write("act.log", PYTEST_FAILURE_LOG);
    project.write(
        "tests/test_math.py",
        "from calc import add\n\ndef test_add():\n    assert add(2, 3) == 6\n",
    );

    let output = project.act_lens(&["parse", "act.log"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("### Error Details\n```python\n"), "{}", output.stdout);
    assert!(output.stdout.contains("> 3 | def test_add():"), "{}", output.stdout);
    assert!(output.stdout.contains("  1 | from calc import add"), "{}", output.stdout);
}

#[test]
fn test_parse_workflow_override() {
    let project = Project::new();
    project.write("act.log", PYTEST_FAILURE_LOG);

    let output = project.act_lens(&["parse", "act.log", "--workflow", "nightly.yml"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("**Workflow**: nightly.yml → "), "{}", output.stdout);
}

#[test]
fn test_parse_json() {
    let project = Project::new();
    project.write("act.log", PYTEST_FAILURE_LOG);

    let output = project.act_lens(&["parse", "act.log", "--json"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);

    let failure: serde_json::Value =
        serde_json::from_str(&output.stdout).expect("parse json output");
    pretty_assert_eq!(failure["workflow"], "CI");
    pretty_assert_eq!(failure["error_type"], "ASSERTION");
    pretty_assert_eq!(failure["file_path"], "tests/test_math.py");
    pretty_assert_eq!(failure["line_number"], 3);
    pretty_assert_eq!(failure["duration"], 125.0);
}

#[test]
fn test_parse_reads_stdin() {
    let project = Project::new();

    let output = project.act_lens_with_stdin(&["parse"], PYTEST_FAILURE_LOG);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("- Type: `ASSERTION`"), "{}", output.stdout);

    let output = project.act_lens_with_stdin(&["parse", "-"], PYTEST_FAILURE_LOG);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("- Type: `ASSERTION`"), "{}", output.stdout);
}

#[test]
fn test_parse_successful_log_warns() {
    let project = Project::new();
    project.write("act.log", NOISY_SUCCESS_LOG);

    let output = project.act_lens(&["parse", "act.log"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    pretty_assert_eq!(output.stdout, "");
    assert!(output.stderr.contains("no failure found in the log"), "{}", output.stderr);
}

#[test]
fn test_parse_missing_file_fails() {
    let project = Project::new();

    let output = project.act_lens(&["parse", "missing.log"]);
    assert_ne!(output.code, 0);
    assert!(output.stderr.contains("read log file"), "{}", output.stderr);
}
