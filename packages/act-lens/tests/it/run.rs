//! End-to-end runs against a shell script standing in for act.
#![cfg(unix)]

use std::fs;

use pretty_assertions::assert_eq as pretty_assert_eq;

use crate::{PYTEST_FAILURE_LOG, Project};

const CONFIG_FILE: &str = ".act-lens.yaml";
const CONFIG: &str = "version: 1\nact: sh\nact_args: [fake-act.sh]\nclipboard: false\n";

/// A project whose `act` prints `log` and exits with `code`.
fn project_with_fake_act(log: &str, code: i32) -> Project {
    let project = Project::new();
    project.write(CONFIG_FILE, CONFIG);
    project.write(
        "fake-act.sh",
        &format!("cat <<'LOG'\n{log}LOG\nexit {code}\n"),
    );
    project
}

#[test]
fn test_run_writes_report_to_output_file() {
    let project = project_with_fake_act(PYTEST_FAILURE_LOG, 1);
    project.write(
        "tests/test_math.py",
        "from calc import add\n\ndef test_add():\n    assert add(2, 3) == 6\n",
    );

    let output = project.act_lens(&["run", "--no-clipboard", "-o", "report.md"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("sh fake-act.sh"), "{}", output.stdout);
    assert!(output.stdout.contains("act exited with code 1"), "{}", output.stdout);
    assert!(output.stdout.contains("Saved: report.md"), "{}", output.stdout);
    assert!(!output.stdout.contains("Copied to clipboard"), "{}", output.stdout);

    let report = project.read("report.md");
    assert!(report.starts_with("## 🔍 Act-Lens Failure Report\n"), "{report}");
    assert!(report.contains("- Type: `ASSERTION`"), "{report}");
    assert!(report.contains("- Location: `tests/test_math.py:3`"), "{report}");
    assert!(report.contains("```python\n"), "{report}");
    assert!(report.contains("> 3 | def test_add():"), "{report}");
    assert!(report.contains("### Stack Trace"), "{report}");
}

#[test]
fn test_run_saves_report_in_output_directory() {
    let project = project_with_fake_act(PYTEST_FAILURE_LOG, 1);

    let output = project.act_lens(&["run", "--preview"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("--- report ---"), "{}", output.stdout);

    let reports = fs::read_dir(project.path().join(".act-lens"))
        .expect("read output directory")
        .map(|entry| entry.expect("read entry").file_name().to_string_lossy().to_string())
        .collect::<Vec<_>>();
    pretty_assert_eq!(reports.len(), 1, "{reports:?}");
    assert!(reports[0].starts_with("failure_"), "{reports:?}");
    assert!(reports[0].ends_with(".md"), "{reports:?}");
}

#[test]
fn test_run_verbose_echoes_log() {
    let project = project_with_fake_act(PYTEST_FAILURE_LOG, 1);

    let output = project.act_lens(&["run", "--verbose", "-o", "report.md"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("--- log ---"), "{}", output.stdout);
    assert!(output.stdout.contains("[CI/test] 🚀  Start"), "{}", output.stdout);
}

#[test]
fn test_run_success_writes_nothing() {
    let project = project_with_fake_act("[CI/test] 🏁  Job succeeded\n", 0);

    let output = project.act_lens(&["run"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Success - no errors"), "{}", output.stdout);
    assert!(!project.path().join(".act-lens").exists());
}

#[test]
fn test_run_unrecognized_failure_warns() {
    let project = project_with_fake_act("[CI/test] something went sideways\n", 2);

    let output = project.act_lens(&["run"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(
        output.stderr.contains("could not extract any error information"),
        "{}",
        output.stderr
    );
    assert!(!project.path().join(".act-lens").exists());
}

#[test]
fn test_run_missing_act_fails() {
    let project = Project::new();

    let output = project.act_lens(&["run", "--act", "act-lens-test-missing-act"]);
    assert_ne!(output.code, 0);
    assert!(output.stderr.contains("act executable not found"), "{}", output.stderr);
    assert!(output.stderr.contains("https://github.com/nektos/act"), "{}", output.stderr);
}

#[test]
fn test_run_timeout_fails() {
    let project = Project::new();
    project.write(CONFIG_FILE, CONFIG);
    project.write("fake-act.sh", "sleep 30\n");

    let output = project.act_lens(&["run", "--timeout", "1"]);
    assert_ne!(output.code, 0);
    assert!(output.stderr.contains("act timed out"), "{}", output.stderr);
}
