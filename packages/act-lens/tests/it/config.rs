use pretty_assertions::assert_eq as pretty_assert_eq;

use crate::Project;

#[test]
fn test_config_defaults() {
    let project = Project::new();

    let output = project.act_lens(&["config", "--quiet"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    pretty_assert_eq!(
        output.stdout,
        [
            "act: act",
            "workflow_dir: .github/workflows",
            "output_dir: .act-lens",
            "timeout_secs: 300",
            "clipboard: true",
            "context_radius: 3",
            "act_args: []",
            "",
            "",
        ]
        .join("\n")
    );
}

#[test]
fn test_config_reports_sources() {
    let project = Project::new();
    let output = project.act_lens(&["config"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.starts_with("# No config files found; using defaults.\n"), "{}", output.stdout);

    project.write(".act-lens.yaml", "version: 1\ntimeout_secs: 60\n");
    let output = project.act_lens(&["config"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("# Config file: \".act-lens.yaml\""), "{}", output.stdout);
    assert!(output.stdout.contains("timeout_secs: 60\n"), "{}", output.stdout);
}

#[test]
fn test_config_flag_selects_project_file() {
    let project = Project::new();
    project.write("ci/act-lens.yaml", "version: 1\nact: /opt/bin/act\nclipboard: false\n");

    let output = project.act_lens(&["config", "--quiet", "--config", "ci/act-lens.yaml"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("act: /opt/bin/act\n"), "{}", output.stdout);
    assert!(output.stdout.contains("clipboard: false\n"), "{}", output.stdout);
}

// `directories` only honors XDG_CONFIG_HOME on Linux.
#[cfg(target_os = "linux")]
#[test]
fn test_config_user_file_is_layered_under_project() {
    let project = Project::new();
    project.write(".xdg/act-lens/config.yaml", "version: 1\ntimeout_secs: 10\ncontext_radius: 5\n");
    project.write(".act-lens.yaml", "version: 1\ntimeout_secs: 20\n");

    let output = project.act_lens(&["config", "--quiet"]);
    pretty_assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("timeout_secs: 20\n"), "{}", output.stdout);
    assert!(output.stdout.contains("context_radius: 5\n"), "{}", output.stdout);
}

#[test]
fn test_config_malformed_file_fails() {
    let project = Project::new();
    project.write(".act-lens.yaml", "version: 2\n");

    let output = project.act_lens(&["config"]);
    assert_ne!(output.code, 0);
    assert!(output.stderr.contains("version: 2"), "{}", output.stderr);
}
