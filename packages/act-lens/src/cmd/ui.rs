//! Terminal output for the CLI.

use color_print::{ceprintln, cprintln};

/// Terminal UI for act-lens commands.
///
/// Progress and results go to stdout; warnings and errors go to stderr.
pub struct TerminalUI {
    /// Whether to show verbose output (the raw act log).
    verbose: bool,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn display_banner(&self) {
        cprintln!("<cyan>╭──────────────╮</cyan>");
        cprintln!("<cyan>│</cyan> 🔍 <cyan><bold>Act-Lens</bold></cyan> <cyan>│</cyan>");
        cprintln!("<cyan>╰──────────────╯</cyan>");
    }

    /// Display the command about to run.
    pub fn display_running(&self, command_line: &str) {
        cprintln!("<cyan>Running:</cyan> {}", command_line);
    }

    pub fn display_success(&self, message: &str) {
        cprintln!("<green>✓</green> {}", message);
    }

    pub fn display_warning(&self, message: &str) {
        ceprintln!("<yellow>Warning:</yellow> {}", message);
    }

    /// Display a status message.
    pub fn display_status(&self, status: &str) {
        cprintln!("<dim>{}</dim>", status);
    }

    /// Display a block of text between dimmed markers.
    pub fn display_section(&self, title: &str, body: &str) {
        println!();
        cprintln!("<dim>--- {} ---</dim>", title);
        println!("{}", body.trim_end());
        cprintln!("<dim>--- end of {} ---</dim>", title);
        println!();
    }

    /// Display the closing hint after a report is produced.
    pub fn display_hint(&self, hint: &str) {
        println!();
        cprintln!("<cyan>{}</cyan>", hint);
    }
}
