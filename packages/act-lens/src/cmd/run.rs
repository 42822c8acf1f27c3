//! Run act and turn its failure into a report.

use std::env;
use std::path::PathBuf;

use clap::Args;
use color_eyre::{
    Result, Section, SectionExt,
    eyre::{Context, eyre},
};
use tracing::instrument;

use act_lens::{
    clipboard,
    config::Settings,
    context, parse, report,
    runner::{ActOutput, Termination},
    store,
};

use super::ui::TerminalUI;

#[derive(Args, Clone, Debug)]
pub struct Config {
    /// Workflow file name inside the workflow directory (e.g. `ci.yml`).
    #[arg(short, long)]
    pub workflow: Option<String>,

    /// Job to run; runs every job when omitted.
    #[arg(short, long)]
    pub job: Option<String>,

    /// Print the report to the terminal as well.
    #[arg(short, long)]
    pub preview: bool,

    /// Don't copy the report to the clipboard.
    #[arg(long)]
    pub no_clipboard: bool,

    /// Write the report to this file instead of the output directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show the full act log.
    #[arg(short, long)]
    pub verbose: bool,

    /// The act executable to run.
    #[arg(long, env = "ACT_LENS_ACT")]
    pub act: Option<String>,

    /// Seconds before act is killed.
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl Config {
    /// Apply command line overrides on top of the configured settings.
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(ref act) = self.act {
            settings.act = act.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.timeout_secs = timeout;
        }
        if self.no_clipboard {
            settings.clipboard = false;
        }
        settings
    }
}

#[instrument(skip(settings))]
pub fn main(config: Config, settings: Settings) -> Result<()> {
    let settings = config.apply(settings);
    let ui = TerminalUI::new(config.verbose);
    ui.display_banner();

    let workflow = config.workflow.as_deref();
    let job = config.job.as_deref();
    let runner = settings.runner();
    ui.display_running(&runner.command_line(workflow, job));

    let output = runner.run(workflow, job).context("run act")?;
    match output.termination {
        Termination::Exited(0) => {
            ui.display_success("Success - no errors");
            return Ok(());
        }
        Termination::Exited(code) => {
            ui.display_status(&format!("act exited with code {code} after {:.1?}", output.elapsed));
        }
        Termination::NotFound => {
            return Err(eyre!("act executable not found: {:?}", runner.program()))
                .suggestion("Install act: https://github.com/nektos/act")
                .suggestion("Or point `act` in .act-lens.yaml (or `--act`) at the binary.");
        }
        Termination::TimedOut => {
            return Err(eyre!("act timed out after {:?}", runner.timeout()))
                .suggestion("Raise `timeout_secs` in .act-lens.yaml or pass `--timeout`.");
        }
    }

    if ui.verbose() {
        ui.display_section("log", &output.log);
    }

    report_failure(&config, &settings, &output, &ui)
}

fn report_failure(
    config: &Config,
    settings: &Settings,
    output: &ActOutput,
    ui: &TerminalUI,
) -> Result<()> {
    let Some(mut failure) = parse::parse(&output.log, config.workflow.as_deref()) else {
        ui.display_warning("could not extract any error information from the act log");
        tracing::warn!(exit_code = output.exit_code(), "act failed but no failure pattern matched");
        return Ok(());
    };

    let root = env::current_dir().context("get current directory")?;
    context::attach(&mut failure, &root, settings.context_radius);

    let report = report::render(&failure);
    if config.preview {
        ui.display_section("report", &report);
    }

    let saved = match config.output {
        Some(ref path) => {
            store::write_report(&report, path)?;
            path.clone()
        }
        None => store::save_report(&report, &settings.output_dir)
            .with_section(|| settings.output_dir.display().to_string().header("Output directory:"))?,
    };
    ui.display_success(&format!("Saved: {}", saved.display()));

    if settings.clipboard {
        match clipboard::copy(&report) {
            Ok(()) => ui.display_success("Copied to clipboard"),
            Err(error) => {
                tracing::debug!(?error, "clipboard copy failed");
                ui.display_warning(&format!("could not copy to clipboard: {error}"));
            }
        }
    }

    ui.display_hint("Paste the report into your AI chat and ask how to fix it!");
    Ok(())
}
