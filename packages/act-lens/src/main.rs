//! act-lens runs `act`, reads the failure out of its log, and hands you a
//! Markdown report to paste into an AI chat.

use std::path::PathBuf;

use color_eyre::{Result, Section, eyre::Context};
use tracing::{instrument, level_filters::LevelFilter};

mod cmd;

use act_lens::config::{self, PROJECT_CONFIG};
use clap::{Parser, Subcommand};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Look at `act` failures through a lens: run, classify, and report.
#[derive(Parser)]
#[command(author, version = env!("ACT_LENS_VERSION"), about)]
struct Cli {
    /// Project config file, layered over the user config.
    #[arg(long, global = true, env = "ACT_LENS_CONFIG", default_value = PROJECT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run act and build a failure report from its output.
    Run(cmd::run::Config),

    /// Build a failure report from a saved act log.
    Parse(cmd::parse::Config),

    /// List the workflow files act can run.
    Workflows(cmd::workflows::Config),

    /// Show the effective configuration.
    Config(cmd::config::Config),
}

#[instrument]
fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with reports or JSON on stdout. By
    // default only warnings and errors are shown; use `ACT_LENS_LOG` directives
    // for more, e.g. `ACT_LENS_LOG=debug` or `ACT_LENS_LOG=act_lens::parse=trace`.
    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .pretty(),
        )
        .with(
            EnvFilter::builder()
                .with_env_var("ACT_LENS_LOG")
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let project = cli.config;
    let settings = || -> Result<config::Settings> {
        config::load(&project).with_context(|| format!("load configuration: {project:?}"))
    };

    // The suggestion is only shown when the command fails.
    match cli.command {
        Commands::Run(config) => cmd::run::main(config, settings()?),
        Commands::Parse(config) => cmd::parse::main(config, settings()?),
        Commands::Workflows(config) => cmd::workflows::main(config, settings()?),
        Commands::Config(config) => cmd::config::main(config, &project),
    }
    .suggestion("Set `ACT_LENS_LOG=debug` to see what act-lens is doing.")
}
