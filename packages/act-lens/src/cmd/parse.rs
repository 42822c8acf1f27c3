//! Build a report from an act log that was saved earlier.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::{Context, Result};
use tracing::instrument;

use act_lens::{config::Settings, context, parse, report};

use super::ui::TerminalUI;

#[derive(Args, Clone, Debug)]
pub struct Config {
    /// Path to the log file. Reads from stdin if omitted or `-`.
    pub log: Option<PathBuf>,

    /// Workflow name to use in the report instead of the one in the log.
    #[arg(short, long)]
    pub workflow: Option<String>,

    /// Print the extracted failure as JSON instead of Markdown.
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip(settings))]
pub fn main(config: Config, settings: Settings) -> Result<()> {
    let log = read_log(config.log.as_ref())?;
    let ui = TerminalUI::new(false);

    let Some(mut failure) = parse::parse(&log, config.workflow.as_deref()) else {
        ui.display_warning("no failure found in the log");
        return Ok(());
    };

    let root = env::current_dir().context("get current directory")?;
    context::attach(&mut failure, &root, settings.context_radius);

    if config.json {
        let json = serde_json::to_string_pretty(&failure).context("serialize failure")?;
        println!("{json}");
    } else {
        println!("{}", report::render(&failure));
    }

    Ok(())
}

fn read_log(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let bytes = fs::read(path).with_context(|| format!("read log file: {path:?}"))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("read log from stdin")?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}
