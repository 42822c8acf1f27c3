//! Show the effective configuration.

use std::path::Path;

use clap::Args;
use color_eyre::eyre::{Context, Result};

use act_lens::config;

#[derive(Args, Clone, Debug)]
pub struct Config {
    /// Only print the resolved settings, without the list of config files.
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn main(config: Config, project: &Path) -> Result<()> {
    let (settings, sources) = config::load_attributed(project).context("load configuration")?;

    if !config.quiet {
        if sources.is_empty() {
            println!("# No config files found; using defaults.");
        }
        for source in &sources {
            println!("# Config file: {source:?}");
        }
        println!();
    }

    let yaml = serde_yaml::to_string(&settings).context("serialize settings")?;
    println!("{yaml}");
    Ok(())
}
