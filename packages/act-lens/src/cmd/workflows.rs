//! List the workflows act can run.

use clap::Args;
use color_eyre::Result;
use tracing::instrument;

use act_lens::config::Settings;

use super::ui::TerminalUI;

#[derive(Args, Clone, Debug)]
pub struct Config {}

#[instrument(skip(settings))]
pub fn main(_config: Config, settings: Settings) -> Result<()> {
    let runner = settings.runner();
    let workflows = runner.list_workflows();

    if workflows.is_empty() {
        let ui = TerminalUI::new(false);
        ui.display_warning(&format!(
            "no workflow files found in {}",
            runner.workflow_dir().display()
        ));
        return Ok(());
    }

    for workflow in workflows {
        println!("{workflow}");
    }
    Ok(())
}
