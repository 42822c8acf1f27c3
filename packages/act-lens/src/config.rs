//! Layered configuration.
//!
//! Settings are resolved in order, each layer overriding the previous one:
//! 1. Built-in defaults
//! 2. User-level config from `ProjectDirs::config_dir()/config.yaml`, if it exists
//! 3. Project config (`.act-lens.yaml` by default), if it exists
//! 4. Command line flags, applied by the CLI on top of the result

use std::fs::read_to_string;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::{
    SectionExt,
    eyre::{Context, Result},
};
use directories::ProjectDirs;
use monostate::MustBe;
use serde::{Deserialize, Serialize};
use tap::Tap;

use crate::{context, runner, store};

/// Default name of the project config file.
pub const PROJECT_CONFIG: &str = ".act-lens.yaml";

/// A configuration file. Every setting is optional so that files can be layered.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// The version of the configuration file format.
    pub version: MustBe!(1),

    /// The `act` executable.
    pub act: Option<String>,

    /// Directory containing workflow files.
    pub workflow_dir: Option<PathBuf>,

    /// Directory reports are saved into.
    pub output_dir: Option<PathBuf>,

    /// Seconds before a running `act` is killed.
    pub timeout_secs: Option<u64>,

    /// Whether reports are copied to the clipboard.
    pub clipboard: Option<bool>,

    /// Lines of source context shown around the failure location.
    pub context_radius: Option<usize>,

    /// Extra arguments passed to every `act` invocation.
    pub act_args: Option<Vec<String>>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub act: String,
    pub workflow_dir: PathBuf,
    pub output_dir: PathBuf,
    pub timeout_secs: u64,
    pub clipboard: bool,
    pub context_radius: usize,
    pub act_args: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            act: String::from("act"),
            workflow_dir: PathBuf::from(runner::DEFAULT_WORKFLOW_DIR),
            output_dir: PathBuf::from(store::DEFAULT_DIR),
            timeout_secs: runner::DEFAULT_TIMEOUT.as_secs(),
            clipboard: true,
            context_radius: context::DEFAULT_RADIUS,
            act_args: Vec::new(),
        }
    }
}

impl Settings {
    /// Override these settings with the values present in `file`.
    pub fn merge(&mut self, file: ConfigFile) {
        let ConfigFile {
            version: _,
            act,
            workflow_dir,
            output_dir,
            timeout_secs,
            clipboard,
            context_radius,
            act_args,
        } = file;

        if let Some(act) = act {
            self.act = act;
        }
        if let Some(workflow_dir) = workflow_dir {
            self.workflow_dir = workflow_dir;
        }
        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }
        if let Some(timeout_secs) = timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(clipboard) = clipboard {
            self.clipboard = clipboard;
        }
        if let Some(context_radius) = context_radius {
            self.context_radius = context_radius;
        }
        if let Some(act_args) = act_args {
            self.act_args = act_args;
        }
    }

    /// A runner configured from these settings.
    pub fn runner(&self) -> runner::ActRunner {
        runner::ActRunner::builder()
            .program(&self.act)
            .workflow_dir(&self.workflow_dir)
            .timeout(Duration::from_secs(self.timeout_secs))
            .args(self.act_args.clone())
            .build()
    }
}

/// Get the project directories for the application.
#[tracing::instrument]
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "act-lens", "act-lens")
}

/// Path of the user-level config file, if the platform has a config directory.
pub fn user_config() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.yaml"))
}

/// Load settings from all layers, using `project` as the project config file.
#[tracing::instrument]
pub fn load(project: &Path) -> Result<Settings> {
    load_attributed(project).map(|(settings, _)| settings)
}

/// Load settings from all layers, also returning the config files that
/// contributed to them, in the order they were applied.
#[tracing::instrument]
pub fn load_attributed(project: &Path) -> Result<(Settings, Vec<PathBuf>)> {
    let mut settings = Settings::default();
    let mut sources = Vec::new();

    let layers = user_config().into_iter().chain([project.to_path_buf()]);
    for path in layers {
        if let Some(file) = load_from(&path).with_context(|| format!("load config: {path:?}"))? {
            settings.merge(file);
            sources.push(path);
        }
    }

    tracing::debug!(?settings, ?sources, "resolved settings");
    Ok((settings, sources))
}

/// Load a single config file; a missing file is `None`.
#[tracing::instrument]
pub fn load_from(path: &Path) -> Result<Option<ConfigFile>> {
    let content = match read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).context(format!("read config file: {path:?}")),
    };

    serde_yaml::from_str::<ConfigFile>(&content)
        .with_context(|| format!("parse config file: {path:?}"))
        .with_context(|| content.header("File content:"))
        .tap(|config| tracing::debug!(?config, "parsed config file"))
        .map(Some)
}
