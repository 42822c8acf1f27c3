//! Copying text to the system clipboard through the platform's clipboard tool.

use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

use color_eyre::{
    Section, SectionExt,
    eyre::{Context, OptionExt, Result, bail, eyre},
};
use derive_more::Display;

/// An external command that reads clipboard contents from stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{program}")]
pub struct Tool {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

const PBCOPY: Tool = Tool {
    program: "pbcopy",
    args: &[],
};

const CLIP: Tool = Tool {
    program: "clip",
    args: &[],
};

const WL_COPY: Tool = Tool {
    program: "wl-copy",
    args: &[],
};

const XCLIP: Tool = Tool {
    program: "xclip",
    args: &["-selection", "clipboard"],
};

const XSEL: Tool = Tool {
    program: "xsel",
    args: &["--clipboard", "--input"],
};

impl Tool {
    /// Pipe `text` into the tool and wait for it to exit.
    ///
    /// Only the tool's own exit is awaited: `xclip` and `wl-copy` leave a
    /// process behind that owns the selection, so stdout and stderr are not
    /// captured.
    #[tracing::instrument(skip(text))]
    pub fn copy(&self, text: &str) -> Result<()> {
        let mut child = Command::new(self.program)
            .args(self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("spawn {}", self.program))?;

        {
            let mut stdin = child.stdin.take().ok_or_eyre("capture clipboard stdin")?;
            stdin
                .write_all(text.as_bytes())
                .with_context(|| format!("write to {}", self.program))?;
        }

        let status = child
            .wait()
            .with_context(|| format!("wait for {}", self.program))?;
        if !status.success() {
            bail!("{} exited with {}", self.program, status);
        }

        Ok(())
    }
}

/// The clipboard tools to try, in order, for the current platform.
pub fn candidates() -> Vec<Tool> {
    candidates_for(env::consts::OS, env::var_os("WAYLAND_DISPLAY").is_some())
}

fn candidates_for(os: &str, wayland: bool) -> Vec<Tool> {
    match os {
        "macos" => vec![PBCOPY],
        "windows" => vec![CLIP],
        _ if wayland => vec![WL_COPY, XCLIP, XSEL],
        _ => vec![XCLIP, XSEL],
    }
}

/// Copy text to the clipboard using the first tool that works.
#[tracing::instrument(skip(text), fields(len = text.len()))]
pub fn copy(text: &str) -> Result<()> {
    let mut attempts = Vec::new();
    for tool in candidates() {
        match tool.copy(text) {
            Ok(()) => {
                tracing::debug!(%tool, "copied to clipboard");
                return Ok(());
            }
            Err(error) => {
                tracing::debug!(%tool, ?error, "clipboard tool failed");
                attempts.push(format!("{tool}: {error:#}"));
            }
        }
    }

    Err(eyre!("no clipboard tool succeeded"))
        .with_section(|| attempts.join("\n").header("Attempts:"))
        .suggestion("Install `xclip`, `xsel` or `wl-clipboard`, or pass `--no-clipboard`.")
}
