//! Running `act` and capturing its output.

use std::ffi::OsStr;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use bon::Builder;
use color_eyre::eyre::{Context, OptionExt, Result, eyre};
use derive_more::Display;
use glob::Pattern;
use walkdir::WalkDir;

/// Where `act` looks for workflows by default.
pub const DEFAULT_WORKFLOW_DIR: &str = ".github/workflows";

/// How long `act` may run before it is killed.
///
/// Collecting its output after it exits counts against the same deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Exit code reported when `act` is killed after the timeout.
pub const EXIT_TIMEOUT: i32 = 124;

/// Exit code reported when the `act` binary can't be found.
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit code reported when `act` was terminated by a signal.
const EXIT_SIGNALED: i32 = 1;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

static WORKFLOW_GLOBS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    ["*.yml", "*.yaml"]
        .iter()
        .map(|glob| Pattern::new(glob).expect("compile workflow glob"))
        .collect()
});

/// Runs `act` for a workflow and/or job.
#[derive(Debug, Clone, Builder)]
pub struct ActRunner {
    /// The `act` executable.
    #[builder(into, default = "act")]
    program: String,

    /// Directory holding the workflow files; `-W` paths are resolved against it.
    #[builder(into, default = DEFAULT_WORKFLOW_DIR)]
    workflow_dir: PathBuf,

    #[builder(default = DEFAULT_TIMEOUT)]
    timeout: Duration,

    /// Extra arguments appended to every invocation.
    #[builder(default)]
    args: Vec<String>,

    /// Working directory for `act`; defaults to the current directory.
    #[builder(into)]
    cwd: Option<PathBuf>,
}

/// How an `act` run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Termination {
    #[display("exited with code {_0}")]
    Exited(i32),

    #[display("timed out")]
    TimedOut,

    #[display("not found")]
    NotFound,
}

impl Termination {
    /// The shell-style exit code for this termination.
    pub fn exit_code(self) -> i32 {
        match self {
            Termination::Exited(code) => code,
            Termination::TimedOut => EXIT_TIMEOUT,
            Termination::NotFound => EXIT_NOT_FOUND,
        }
    }
}

/// Captured output of an `act` run.
#[derive(Debug, Clone)]
pub struct ActOutput {
    /// Standard output followed by standard error.
    ///
    /// Empty when the run timed out or `act` couldn't be started.
    pub log: String,

    pub termination: Termination,

    pub elapsed: Duration,
}

impl ActOutput {
    pub fn exit_code(&self) -> i32 {
        self.termination.exit_code()
    }

    pub fn success(&self) -> bool {
        self.termination == Termination::Exited(0)
    }
}

impl Default for ActRunner {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ActRunner {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn workflow_dir(&self) -> &Path {
        &self.workflow_dir
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Workflow file names (`*.yml`, `*.yaml`) directly inside the workflow directory.
    ///
    /// Returns an empty list if the directory doesn't exist.
    #[tracing::instrument(skip(self), fields(dir = ?self.workflow_dir))]
    pub fn list_workflows(&self) -> Vec<String> {
        let dir = self.resolve(&self.workflow_dir);
        if !dir.is_dir() {
            tracing::debug!(?dir, "workflow directory does not exist");
            return Vec::new();
        }

        let mut workflows = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!(?error, ?dir, "walking workflow directory");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if WORKFLOW_GLOBS.iter().any(|pattern| pattern.matches(&name)) {
                workflows.push(name.into_owned());
            }
        }

        workflows
    }

    /// Build the `act` command line for a workflow and job.
    ///
    /// `act [-W <workflow_dir>/<workflow>] [-j <job>] [extra args...]`
    pub fn command(&self, workflow: Option<&str>, job: Option<&str>) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(workflow) = workflow {
            cmd.arg("-W").arg(self.workflow_dir.join(workflow));
        }
        if let Some(job) = job {
            cmd.args(["-j", job]);
        }
        cmd.args(&self.args);
        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }

    /// The command line as it would be typed into a shell, for display.
    pub fn command_line(&self, workflow: Option<&str>, job: Option<&str>) -> String {
        let cmd = self.command(workflow, job);
        let words = std::iter::once(cmd.get_program())
            .chain(cmd.get_args())
            .map(OsStr::to_string_lossy)
            .collect::<Vec<_>>();
        shell_words::join(words)
    }

    /// Run `act`, capturing stdout and stderr.
    ///
    /// A missing `act` binary and a run that exceeds the timeout are reported
    /// through [`Termination`] rather than as errors; any other failure to
    /// start or wait on the process is an error.
    #[tracing::instrument(skip(self))]
    pub fn run(&self, workflow: Option<&str>, job: Option<&str>) -> Result<ActOutput> {
        let mut cmd = self.command(workflow, job);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(?cmd, timeout = ?self.timeout, "spawning act");
        let start = Instant::now();

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::warn!(program = %self.program, "act executable not found");
                return Ok(ActOutput {
                    log: String::new(),
                    termination: Termination::NotFound,
                    elapsed: start.elapsed(),
                });
            }
            Err(error) => {
                return Err(error).with_context(|| format!("spawn {:?}", self.program));
            }
        };

        // Both pipes are drained on their own threads so that neither can
        // fill up and stall the child while we wait on it.
        let (tx, rx) = mpsc::channel();
        let stdout = child.stdout.take().ok_or_eyre("capture act stdout")?;
        let stderr = child.stderr.take().ok_or_eyre("capture act stderr")?;
        spawn_reader(Stream::Stdout, stdout, tx.clone());
        spawn_reader(Stream::Stderr, stderr, tx);

        let deadline = start + self.timeout;
        loop {
            if let Some(status) = child.try_wait().context("wait for act")? {
                let code = status.code().unwrap_or_else(|| {
                    tracing::warn!(?status, "act terminated by signal");
                    EXIT_SIGNALED
                });
                let log = Capture::collect(&rx, deadline)?.into_log();
                let elapsed = start.elapsed();
                tracing::debug!(code, ?elapsed, log_len = log.len(), "act finished");
                return Ok(ActOutput {
                    log,
                    termination: Termination::Exited(code),
                    elapsed,
                });
            }

            if Instant::now() >= deadline {
                tracing::warn!(timeout = ?self.timeout, "act timed out, killing it");
                if let Err(error) = child.kill() {
                    tracing::warn!(?error, "kill act");
                }
                child.wait().context("reap act after timeout")?;

                // Processes spawned by `act` can outlive it and keep the pipes
                // open, so the reader threads are left to finish on their own.
                return Ok(ActOutput {
                    log: String::new(),
                    termination: Termination::TimedOut,
                    elapsed: start.elapsed(),
                });
            }

            thread::sleep(POLL_INTERVAL);
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match self.cwd {
            Some(ref cwd) => cwd.join(path),
            None => path.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum Stream {
    #[display("stdout")]
    Stdout,

    #[display("stderr")]
    Stderr,
}

/// A message from an output reader thread.
#[derive(Debug)]
enum Chunk {
    Data(Stream, Vec<u8>),
    Closed(Stream),
    Failed(Stream, io::Error),
}

/// Forward everything read from `reader` to `tx`, then report how the stream ended.
fn spawn_reader(stream: Stream, mut reader: impl Read + Send + 'static, tx: Sender<Chunk>) {
    thread::spawn(move || {
        let mut buf = [0; 8192];
        loop {
            let chunk = match reader.read(&mut buf) {
                Ok(0) => Chunk::Closed(stream),
                Ok(n) => Chunk::Data(stream, buf[..n].to_vec()),
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => Chunk::Failed(stream, error),
            };

            let last = !matches!(chunk, Chunk::Data(..));
            // A failed send means the runner already returned.
            if tx.send(chunk).is_err() || last {
                return;
            }
        }
    });
}

/// Output received from the reader threads.
#[derive(Debug, Default)]
struct Capture {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl Capture {
    /// Receive output until both streams close or `deadline` passes.
    ///
    /// Processes left running in the background by `act` can hold the pipes
    /// open after it exits; at the deadline, whatever arrived so far is kept.
    fn collect(rx: &Receiver<Chunk>, deadline: Instant) -> Result<Self> {
        let mut capture = Self::default();
        let mut open = 2;
        while open > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(Chunk::Data(Stream::Stdout, bytes)) => capture.stdout.extend(bytes),
                Ok(Chunk::Data(Stream::Stderr, bytes)) => capture.stderr.extend(bytes),
                Ok(Chunk::Closed(_)) => open -= 1,
                Ok(Chunk::Failed(stream, error)) => {
                    return Err(error).with_context(|| format!("read act {stream}"));
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        open,
                        "act output still open at the deadline, keeping partial output"
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(eyre!("output reader thread panicked"));
                }
            }
        }
        Ok(capture)
    }

    fn into_log(self) -> String {
        concat_output(
            String::from_utf8_lossy(&self.stdout).into_owned(),
            String::from_utf8_lossy(&self.stderr).into_owned(),
        )
    }
}

/// Stdout followed by stderr, keeping the two on separate lines.
fn concat_output(mut stdout: String, stderr: String) -> String {
    if !stdout.is_empty() && !stdout.ends_with('\n') && !stderr.is_empty() {
        stdout.push('\n');
    }
    stdout.push_str(&stderr);
    stdout
}
