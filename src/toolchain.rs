//! External toolchain invocation (migrations and solution grouping).
//!
//! The generator only ever talks to a [`CommandRunner`]; [`ProcessRunner`]
//! is the real implementation backed by `std::process`, tests substitute a
//! recording fake.

use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Interval between exit-status polls while a command runs
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long to keep collecting output once the command has exited or been
/// killed. Descendants that inherited the pipes may keep them open for much
/// longer; their output past this window is dropped.
const DRAIN_WINDOW: Duration = Duration::from_millis(500);

/// One external command, run from `working_dir`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl ToolchainCommand {
    pub fn new(program: &str, working_dir: &Path) -> Self {
        ToolchainCommand {
            program: program.to_string(),
            args: Vec::new(),
            working_dir: working_dir.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// `dotnet ef migrations add InitialCreate --project P --startup-project P`
    pub fn add_migration(program: &str, root: &Path, project: &str) -> Self {
        ToolchainCommand::new(program, root)
            .args(["ef", "migrations", "add", "InitialCreate"])
            .args(["--project", project, "--startup-project", project])
    }

    /// `dotnet ef database update --project P --startup-project P`
    pub fn update_database(program: &str, root: &Path, project: &str) -> Self {
        ToolchainCommand::new(program, root)
            .args(["ef", "database", "update"])
            .args(["--project", project, "--startup-project", project])
    }

    /// `dotnet new sln --name <Solution>`
    pub fn new_solution(program: &str, root: &Path, solution: &str) -> Self {
        ToolchainCommand::new(program, root).args(["new", "sln", "--name", solution])
    }

    /// `dotnet sln add <Project>/<Project>.csproj`
    pub fn add_to_solution(program: &str, root: &Path, project: &str) -> Self {
        let descriptor = Path::new(project).join(format!("{}.csproj", project));
        ToolchainCommand::new(program, root)
            .args(["sln", "add"])
            .arg(descriptor.to_string_lossy())
    }
}

impl fmt::Display for ToolchainCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished (or abandoned) command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code, `None` when killed or terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl CommandOutcome {
    /// Successful, silent-on-stderr completion
    pub fn success(stdout: impl Into<String>) -> Self {
        CommandOutcome {
            exit_code: Some(0),
            stdout: stdout.into(),
            ..Default::default()
        }
    }

    /// Why this outcome counts as a failure, if it does.
    ///
    /// Timeouts, non-zero exits and any stderr output are all reportable.
    pub fn failure(&self) -> Option<String> {
        if self.timed_out {
            return Some("timed out".to_string());
        }
        match self.exit_code {
            Some(0) => {}
            Some(code) => return Some(format!("exited with status {}: {}", code, self.stderr.trim())),
            None => return Some(format!("terminated by signal: {}", self.stderr.trim())),
        }
        if !self.stderr.trim().is_empty() {
            return Some(format!("wrote to stderr: {}", self.stderr.trim()));
        }
        None
    }
}

/// Executes toolchain commands
pub trait CommandRunner {
    /// Run `command` to completion or until `timeout` elapses.
    ///
    /// Errors are reserved for commands that could not be started at all.
    fn run(&mut self, command: &ToolchainCommand, timeout: Duration) -> io::Result<CommandOutcome>;
}

/// Runs commands as child processes, echoing their output to stdout
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// Suppress echoing of captured output
    pub quiet: bool,
}

impl ProcessRunner {
    pub fn new() -> Self {
        ProcessRunner::default()
    }

    fn echo(&self, outcome: &CommandOutcome) {
        if self.quiet {
            return;
        }
        if !outcome.stdout.trim().is_empty() {
            println!("{}", outcome.stdout.trim_end());
        }
        if !outcome.stderr.trim().is_empty() {
            println!("Error: {}", outcome.stderr.trim_end());
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, command: &ToolchainCommand, timeout: Duration) -> io::Result<CommandOutcome> {
        tracing::debug!("running `{}` in {}", command, command.working_dir.display());

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes concurrently so a chatty child cannot block on a full pipe
        let (tx, rx) = mpsc::channel();
        if let Some(pipe) = child.stdout.take() {
            spawn_reader(pipe, Stream::Stdout, tx.clone());
        }
        if let Some(pipe) = child.stderr.take() {
            spawn_reader(pipe, Stream::Stderr, tx.clone());
        }
        drop(tx);

        let deadline = Instant::now() + timeout;
        let mut timed_out = false;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break Some(status);
            }
            if Instant::now() >= deadline {
                tracing::warn!("`{}` exceeded {:?}; killing", command, timeout);
                timed_out = true;
                child.kill()?;
                child.wait()?;
                break None;
            }
            thread::sleep(POLL_INTERVAL);
        };

        let (stdout, stderr) = collect_output(&rx, Instant::now() + DRAIN_WINDOW);
        let outcome = CommandOutcome {
            exit_code: status.and_then(|s| s.code()),
            stdout,
            stderr,
            timed_out,
        };
        self.echo(&outcome);
        Ok(outcome)
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Forward chunks from `pipe` until EOF. The thread is detached: if a
/// descendant holds the pipe open it outlives the call.
fn spawn_reader<R: Read + Send + 'static>(mut pipe: R, stream: Stream, tx: Sender<(Stream, Vec<u8>)>) {
    thread::spawn(move || {
        let mut chunk = [0u8; 4096];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send((stream, chunk[..n].to_vec())).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                // A read error leaves whatever was captured so far
                Err(_) => break,
            }
        }
    });
}

/// Gather output until both readers hit EOF or `until` passes
fn collect_output(rx: &Receiver<(Stream, Vec<u8>)>, until: Instant) -> (String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    loop {
        let remaining = until.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((Stream::Stdout, bytes)) => stdout.extend_from_slice(&bytes),
            Ok((Stream::Stderr, bytes)) => stderr.extend_from_slice(&bytes),
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!("output pipes still open; returning captured output");
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    (
        String::from_utf8_lossy(&stdout).into_owned(),
        String::from_utf8_lossy(&stderr).into_owned(),
    )
}
