//! The one OS-facing seam: child process invocation.
//!
//! Everything above this module is pure data transformation, so tests inject
//! a fake [`CommandRunner`] and never spawn a real process.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// Description of a child process to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
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

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Single-line rendering for logs.
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for a in &self.args {
            line.push(' ');
            if a.contains(' ') {
                line.push('\'');
                line.push_str(a);
                line.push('\'');
            } else {
                line.push_str(a);
            }
        }
        line
    }
}

/// Output of a captured (stdout/stderr piped) invocation.
#[derive(Debug, Clone)]
pub struct Captured {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Outcome of an inherited-stdio run.
#[derive(Debug, Clone, Copy)]
pub struct RunStatus {
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

/// Process-spawning boundary. `capture` is for short read-only queries
/// (endpoint resolution); `run` streams the child's output to the console
/// and optionally enforces a deadline.
pub trait CommandRunner {
    fn capture(&self, spec: &CommandSpec) -> io::Result<Captured>;
    fn run(&self, spec: &CommandSpec, timeout: Option<Duration>) -> io::Result<RunStatus>;
}

/// Real implementation over `std::process`.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn capture(&self, spec: &CommandSpec) -> io::Result<Captured> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        let out = cmd.output()?;
        let mut stderr = String::from_utf8_lossy(&out.stderr).into_owned();
        // Cap stderr so a runaway child cannot balloon error messages.
        stderr.truncate(4096);
        Ok(Captured {
            exit_code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr,
        })
    }

    fn run(&self, spec: &CommandSpec, timeout: Option<Duration>) -> io::Result<RunStatus> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        let mut child = cmd.spawn()?;

        match timeout {
            None => {
                let status = child.wait()?;
                Ok(RunStatus {
                    exit_code: status.code(),
                    timed_out: false,
                })
            }
            Some(deadline) => match child.wait_timeout(deadline)? {
                Some(status) => Ok(RunStatus {
                    exit_code: status.code(),
                    timed_out: false,
                }),
                None => {
                    // Deadline passed: kill and reap.
                    let _ = child.kill();
                    let _ = child.wait();
                    Ok(RunStatus {
                        exit_code: None,
                        timed_out: true,
                    })
                }
            },
        }
    }
}

/// Look a binary up on PATH (preflight checks only; actual invocation lets
/// the OS do the lookup).
pub fn binary_on_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

trait ChildExt {
    fn wait_timeout(&mut self, timeout: Duration) -> io::Result<Option<std::process::ExitStatus>>;
}

impl ChildExt for std::process::Child {
    fn wait_timeout(&mut self, timeout: Duration) -> io::Result<Option<std::process::ExitStatus>> {
        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(50);

        loop {
            match self.try_wait()? {
                Some(status) => return Ok(Some(status)),
                None => {
                    if start.elapsed() >= timeout {
                        return Ok(None);
                    }
                    std::thread::sleep(poll_interval);
                }
            }
        }
    }
}
