//! External command execution utilities.
//!
//! `CommandLine` is a configured command string split into program and
//! arguments; `Cmd` is a builder that turns it into a `tokio` process with
//! inherited environment and standard streams.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::{Cmd, CommandLine};
//!
//! let line: CommandLine = "go build -o app".parse()?;
//!
//! // Build: wait for completion, all streams inherited
//! let status = Cmd::from_line(&line).cwd(root).status().await?;
//!
//! // Run: detached child in its own process group, stdin closed
//! let child = Cmd::from_line(&run).cwd(root).null_stdin(true).own_group(true).spawn()?;
//! ```

use serde::Deserialize;
use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
    str::FromStr,
};
use thiserror::Error;
use tokio::process::{Child, Command};

// ============================================================================
// CommandLine
// ============================================================================

/// Errors raised while parsing a command string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandLineError {
    #[error("command is empty")]
    Empty,
}

/// A whitespace-split command string: program name plus arguments.
///
/// No shell quoting is interpreted. A leading `~` in the program is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Split `line` on whitespace. Fails if nothing is left after trimming.
    pub fn parse(line: &str) -> Result<Self, CommandLineError> {
        let mut parts = line.split_whitespace();
        let program = parts.next().ok_or(CommandLineError::Empty)?;
        let program = shellexpand::tilde(program).into_owned();
        Ok(Self {
            program,
            args: parts.map(str::to_owned).collect(),
        })
    }

    /// Build from already-split parts.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Command for a single executable path, no arguments.
    pub fn from_program(path: &Path) -> Self {
        Self {
            program: path.to_string_lossy().into_owned(),
            args: Vec::new(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether the program resolves to an executable (PATH lookup or path).
    pub fn is_resolvable(&self, cwd: &Path) -> bool {
        which::which_in(&self.program, std::env::var_os("PATH"), cwd).is_ok()
    }
}

impl FromStr for CommandLine {
    type Err = CommandLineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CommandLine {
    type Error = CommandLineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
///
/// Environment and stdout/stderr are always inherited from this process.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    null_stdin: bool,
    own_group: bool,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Create from a parsed command line.
    pub fn from_line(line: &CommandLine) -> Self {
        Self::new(line.program()).args(line.args())
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Close stdin instead of inheriting it.
    ///
    /// A child holding the terminal's stdin may not terminate cleanly when
    /// signalled, so long-running programs get a null stdin.
    pub fn null_stdin(mut self, enable: bool) -> Self {
        self.null_stdin = enable;
        self
    }

    /// Start the child as the leader of a new process group.
    ///
    /// Signalling the group then reaches every process the child starts.
    /// No effect outside unix.
    pub fn own_group(mut self, enable: bool) -> Self {
        self.own_group = enable;
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if self.null_stdin {
            cmd.stdin(Stdio::null());
        } else {
            cmd.stdin(Stdio::inherit());
        }

        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        #[cfg(unix)]
        if self.own_group {
            cmd.process_group(0);
        }
        cmd
    }

    /// Run to completion and return the exit status.
    pub async fn status(self) -> std::io::Result<ExitStatus> {
        self.command().status().await
    }

    /// Spawn without waiting. The child is not killed when the handle drops.
    pub fn spawn(self) -> std::io::Result<Child> {
        self.command().kill_on_drop(false).spawn()
    }
}

// ============================================================================
// Tests
// ============================================================================
