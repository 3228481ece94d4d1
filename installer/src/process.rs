//! External command execution.
//!
//! Every interaction with `chown`, `chmod`, `du` and `dpkg-deb` goes through
//! the [`CommandExecutor`] capability so the pipeline can be exercised with
//! fakes that assert on invocation arguments without touching a real
//! filesystem or packaging tool.

use crate::error::{BuildError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::process::{Command, Output};

/// A fully described external command: program, arguments and working
/// directory.
///
/// # Examples
///
/// ```
/// use debstage::process::CommandInvocation;
///
/// let invocation = CommandInvocation::new("chown")
///     .arg("--no-dereference")
///     .args(["0:0", "/stage/DEBIAN/control"]);
/// assert_eq!(invocation.to_string(), "chown --no-dereference 0:0 /stage/DEBIAN/control");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    program: String,
    args: Vec<String>,
    current_dir: Option<Utf8PathBuf>,
}

impl CommandInvocation {
    /// Create an invocation of `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Append a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command from `dir` instead of the caller's working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// The program to execute.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments passed to the program.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// The working directory override, if any.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Utf8Path> {
        self.current_dir.as_deref()
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs the invocation to completion and returns the captured output.
    ///
    /// A non-zero exit status is not an error at this level; callers decide
    /// which failure it represents.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use debstage::process::{CommandExecutor, CommandInvocation, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run(&CommandInvocation::new("du").args(["-s", "/tmp"]))?;
    /// assert!(output.status.success());
    /// # Ok::<(), debstage::error::BuildError>(())
    /// ```
    fn run(&self, invocation: &CommandInvocation) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, invocation: &CommandInvocation) -> Result<Output> {
        let mut command = Command::new(invocation.program());
        command.args(invocation.arguments());
        if let Some(dir) = invocation.working_dir() {
            command.current_dir(dir);
        }
        command.output().map_err(BuildError::from)
    }
}

/// Summarise why a command failed, preferring its trimmed stderr.
///
/// Falls back to the exit status when the command wrote nothing to stderr.
#[must_use]
pub fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        match output.status.code() {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_owned(),
        }
    } else {
        stderr.to_owned()
    }
}

/// Run `invocation` and treat a spawn error or non-zero exit as fatal.
///
/// `failure` receives a one-line diagnostic and builds the error reported to
/// the caller.
///
/// # Errors
///
/// Returns the error built by `failure` when the command cannot be run or
/// exits unsuccessfully.
pub fn run_checked<F>(
    executor: &dyn CommandExecutor,
    invocation: &CommandInvocation,
    failure: F,
) -> Result<Output>
where
    F: Fn(String) -> BuildError,
{
    let output = executor
        .run(invocation)
        .map_err(|e| failure(e.to_string()))?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(failure(failure_message(&output)))
    }
}
