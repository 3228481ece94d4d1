//! Shared test utilities for the debstage crate.
//!
//! Available to unit tests and, through the `test-support` feature, to the
//! behaviour tests under `tests/`.

use crate::error::{BuildError, Result};
use crate::process::{CommandExecutor, CommandInvocation};
use camino::Utf8PathBuf;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code.
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    output_with_stdout("")
}

/// Creates a successful command `Output` carrying `stdout`.
#[must_use]
pub fn output_with_stdout(stdout: &str) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Creates a command `Output` with the given exit code and no output.
#[must_use]
pub fn output_with_status(code: i32) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The program to execute (e.g., "chown").
    pub program: String,
    /// The arguments passed to the program.
    pub args: Vec<String>,
    /// Required working directory, if any.
    pub current_dir: Option<Utf8PathBuf>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

impl ExpectedCall {
    /// Expect `program` with `args`, answering with `result`.
    pub fn new<I, S>(program: impl Into<String>, args: I, result: Result<Output>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            current_dir: None,
            result,
        }
    }

    /// Also require the invocation to run from `dir`.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    fn matches(&self, invocation: &CommandInvocation) -> bool {
        self.program == invocation.program()
            && self.args.as_slice() == invocation.arguments()
            && self
                .current_dir
                .as_deref()
                .is_none_or(|dir| invocation.working_dir() == Some(dir))
    }

    fn describe(&self) -> String {
        let mut text = self.program.clone();
        for arg in &self.args {
            text.push(' ');
            text.push_str(arg);
        }
        text
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Serves expected invocations in order and records every invocation it
/// receives. An unexpected invocation yields [`BuildError::StubMismatch`]
/// and is remembered so [`StubExecutor::assert_finished`] reports it even if
/// the caller maps the error away.
#[derive(Debug, Default)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
    received: RefCell<Vec<String>>,
    mismatches: RefCell<Vec<String>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            ..Self::default()
        }
    }

    /// Rendered command lines of every invocation received so far.
    #[must_use]
    pub fn received(&self) -> Vec<String> {
        self.received.borrow().clone()
    }

    /// Asserts that every expected invocation was consumed and none was
    /// unexpected.
    ///
    /// # Panics
    ///
    /// Panics if expected calls remain or a mismatch was recorded.
    pub fn assert_finished(&self) {
        let mismatches = self.mismatches.borrow();
        assert!(
            mismatches.is_empty(),
            "unexpected command invocations: {mismatches:?}"
        );
        let remaining: Vec<String> = self
            .expected
            .borrow()
            .iter()
            .map(ExpectedCall::describe)
            .collect();
        assert!(
            remaining.is_empty(),
            "expected further command invocations: {remaining:?}"
        );
    }

    fn mismatch(&self, message: String) -> BuildError {
        self.mismatches.borrow_mut().push(message.clone());
        BuildError::StubMismatch { message }
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, invocation: &CommandInvocation) -> Result<Output> {
        self.received.borrow_mut().push(invocation.to_string());

        let Some(call) = self.expected.borrow_mut().pop_front() else {
            return Err(self.mismatch(format!("unexpected invocation `{invocation}`")));
        };

        if call.matches(invocation) {
            call.result
        } else {
            Err(self.mismatch(format!(
                "expected `{}`, got `{invocation}` in {:?}",
                call.describe(),
                invocation.working_dir()
            )))
        }
    }
}
