//! User-facing output for the debstage CLI.
//!
//! Progress and results go to stderr; stdout is left free for callers that
//! capture it.

use crate::package::BuildOutcome;
use std::fmt::Display;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Describe the result of a packaging run.
///
/// # Examples
///
/// ```
/// use debstage::output::outcome_message;
/// use debstage::package::BuildOutcome;
///
/// let outcome = BuildOutcome::Skipped { filename: "mypkg.deb".to_owned() };
/// assert_eq!(
///     outcome_message(&outcome),
///     "Skipped building mypkg.deb (SKIP_BUILDING_PACKAGE is set)"
/// );
/// ```
#[must_use]
pub fn outcome_message(outcome: &BuildOutcome) -> String {
    match outcome {
        BuildOutcome::Skipped { filename } => {
            format!("Skipped building {filename} (SKIP_BUILDING_PACKAGE is set)")
        }
        BuildOutcome::Built { path, .. } => format!("Built {path}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn built_message_names_archive_path() {
        let outcome = BuildOutcome::Built {
            filename: "mypkg-1.0.amd64.deb".to_owned(),
            path: Utf8PathBuf::from("/out/mypkg-1.0.amd64.deb"),
        };
        assert_eq!(outcome_message(&outcome), "Built /out/mypkg-1.0.amd64.deb");
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut buffer = Vec::new();
        write_stderr_line(&mut buffer, "hello");
        assert_eq!(buffer, b"hello\n");
    }
}
