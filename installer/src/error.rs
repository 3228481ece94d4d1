//! Error types for the debstage packaging pipeline.
//!
//! Every failure of an external command, and every problem with the package
//! definition or staging tree, is reported through [`BuildError`]. Components
//! return these errors to the pipeline driver; only the binary entrypoint turns
//! them into a process exit status.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while staging and building a package.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A combined ownership change (`chown`) on staged or control files failed.
    #[error("unable to chown {}: {message}", join_paths(.paths))]
    OwnershipChange {
        /// Paths passed to the failing invocation.
        paths: Vec<Utf8PathBuf>,
        /// Diagnostic output from the ownership utility.
        message: String,
    },

    /// Changing the ownership of a staged symbolic link failed.
    #[error("unable to chown {path}: {message}")]
    LinkOwnershipChange {
        /// Staged path of the link, as declared in the package definition.
        path: String,
        /// Diagnostic output from the ownership utility.
        message: String,
    },

    /// Applying permission bits (`chmod`) to a staged path failed.
    #[error("unable to chmod {path}: {message}")]
    PermissionChange {
        /// Real path the mode was applied to.
        path: Utf8PathBuf,
        /// Diagnostic output from the permission utility.
        message: String,
    },

    /// The disk-usage query exited unsuccessfully.
    #[error("disk usage query failed: {message}")]
    DiskUsage {
        /// Diagnostic output from the disk-usage utility.
        message: String,
    },

    /// The disk-usage query produced a line that is not a `(size, path)` pair.
    #[error("unexpected disk usage output: {line:?}")]
    DiskUsageParse {
        /// The offending output line.
        line: String,
    },

    /// The archive-building tool exited unsuccessfully.
    #[error("failed building DPKG {package}: {message}")]
    ArchiveBuild {
        /// Filename of the archive that was being produced.
        package: String,
        /// Diagnostic output from the archive builder.
        message: String,
    },

    /// A required package variable was not supplied.
    #[error("package variable {key} is not set")]
    MissingVariable {
        /// Name of the missing variable.
        key: &'static str,
    },

    /// A permission value is not a valid octal mode.
    #[error("invalid permission mode {value:?}; expected octal digits no greater than 7777")]
    InvalidMode {
        /// The rejected value as written in the definition.
        value: String,
    },

    /// An integer permission value whose decimal digits are not octal.
    ///
    /// TOML octal literals such as `0o755` arrive as their decimal value
    /// (`493`) and land here.
    #[error(
        "invalid permission mode {value}; integer modes are read by their decimal digits \
         (write 755 or \"0755\", not the TOML literal 0o755)"
    )]
    InvalidIntegerMode {
        /// The integer as deserialized.
        value: i64,
    },

    /// The package definition file does not exist.
    #[error("package definition not found at {path}")]
    DefinitionNotFound {
        /// Path where the definition was expected.
        path: Utf8PathBuf,
    },

    /// The package definition file could not be parsed.
    #[error("invalid package definition at {path}: {reason}")]
    InvalidDefinition {
        /// Path to the invalid definition.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// The staging root does not exist or is not a directory.
    #[error("staging directory {path} does not exist")]
    StagingRootMissing {
        /// The configured staging root.
        path: Utf8PathBuf,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

fn join_paths(paths: &[Utf8PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Result type alias using [`BuildError`].
pub type Result<T> = std::result::Result<T, BuildError>;
