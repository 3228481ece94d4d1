//! debstage library.
//!
//! This crate turns a pre-populated staging directory and a declarative
//! package definition into a Debian archive. It is used by the `debstage`
//! CLI binary and can be consumed programmatically, with command execution
//! injected through [`process::CommandExecutor`].
//!
//! # Modules
//!
//! - [`arch`] - Canonical to Debian architecture token mapping
//! - [`cli`] - Command-line argument definitions
//! - [`control`] - `control` and `conffiles` generation
//! - [`definition`] - Package variables, sections and the TOML loader
//! - [`error`] - Error types for every packaging step
//! - [`output`] - User-facing stderr output
//! - [`package`] - Archive naming and `dpkg-deb` invocation
//! - [`permissions`] - Ownership and mode application for staged entries
//! - [`pipeline`] - Packaging pipeline orchestration
//! - [`process`] - External command abstraction
//! - [`scripts`] - Maintainer script generation
//! - [`size`] - Installed-size calculation
//! - [`staging`] - The staging root and its control directory

pub mod arch;
pub mod cli;
pub mod control;
pub mod definition;
pub mod error;
pub mod output;
pub mod package;
pub mod permissions;
pub mod pipeline;
pub mod process;
pub mod scripts;
pub mod size;
pub mod staging;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
