//! CLI argument definitions for debstage.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::definition::PackageVariables;
use camino::Utf8PathBuf;
use clap::Parser;
use log::LevelFilter;

/// Build a Debian package from a pre-populated staging directory.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "debstage")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build a Debian package from a pre-populated staging directory.\n\n",
    "debstage reads a TOML package definition, writes the maintainer scripts ",
    "and control metadata into <staging-dir>/DEBIAN, applies the declared ",
    "ownership and modes to the staged files, and runs dpkg-deb to produce ",
    "the archive in the target directory.\n\n",
    "Ownership changes require root privileges.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build a package:\n",
    "    $ debstage -d mypkg.toml -s build/stage -t build/out\n\n",
    "  Prepare the staging tree without running dpkg-deb:\n",
    "    $ debstage -d mypkg.toml -s build/stage -t build/out --skip-build\n\n",
    "  Use a specific dpkg-deb:\n",
    "    $ debstage -d mypkg.toml -s build/stage -t build/out --dpkg /opt/dpkg/bin/dpkg-deb",
))]
pub struct Cli {
    /// Package definition file (TOML).
    #[arg(short, long, value_name = "FILE")]
    pub definition: Utf8PathBuf,

    /// Pre-populated staging directory mirroring the installed layout.
    #[arg(short, long, value_name = "DIR")]
    pub staging_dir: Utf8PathBuf,

    /// Directory receiving the archive and the package_filename sentinel.
    #[arg(short, long, value_name = "DIR")]
    pub target_dir: Utf8PathBuf,

    /// Scratch directory reserved for intermediate artefacts.
    #[arg(long, value_name = "DIR")]
    pub intermediate_dir: Option<Utf8PathBuf>,

    /// Archive builder to run instead of DPKG_LOCATION or dpkg-deb.
    #[arg(long, value_name = "PATH")]
    pub dpkg: Option<String>,

    /// Prepare the staging tree but do not build the archive.
    #[arg(long)]
    pub skip_build: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the definition's variables.
    ///
    /// `--dpkg` replaces `DPKG_LOCATION`; `--skip-build` sets
    /// `SKIP_BUILDING_PACKAGE` but never clears it.
    pub fn apply_overrides(&self, vars: &mut PackageVariables) {
        if let Some(dpkg) = &self.dpkg {
            vars.dpkg_location = Some(dpkg.clone());
        }
        if self.skip_build {
            vars.skip_building_package = true;
        }
    }

    /// Log level implied by `-v` and `-q`.
    ///
    /// # Examples
    ///
    /// ```
    /// use debstage::cli::Cli;
    /// use log::LevelFilter;
    ///
    /// let cli = Cli { verbosity: 2, ..Cli::default() };
    /// assert_eq!(cli.log_level(), LevelFilter::Debug);
    /// ```
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl Default for Cli {
    /// Creates a `Cli` with empty paths and every flag disabled.
    ///
    /// This is useful for testing or programmatic construction where only
    /// specific fields need to be set.
    ///
    /// # Examples
    ///
    /// ```
    /// use debstage::cli::Cli;
    ///
    /// let cli = Cli::default();
    /// assert!(!cli.skip_build);
    /// assert!(cli.dpkg.is_none());
    /// ```
    fn default() -> Self {
        Self {
            definition: Utf8PathBuf::new(),
            staging_dir: Utf8PathBuf::new(),
            target_dir: Utf8PathBuf::new(),
            intermediate_dir: None,
            dpkg: None,
            skip_build: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
