//! Archive naming and the final `dpkg-deb` invocation.

use crate::definition::PackageVariables;
use crate::error::{BuildError, Result};
use crate::process::{CommandExecutor, CommandInvocation, run_checked};
use crate::staging::StagingRoot;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::fs;

/// Extension appended to every archive filename.
pub const ARCHIVE_EXTENSION: &str = ".deb";

/// Archive builder used when `DPKG_LOCATION` is not set.
pub const DEFAULT_DPKG: &str = "dpkg-deb";

/// Sentinel written to the target directory after a successful build.
pub const SENTINEL_FILE: &str = "package_filename";

/// Result of the packaging step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Building was disabled by `SKIP_BUILDING_PACKAGE`.
    Skipped {
        /// Filename the archive would have been given.
        filename: String,
    },
    /// The archive was built.
    Built {
        /// Archive filename, relative to the target directory.
        filename: String,
        /// Full path to the archive.
        path: Utf8PathBuf,
    },
}

impl BuildOutcome {
    /// The archive filename, whether or not it was built.
    #[must_use]
    pub fn filename(&self) -> &str {
        match self {
            Self::Skipped { filename } | Self::Built { filename, .. } => filename,
        }
    }
}

/// Compute the archive filename.
///
/// `OUTPUTFILE` wins when set; otherwise the name is
/// `SHORT_NAME-<dash version>.<arch>.deb`.
#[must_use]
pub fn package_filename(vars: &PackageVariables) -> String {
    match &vars.output_file {
        Some(base) => format!("{base}{ARCHIVE_EXTENSION}"),
        None => format!(
            "{}-{}.{}{ARCHIVE_EXTENSION}",
            vars.short_name,
            vars.version.dashed(),
            vars.architecture()
        ),
    }
}

/// Build the archive from the staging tree into `target_dir`.
///
/// `dpkg-deb` runs with `target_dir` as its working directory and receives
/// the bare filename, so the archive lands there. When skipping, no command
/// runs and no sentinel is written.
///
/// # Errors
///
/// Returns [`BuildError::ArchiveBuild`] if the builder cannot be run or
/// exits unsuccessfully, or an I/O error if the sentinel cannot be written.
pub fn build_package(
    staging: &StagingRoot,
    target_dir: &Utf8Path,
    vars: &PackageVariables,
    executor: &dyn CommandExecutor,
) -> Result<BuildOutcome> {
    let filename = package_filename(vars);

    if vars.skip_building_package {
        info!("skipping build of {filename}");
        return Ok(BuildOutcome::Skipped { filename });
    }

    let dpkg = vars.dpkg_location.as_deref().unwrap_or(DEFAULT_DPKG);
    let invocation = CommandInvocation::new(dpkg)
        .arg("-b")
        .arg(staging.path().as_str())
        .arg(filename.as_str())
        .current_dir(target_dir);
    debug!("running {invocation} in {target_dir}");

    run_checked(executor, &invocation, |message| BuildError::ArchiveBuild {
        package: filename.clone(),
        message,
    })?;

    fs::write(target_dir.join(SENTINEL_FILE), format!("{filename}\n"))?;

    let path = target_dir.join(&filename);
    info!("built {path}");
    Ok(BuildOutcome::Built { filename, path })
}
