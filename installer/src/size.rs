//! Installed-size calculation for the staging tree.
//!
//! The size is whatever `du -s` reports, summed across output lines. `du`
//! reports 1024-byte blocks by default, which is the unit dpkg expects for
//! `Installed-Size`; no conversion is applied.

use crate::error::{BuildError, Result};
use crate::process::{CommandExecutor, CommandInvocation, run_checked};
use crate::staging::StagingRoot;
use log::debug;

/// Query the disk usage of the staging root.
///
/// # Errors
///
/// Returns [`BuildError::DiskUsage`] if `du` cannot be run or exits
/// unsuccessfully, and [`BuildError::DiskUsageParse`] if a line of its output
/// does not start with an integer size.
pub fn installed_size(staging: &StagingRoot, executor: &dyn CommandExecutor) -> Result<u64> {
    let invocation = CommandInvocation::new("du")
        .arg("-s")
        .arg(staging.path().as_str());
    let output = run_checked(executor, &invocation, |message| BuildError::DiskUsage {
        message,
    })?;

    let size = sum_disk_usage(&String::from_utf8_lossy(&output.stdout))?;
    debug!("staging tree {} occupies {size}", staging.path());
    Ok(size)
}

/// Sum the size column of `du` output.
///
/// Blank lines are ignored.
///
/// # Errors
///
/// Returns [`BuildError::DiskUsageParse`] for a line whose first field is not
/// an unsigned integer.
///
/// # Examples
///
/// ```
/// use debstage::size::sum_disk_usage;
///
/// assert_eq!(sum_disk_usage("120\t/stage\n8\t/stage/DEBIAN\n")?, 128);
/// # Ok::<(), debstage::error::BuildError>(())
/// ```
pub fn sum_disk_usage(stdout: &str) -> Result<u64> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .try_fold(0_u64, |total, line| {
            let size = line
                .split_whitespace()
                .next()
                .and_then(|field| field.parse::<u64>().ok())
                .ok_or_else(|| BuildError::DiskUsageParse {
                    line: line.to_owned(),
                })?;
            Ok(total.saturating_add(size))
        })
}
