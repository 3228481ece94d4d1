//! Ownership and mode application for staged entries.
//!
//! Files and directories receive both `chown` and `chmod`. Links only receive
//! a non-dereferencing `chown`; link modes are meaningless on the target
//! filesystem.

use crate::definition::{Mode, PackageSections};
use crate::error::{BuildError, Result};
use crate::process::{CommandExecutor, CommandInvocation, run_checked};
use crate::staging::StagingRoot;
use camino::Utf8Path;
use log::{debug, trace};

/// Apply declared ownership and modes to every staged file, directory and
/// link.
///
/// Files are processed first, then directories, then links, each in
/// declaration order.
///
/// # Errors
///
/// Stops at the first failing command and returns
/// [`BuildError::OwnershipChange`], [`BuildError::PermissionChange`] or, for
/// links, [`BuildError::LinkOwnershipChange`].
pub fn apply_permissions(
    staging: &StagingRoot,
    sections: &PackageSections,
    executor: &dyn CommandExecutor,
) -> Result<()> {
    let entries = sections
        .files
        .iter()
        .map(|f| (&f.staged_path, &f.owner, &f.group, f.permissions))
        .chain(
            sections
                .directories
                .iter()
                .map(|d| (&d.staged_path, &d.owner, &d.group, d.permissions)),
        );

    for (staged_path, owner, group, mode) in entries {
        let path = staging.resolve(staged_path);
        trace!("applying {owner}:{group} {mode} to {path}");
        change_owner(executor, &path, owner, group)?;
        change_mode(executor, &path, mode)?;
    }

    for link in &sections.links {
        let path = staging.resolve(&link.staged_path);
        trace!("applying {}:{} to link {path}", link.owner, link.group);
        let invocation = CommandInvocation::new("chown")
            .arg("--no-dereference")
            .arg(ownership(&link.owner, &link.group))
            .arg(path.as_str());
        run_checked(executor, &invocation, |message| {
            BuildError::LinkOwnershipChange {
                path: link.staged_path.clone(),
                message,
            }
        })?;
    }

    debug!(
        "applied attributes to {} files, {} directories and {} links",
        sections.files.len(),
        sections.directories.len(),
        sections.links.len()
    );
    Ok(())
}

fn ownership(owner: &str, group: &str) -> String {
    format!("{owner}:{group}")
}

fn change_owner(
    executor: &dyn CommandExecutor,
    path: &Utf8Path,
    owner: &str,
    group: &str,
) -> Result<()> {
    let invocation = CommandInvocation::new("chown")
        .arg(ownership(owner, group))
        .arg(path.as_str());
    run_checked(executor, &invocation, |message| BuildError::OwnershipChange {
        paths: vec![path.to_owned()],
        message,
    })?;
    Ok(())
}

fn change_mode(executor: &dyn CommandExecutor, path: &Utf8Path, mode: Mode) -> Result<()> {
    let invocation = CommandInvocation::new("chmod")
        .arg(mode.to_string())
        .arg(path.as_str());
    run_checked(executor, &invocation, |message| BuildError::PermissionChange {
        path: path.to_owned(),
        message,
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;
