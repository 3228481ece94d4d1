//! Lifecycle hook script generation.
//!
//! dpkg runs the maintainer scripts with these arguments:
//!
//! | Action  | Script     | Arguments                          |
//! |---------|------------|------------------------------------|
//! | Install | `preinst`  | `install`                          |
//! |         | `postinst` | `configure`                        |
//! | Upgrade | `prerm`    | `upgrade <version>` (old package)  |
//! |         | `preinst`  | `upgrade <version>` (new package)  |
//! |         | `postinst` | `configure <version>` (new package)|
//! | Remove  | `prerm`    | `remove`                           |
//! |         | `postrm`   | `remove`                           |
//! | Purge   | `postrm`   | `purge`                            |

use crate::definition::{Mode, ScriptSections};
use crate::error::{BuildError, Result};
use crate::process::{CommandExecutor, CommandInvocation, run_checked};
use crate::staging::StagingRoot;
use camino::Utf8PathBuf;
use log::debug;
use std::fs;
use std::os::unix::fs::PermissionsExt;

/// Owner and group given to every generated control file.
pub const ROOT_OWNERSHIP: &str = "0:0";

/// The four dpkg maintainer scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleHook {
    /// Runs before unpacking.
    PreInstall,
    /// Runs after unpacking and configuration.
    PostInstall,
    /// Runs before removal.
    PreUninstall,
    /// Runs after removal or purge.
    PostUninstall,
}

impl LifecycleHook {
    /// All hooks, in the order their scripts are written.
    pub const ALL: [Self; 4] = [
        Self::PreInstall,
        Self::PostInstall,
        Self::PreUninstall,
        Self::PostUninstall,
    ];

    /// Filename of the script inside the control directory.
    #[must_use]
    pub const fn script_name(self) -> &'static str {
        match self {
            Self::PreInstall => "preinst",
            Self::PostInstall => "postinst",
            Self::PreUninstall => "prerm",
            Self::PostUninstall => "postrm",
        }
    }

    /// Command lines configured for this hook.
    #[must_use]
    pub fn lines(self, scripts: &ScriptSections) -> &[String] {
        match self {
            Self::PreInstall => &scripts.preinstall,
            Self::PostInstall => &scripts.postinstall,
            Self::PreUninstall => &scripts.preuninstall,
            Self::PostUninstall => &scripts.postuninstall,
        }
    }
}

/// Render a hook script: each line newline-terminated, then `exit 0`.
///
/// # Examples
///
/// ```
/// use debstage::scripts::render_script;
///
/// let lines = vec!["echo one".to_owned(), "echo two".to_owned()];
/// assert_eq!(render_script(&lines), "echo one\necho two\nexit 0\n");
/// assert_eq!(render_script(&[]), "exit 0\n");
/// ```
#[must_use]
pub fn render_script(lines: &[String]) -> String {
    let mut script: String = lines.iter().map(|line| format!("{line}\n")).collect();
    script.push_str("exit 0\n");
    script
}

/// Write all four maintainer scripts, mark them executable and hand them to
/// root.
///
/// Returns the paths of the written scripts in [`LifecycleHook::ALL`] order.
///
/// # Errors
///
/// Returns an I/O error if a script cannot be written, or
/// [`BuildError::OwnershipChange`] if the combined `chown` fails. Scripts
/// already written are left in place.
pub fn write_scripts(
    staging: &StagingRoot,
    scripts: &ScriptSections,
    executor: &dyn CommandExecutor,
) -> Result<Vec<Utf8PathBuf>> {
    let mut paths = Vec::with_capacity(LifecycleHook::ALL.len());

    for hook in LifecycleHook::ALL {
        let path = staging.control_path(hook.script_name());
        debug!("writing {path}");
        fs::write(&path, render_script(hook.lines(scripts)))?;
        paths.push(path);
    }

    for path in &paths {
        fs::set_permissions(path, fs::Permissions::from_mode(Mode::EXECUTABLE.bits()))?;
    }

    chown_to_root(executor, &paths)?;
    Ok(paths)
}

/// Change ownership of `paths` to root in one `chown` invocation.
///
/// # Errors
///
/// Returns [`BuildError::OwnershipChange`] if `chown` cannot be run or exits
/// unsuccessfully.
pub fn chown_to_root(executor: &dyn CommandExecutor, paths: &[Utf8PathBuf]) -> Result<()> {
    let invocation = CommandInvocation::new("chown")
        .args(["--no-dereference", ROOT_OWNERSHIP])
        .args(paths.iter().map(Utf8PathBuf::to_string));

    run_checked(executor, &invocation, |message| BuildError::OwnershipChange {
        paths: paths.to_vec(),
        message,
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "scripts_tests.rs"]
mod tests;
