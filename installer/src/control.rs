//! Debian control metadata: the `control` descriptor and the `conffiles`
//! listing.

use crate::definition::PackageDefinition;
use crate::error::Result;
use crate::process::CommandExecutor;
use crate::scripts::chown_to_root;
use crate::staging::{CONFFILES_FILE, CONTROL_FILE, StagingRoot};
use log::debug;
use std::fmt;
use std::fs;

/// Fields of the package descriptor, borrowed from the package definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFile<'a> {
    /// Package and source name.
    pub package: &'a str,
    /// Dot-form version.
    pub version: String,
    /// Debian architecture token.
    pub architecture: &'a str,
    /// Maintainer contact.
    pub maintainer: &'a str,
    /// Installed size as reported by the size calculator.
    pub installed_size: u64,
    /// Dependency expressions in declaration order.
    pub depends: &'a [String],
    /// Synopsis line of the description.
    pub synopsis: &'a str,
    /// Extended description.
    pub description: &'a str,
}

impl<'a> ControlFile<'a> {
    /// Collect the descriptor fields for `definition`.
    #[must_use]
    pub fn new(definition: &'a PackageDefinition, installed_size: u64) -> Self {
        let vars = &definition.variables;
        Self {
            package: &vars.short_name,
            version: vars.version.dotted(),
            architecture: vars.architecture(),
            maintainer: &vars.maintainer,
            installed_size,
            depends: &definition.sections.dependencies,
            synopsis: &vars.long_name,
            description: &vars.description,
        }
    }
}

impl fmt::Display for ControlFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Package:      {}", self.package)?;
        writeln!(f, "Source:       {}", self.package)?;
        writeln!(f, "Version:      {}", self.version)?;
        writeln!(f, "Architecture: {}", self.architecture)?;
        writeln!(f, "Maintainer:   {}", self.maintainer)?;
        writeln!(f, "Installed-Size: {}", self.installed_size)?;
        writeln!(f, "Depends:      {}", self.depends.join(", "))?;
        writeln!(f, "Provides:     {}", self.package)?;
        writeln!(f, "Section:      utils")?;
        writeln!(f, "Priority:     optional")?;
        writeln!(f, "Description:  {}", self.synopsis)?;
        writeln!(f, " {}", self.description)?;
        writeln!(f)
    }
}

/// Render the `conffiles` listing: one staged path per line.
#[must_use]
pub fn render_conffiles<'a>(paths: impl IntoIterator<Item = &'a str>) -> String {
    paths.into_iter().map(|path| format!("{path}\n")).collect()
}

/// Write `control` and `conffiles` into the control directory and hand both
/// to root.
///
/// # Errors
///
/// Returns an I/O error if either file cannot be written, or
/// [`BuildError::OwnershipChange`](crate::error::BuildError::OwnershipChange)
/// if the combined `chown` fails.
pub fn write_control_files(
    staging: &StagingRoot,
    definition: &PackageDefinition,
    installed_size: u64,
    executor: &dyn CommandExecutor,
) -> Result<()> {
    let control_path = staging.control_path(CONTROL_FILE);
    let conffiles_path = staging.control_path(CONFFILES_FILE);

    debug!("writing {control_path}");
    fs::write(
        &control_path,
        ControlFile::new(definition, installed_size).to_string(),
    )?;

    debug!("writing {conffiles_path}");
    fs::write(
        &conffiles_path,
        render_conffiles(definition.sections.conffiles()),
    )?;

    chown_to_root(executor, &[control_path, conffiles_path])
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
