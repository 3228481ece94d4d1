//! Package definition data model and loader.
//!
//! A [`PackageDefinition`] pairs the configuration variables with the
//! declared sections (files, directories, links, dependencies and lifecycle
//! scripts). It is constructed once, either from a TOML file or
//! programmatically, and passed by reference to every pipeline step.

mod mode;
mod variables;

pub use mode::Mode;
pub use variables::{PackageVariables, PackageVersion, keys};

use crate::error::{BuildError, Result};
use camino::Utf8Path;
use serde::Deserialize;

/// Type tag marking a file whose local edits survive upgrades.
pub const CONFFILE_TYPE: &str = "conffile";

/// A staged regular file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileEntry {
    /// Path inside the staging root, e.g. `/etc/mypkg.conf`.
    #[serde(rename = "path")]
    pub staged_path: String,
    /// Owning user.
    pub owner: String,
    /// Owning group.
    pub group: String,
    /// Permission bits.
    pub permissions: Mode,
    /// File classification; [`CONFFILE_TYPE`] marks a configuration file.
    #[serde(rename = "type", default)]
    pub file_type: String,
}

impl FileEntry {
    /// Returns true when the file is flagged as a configuration file.
    #[must_use]
    pub fn is_conffile(&self) -> bool {
        self.file_type == CONFFILE_TYPE
    }
}

/// A staged directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryEntry {
    /// Path inside the staging root.
    #[serde(rename = "path")]
    pub staged_path: String,
    /// Owning user.
    pub owner: String,
    /// Owning group.
    pub group: String,
    /// Permission bits.
    pub permissions: Mode,
}

/// A staged symbolic link. Links carry ownership only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkEntry {
    /// Path inside the staging root.
    #[serde(rename = "path")]
    pub staged_path: String,
    /// Owning user.
    pub owner: String,
    /// Owning group.
    pub group: String,
}

/// Shell command lines for each lifecycle hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptSections {
    /// Lines run before the package is unpacked.
    pub preinstall: Vec<String>,
    /// Lines run after the package is configured.
    pub postinstall: Vec<String>,
    /// Lines run before the package is removed.
    pub preuninstall: Vec<String>,
    /// Lines run after the package is removed or purged.
    pub postuninstall: Vec<String>,
}

/// Declared content of the package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSections {
    /// Regular files, in declaration order.
    pub files: Vec<FileEntry>,
    /// Directories, in declaration order.
    pub directories: Vec<DirectoryEntry>,
    /// Symbolic links, in declaration order.
    pub links: Vec<LinkEntry>,
    /// Dependency expressions, rendered positionally.
    pub dependencies: Vec<String>,
    /// Lifecycle hook scripts.
    pub scripts: ScriptSections,
}

impl PackageSections {
    /// Staged paths of every configuration file, in declaration order.
    pub fn conffiles(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .filter(|file| file.is_conffile())
            .map(|file| file.staged_path.as_str())
    }
}

/// Variables and sections describing one package build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "DefinitionFile")]
pub struct PackageDefinition {
    /// Configuration variables.
    pub variables: PackageVariables,
    /// Declared package content.
    pub sections: PackageSections,
}

/// On-disk layout of a definition. Sections sit at the top level, next to
/// `[variables]`, and unknown keys are rejected so a misspelled table
/// cannot drop entries.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionFile {
    variables: PackageVariables,
    #[serde(default)]
    files: Vec<FileEntry>,
    #[serde(default)]
    directories: Vec<DirectoryEntry>,
    #[serde(default)]
    links: Vec<LinkEntry>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    scripts: ScriptSections,
}

impl From<DefinitionFile> for PackageDefinition {
    fn from(file: DefinitionFile) -> Self {
        Self {
            variables: file.variables,
            sections: PackageSections {
                files: file.files,
                directories: file.directories,
                links: file.links,
                dependencies: file.dependencies,
                scripts: file.scripts,
            },
        }
    }
}

impl PackageDefinition {
    /// Load a definition from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DefinitionNotFound`] if the file does not exist
    /// and [`BuildError::InvalidDefinition`] if it cannot be parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if !path.is_file() {
            return Err(BuildError::DefinitionNotFound {
                path: path.to_owned(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents).map_err(|reason| BuildError::InvalidDefinition {
            path: path.to_owned(),
            reason,
        })
    }

    /// Parse a definition from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the parser's message when the text is not a valid definition.
    pub fn parse(contents: &str) -> std::result::Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string().trim_end().to_owned())
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
