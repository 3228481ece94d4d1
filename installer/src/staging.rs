//! The staging tree and its Debian control directory.
//!
//! The staging root mirrors the installed filesystem layout. It must exist
//! before the pipeline runs; this module only adds the `DEBIAN` control
//! directory and resolves declared paths against the root.

use crate::error::{BuildError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Name of the control subdirectory inside the staging root.
pub const CONTROL_DIR: &str = "DEBIAN";

/// Filename of the package descriptor.
pub const CONTROL_FILE: &str = "control";

/// Filename of the configuration-file listing.
pub const CONFFILES_FILE: &str = "conffiles";

/// A pre-populated staging directory that is mutated in place by the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingRoot {
    root: Utf8PathBuf,
}

impl StagingRoot {
    /// Wrap a staging root path without touching the filesystem.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Verify the staging root exists and create the control directory.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::StagingRootMissing`] if the root is not a
    /// directory, or an I/O error if the control directory cannot be created.
    pub fn prepare(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(BuildError::StagingRootMissing {
                path: self.root.clone(),
            });
        }
        fs::create_dir_all(self.control_dir())?;
        Ok(())
    }

    /// The staging root itself.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.root
    }

    /// The `DEBIAN` control directory.
    #[must_use]
    pub fn control_dir(&self) -> Utf8PathBuf {
        self.root.join(CONTROL_DIR)
    }

    /// Path to a file inside the control directory.
    #[must_use]
    pub fn control_path(&self, name: &str) -> Utf8PathBuf {
        self.control_dir().join(name)
    }

    /// Resolve a declared staged path to its real location.
    ///
    /// Declared paths are appended to the root as strings, not joined, so an
    /// absolute staged path such as `/etc/app.conf` lands inside the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use debstage::staging::StagingRoot;
    ///
    /// let staging = StagingRoot::new("/tmp/stage");
    /// assert_eq!(staging.resolve("/etc/app.conf"), "/tmp/stage/etc/app.conf");
    /// ```
    #[must_use]
    pub fn resolve(&self, staged_path: &str) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}{staged_path}", self.root))
    }
}
