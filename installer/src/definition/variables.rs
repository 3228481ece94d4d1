//! Package configuration variables and the composed version.

use crate::arch::debian_architecture;
use crate::error::{BuildError, Result};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Variable names recognised in a package definition.
pub mod keys {
    /// Upstream version.
    pub const VERSION: &str = "VERSION";
    /// Optional release number appended to the version.
    pub const RELEASE: &str = "RELEASE";
    /// Canonical platform architecture.
    pub const PFARCH: &str = "PFARCH";
    /// Package name.
    pub const SHORT_NAME: &str = "SHORT_NAME";
    /// Maintainer contact.
    pub const MAINTAINER: &str = "MAINTAINER";
    /// One-line summary.
    pub const LONG_NAME: &str = "LONG_NAME";
    /// Extended description line.
    pub const DESCRIPTION: &str = "DESCRIPTION";
    /// Optional archive basename overriding the computed filename.
    pub const OUTPUTFILE: &str = "OUTPUTFILE";
    /// Optional path to the archive-building tool.
    pub const DPKG_LOCATION: &str = "DPKG_LOCATION";
    /// Presence flag suppressing the archive build.
    pub const SKIP_BUILDING_PACKAGE: &str = "SKIP_BUILDING_PACKAGE";
}

/// Upstream version with an optional release component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    version: String,
    release: Option<String>,
}

impl PackageVersion {
    /// Compose a version from its parts.
    #[must_use]
    pub fn new(version: impl Into<String>, release: Option<String>) -> Self {
        Self {
            version: version.into(),
            release,
        }
    }

    /// Version used in control metadata: `VERSION.RELEASE`, or `VERSION`.
    ///
    /// # Examples
    ///
    /// ```
    /// use debstage::definition::PackageVersion;
    ///
    /// let version = PackageVersion::new("1.0", Some("1".to_owned()));
    /// assert_eq!(version.dotted(), "1.0.1");
    /// assert_eq!(version.dashed(), "1.0-1");
    /// ```
    #[must_use]
    pub fn dotted(&self) -> String {
        self.joined('.')
    }

    /// Version used in the default archive filename: `VERSION-RELEASE`, or
    /// `VERSION`.
    #[must_use]
    pub fn dashed(&self) -> String {
        self.joined('-')
    }

    fn joined(&self, separator: char) -> String {
        match &self.release {
            Some(release) => format!("{}{separator}{release}", self.version),
            None => self.version.clone(),
        }
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

/// Configuration variables for one package build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, VariableValue>")]
pub struct PackageVariables {
    /// Package name (`SHORT_NAME`).
    pub short_name: String,
    /// Composed version (`VERSION` and `RELEASE`).
    pub version: PackageVersion,
    /// Canonical architecture as given (`PFARCH`).
    pub platform_arch: String,
    /// Maintainer contact (`MAINTAINER`).
    pub maintainer: String,
    /// Summary line (`LONG_NAME`).
    pub long_name: String,
    /// Extended description (`DESCRIPTION`).
    pub description: String,
    /// Archive basename override (`OUTPUTFILE`).
    pub output_file: Option<String>,
    /// Archive-building tool override (`DPKG_LOCATION`).
    pub dpkg_location: Option<String>,
    /// Whether `SKIP_BUILDING_PACKAGE` was present.
    pub skip_building_package: bool,
}

impl PackageVariables {
    /// Build the variables from the key/value map produced by the upstream
    /// definition loader.
    ///
    /// `SKIP_BUILDING_PACKAGE` is a presence flag; its value is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingVariable`] naming the first required key
    /// that is absent.
    pub fn from_map(vars: &BTreeMap<String, String>) -> Result<Self> {
        let required = |key: &'static str| {
            vars.get(key)
                .cloned()
                .ok_or(BuildError::MissingVariable { key })
        };
        let optional = |key: &str| vars.get(key).cloned();

        Ok(Self {
            short_name: required(keys::SHORT_NAME)?,
            version: PackageVersion::new(required(keys::VERSION)?, optional(keys::RELEASE)),
            platform_arch: required(keys::PFARCH)?,
            maintainer: required(keys::MAINTAINER)?,
            long_name: required(keys::LONG_NAME)?,
            description: required(keys::DESCRIPTION)?,
            output_file: optional(keys::OUTPUTFILE),
            dpkg_location: optional(keys::DPKG_LOCATION),
            skip_building_package: vars.contains_key(keys::SKIP_BUILDING_PACKAGE),
        })
    }

    /// Debian architecture token for `PFARCH`.
    #[must_use]
    pub fn architecture(&self) -> &str {
        debian_architecture(&self.platform_arch)
    }
}

/// A scalar variable value as it may appear in a TOML definition.
///
/// Floats are refused: `1.10` would be read back as `1.1`, so versions must
/// be quoted.
#[derive(Debug)]
enum VariableValue {
    Text(String),
    Integer(i64),
    Flag(bool),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Flag(value) => write!(f, "{value}"),
        }
    }
}

impl<'de> Deserialize<'de> for VariableValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(VariableValueVisitor)
    }
}

struct VariableValueVisitor;

impl Visitor<'_> for VariableValueVisitor {
    type Value = VariableValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string, integer or boolean")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<VariableValue, E> {
        Ok(VariableValue::Text(value.to_owned()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<VariableValue, E> {
        Ok(VariableValue::Integer(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<VariableValue, E> {
        i64::try_from(value)
            .map(VariableValue::Integer)
            .map_err(|_| E::custom(format!("integer {value} is out of range; quote it")))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<VariableValue, E> {
        Ok(VariableValue::Flag(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<VariableValue, E> {
        Err(E::custom(format!(
            "unquoted number {value} would lose digits; write it as a string, e.g. \"1.10\""
        )))
    }
}

impl TryFrom<BTreeMap<String, VariableValue>> for PackageVariables {
    type Error = BuildError;

    fn try_from(raw: BTreeMap<String, VariableValue>) -> Result<Self> {
        let vars = raw
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        Self::from_map(&vars)
    }
}
