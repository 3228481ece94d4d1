//! Octal permission bits for staged entries.

use crate::error::BuildError;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

const MAX_MODE: u32 = 0o7777;

/// Permission bits applied to a staged file or directory.
///
/// Definitions write modes the way `chmod` expects them: `"755"`, `"0644"`,
/// or the bare integer `755`, whose decimal digits are read as octal.
///
/// # Examples
///
/// ```
/// use debstage::definition::Mode;
///
/// let mode: Mode = "0755".parse().expect("valid mode");
/// assert_eq!(mode.bits(), 0o755);
/// assert_eq!(mode.to_string(), "755");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode(u32);

impl Mode {
    /// Mode given to generated lifecycle scripts.
    pub const EXECUTABLE: Self = Self(0o755);

    /// Wrap raw permission bits.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidMode`] if `bits` exceeds `0o7777`.
    pub fn from_bits(bits: u32) -> Result<Self, BuildError> {
        if bits > MAX_MODE {
            return Err(BuildError::InvalidMode {
                value: format!("{bits:o}"),
            });
        }
        Ok(Self(bits))
    }

    /// The raw permission bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

impl FromStr for Mode {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BuildError::InvalidMode {
            value: s.to_owned(),
        };
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(invalid());
        }
        let bits = u32::from_str_radix(digits, 8).map_err(|_| invalid())?;
        Self::from_bits(bits).map_err(|_| invalid())
    }
}

impl TryFrom<i64> for Mode {
    type Error = BuildError;

    /// Reads the decimal digits of `value` as octal, so `755` means `0o755`.
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(BuildError::InvalidMode {
                value: value.to_string(),
            });
        }
        value
            .to_string()
            .parse()
            .map_err(|_| BuildError::InvalidIntegerMode { value })
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ModeVisitor)
    }
}

struct ModeVisitor;

impl Visitor<'_> for ModeVisitor {
    type Value = Mode;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an octal permission mode such as \"755\" or 644")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Mode, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Mode, E> {
        Mode::try_from(value).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Mode, E> {
        let value = i64::try_from(value).map_err(|_| {
            E::custom(BuildError::InvalidMode {
                value: value.to_string(),
            })
        })?;
        self.visit_i64(value)
    }
}
