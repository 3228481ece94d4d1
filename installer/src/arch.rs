//! Architecture name normalization for Debian packages.

/// Map a canonical CPU architecture identifier to the Debian token.
///
/// Only the two identifiers whose Debian names differ are translated; every
/// other value is returned unchanged.
///
/// # Examples
///
/// ```
/// use debstage::arch::debian_architecture;
///
/// assert_eq!(debian_architecture("x86_64"), "amd64");
/// assert_eq!(debian_architecture("aarch64"), "arm64");
/// assert_eq!(debian_architecture("ppc64el"), "ppc64el");
/// ```
#[must_use]
pub fn debian_architecture(raw: &str) -> &str {
    match raw {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        other => other,
    }
}
