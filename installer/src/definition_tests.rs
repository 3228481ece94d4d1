//! Tests for package definition loading.

use super::*;
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

const FULL_DEFINITION: &str = r#"
dependencies = ["libc6 (>= 2.17)", "openssl"]

[variables]
SHORT_NAME = "mypkg"
VERSION = "1.0"
RELEASE = 1
PFARCH = "x86_64"
MAINTAINER = "Ops <ops@example.com>"
LONG_NAME = "My package"
DESCRIPTION = "Does things."

[[files]]
path = "/etc/mypkg.conf"
owner = "root"
group = "root"
permissions = "644"
type = "conffile"

[[files]]
path = "/opt/mypkg/bin/tool"
owner = "root"
group = "staff"
permissions = 755

[[directories]]
path = "/opt/mypkg"
owner = "root"
group = "root"
permissions = "0755"

[[links]]
path = "/usr/bin/tool"
owner = "root"
group = "root"

[scripts]
preinstall = ["echo pre"]
postuninstall = ["rm -rf /var/lib/mypkg", "echo done"]
"#;

#[test]
fn parses_complete_definition() {
    let definition = PackageDefinition::parse(FULL_DEFINITION).expect("definition should parse");

    assert_eq!(definition.variables.short_name, "mypkg");
    assert_eq!(definition.variables.version.dotted(), "1.0.1");
    assert_eq!(definition.variables.architecture(), "amd64");

    let sections = &definition.sections;
    assert_eq!(sections.dependencies, ["libc6 (>= 2.17)", "openssl"]);
    assert_eq!(sections.files.len(), 2);
    assert_eq!(sections.files[0].permissions.bits(), 0o644);
    assert_eq!(sections.files[1].permissions.bits(), 0o755);
    assert_eq!(sections.directories[0].permissions.bits(), 0o755);
    assert_eq!(sections.links[0].staged_path, "/usr/bin/tool");
    assert_eq!(sections.scripts.preinstall, ["echo pre"]);
    assert!(sections.scripts.postinstall.is_empty());
    assert_eq!(sections.scripts.postuninstall.len(), 2);
}

#[test]
fn conffiles_lists_only_flagged_files_in_order() {
    let definition = PackageDefinition::parse(FULL_DEFINITION).expect("definition should parse");
    let conffiles: Vec<&str> = definition.sections.conffiles().collect();
    assert_eq!(conffiles, ["/etc/mypkg.conf"]);
}

#[test]
fn sections_default_to_empty() {
    let contents = r#"
[variables]
SHORT_NAME = "bare"
VERSION = "2"
PFARCH = "aarch64"
MAINTAINER = "m"
LONG_NAME = "l"
DESCRIPTION = "d"
"#;
    let definition = PackageDefinition::parse(contents).expect("definition should parse");
    assert_eq!(definition.sections, PackageSections::default());
}

#[test]
fn skip_flag_accepts_any_value() {
    let contents = r#"
[variables]
SHORT_NAME = "bare"
VERSION = "2"
PFARCH = "aarch64"
MAINTAINER = "m"
LONG_NAME = "l"
DESCRIPTION = "d"
SKIP_BUILDING_PACKAGE = true
"#;
    let definition = PackageDefinition::parse(contents).expect("definition should parse");
    assert!(definition.variables.skip_building_package);
}

#[rstest]
#[case::missing_variable(
    "[variables]\nSHORT_NAME = \"x\"\n",
    "VERSION"
)]
#[case::bad_mode(
    concat!(
        "[variables]\nSHORT_NAME = \"x\"\nVERSION = \"1\"\nPFARCH = \"x\"\n",
        "MAINTAINER = \"m\"\nLONG_NAME = \"l\"\nDESCRIPTION = \"d\"\n",
        "[[directories]]\npath = \"/d\"\nowner = \"root\"\ngroup = \"root\"\npermissions = \"rwx\"\n",
    ),
    "rwx"
)]
#[case::float_version(
    concat!(
        "[variables]\nSHORT_NAME = \"x\"\nVERSION = 1.10\nPFARCH = \"x\"\n",
        "MAINTAINER = \"m\"\nLONG_NAME = \"l\"\nDESCRIPTION = \"d\"\n",
    ),
    "would lose digits"
)]
#[case::float_release(
    concat!(
        "[variables]\nSHORT_NAME = \"x\"\nVERSION = \"1\"\nRELEASE = 1.0\nPFARCH = \"x\"\n",
        "MAINTAINER = \"m\"\nLONG_NAME = \"l\"\nDESCRIPTION = \"d\"\n",
    ),
    "write it as a string"
)]
#[case::misspelled_section(
    concat!(
        "[variables]\nSHORT_NAME = \"x\"\nVERSION = \"1\"\nPFARCH = \"x\"\n",
        "MAINTAINER = \"m\"\nLONG_NAME = \"l\"\nDESCRIPTION = \"d\"\n",
        "[[file]]\npath = \"/etc/x.conf\"\nowner = \"root\"\ngroup = \"root\"\npermissions = \"644\"\n",
    ),
    "unknown field `file`"
)]
#[case::misspelled_hook(
    concat!(
        "[variables]\nSHORT_NAME = \"x\"\nVERSION = \"1\"\nPFARCH = \"x\"\n",
        "MAINTAINER = \"m\"\nLONG_NAME = \"l\"\nDESCRIPTION = \"d\"\n",
        "[scripts]\npostinstal = [\"ldconfig\"]\n",
    ),
    "unknown field `postinstal`"
)]
#[case::misspelled_entry_key(
    concat!(
        "[variables]\nSHORT_NAME = \"x\"\nVERSION = \"1\"\nPFARCH = \"x\"\n",
        "MAINTAINER = \"m\"\nLONG_NAME = \"l\"\nDESCRIPTION = \"d\"\n",
        "[[links]]\npath = \"/usr/bin/x\"\nowner = \"root\"\ngroup = \"root\"\nmode = \"777\"\n",
    ),
    "unknown field `mode`"
)]
#[case::octal_literal_mode(
    concat!(
        "[variables]\nSHORT_NAME = \"x\"\nVERSION = \"1\"\nPFARCH = \"x\"\n",
        "MAINTAINER = \"m\"\nLONG_NAME = \"l\"\nDESCRIPTION = \"d\"\n",
        "[[directories]]\npath = \"/d\"\nowner = \"root\"\ngroup = \"root\"\npermissions = 0o755\n",
    ),
    "decimal digits"
)]
fn rejects_invalid_definitions(#[case] contents: &str, #[case] expected_fragment: &str) {
    let err = PackageDefinition::parse(contents).expect_err("definition should be rejected");
    assert!(
        err.contains(expected_fragment),
        "expected {expected_fragment:?} in {err:?}"
    );
}

#[test]
fn load_reports_missing_file() {
    let temp = TempDir::new().expect("temp dir");
    let path = camino::Utf8PathBuf::try_from(temp.path().join("absent.toml"))
        .expect("temp path is UTF-8");

    let err = PackageDefinition::load(&path).expect_err("load should fail");
    assert!(matches!(err, BuildError::DefinitionNotFound { .. }));
}

#[test]
fn load_wraps_parse_errors_with_path() {
    let temp = TempDir::new().expect("temp dir");
    let path = camino::Utf8PathBuf::try_from(temp.path().join("broken.toml"))
        .expect("temp path is UTF-8");
    fs::write(&path, "this is not toml {{{").expect("write definition");

    let err = PackageDefinition::load(&path).expect_err("load should fail");
    assert!(matches!(err, BuildError::InvalidDefinition { path: p, .. } if p == path));
}

#[test]
fn load_reads_definition_from_disk() {
    let temp = TempDir::new().expect("temp dir");
    let path = camino::Utf8PathBuf::try_from(temp.path().join("pkg.toml"))
        .expect("temp path is UTF-8");
    fs::write(&path, FULL_DEFINITION).expect("write definition");

    let definition = PackageDefinition::load(&path).expect("load should succeed");
    assert_eq!(definition.variables.short_name, "mypkg");
}
