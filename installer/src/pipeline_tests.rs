//! Unit tests for pipeline orchestration.
//!
//! A real temporary staging root is used so scripts and control files are
//! written to disk; every external command is served by an ordered mock.

use super::*;
use crate::definition::PackageDefinition;
use crate::error::BuildError;
use crate::package::SENTINEL_FILE;
use crate::process::MockCommandExecutor;
use crate::test_utils::{failure_output, output_with_stdout};
use camino::Utf8PathBuf;
use mockall::Sequence;
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

const DEFINITION: &str = r#"
dependencies = ["libc6"]

[variables]
SHORT_NAME = "mypkg"
VERSION = "1.0"
RELEASE = "1"
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

[[directories]]
path = "/opt/mypkg"
owner = "root"
group = "staff"
permissions = "755"

[[links]]
path = "/usr/bin/mypkg"
owner = "root"
group = "root"
"#;

struct Workspace {
    staging: StagingRoot,
    target: Utf8PathBuf,
    definition: PackageDefinition,
    _temp: TempDir,
}

impl Workspace {
    fn root(&self) -> &str {
        self.staging.path().as_str()
    }

    fn context(&self) -> PipelineContext<'_> {
        PipelineContext {
            staging: &self.staging,
            target_dir: &self.target,
            definition: &self.definition,
        }
    }

    /// Every command a successful run issues, in order.
    fn expected_commands(&self) -> Vec<String> {
        let root = self.root();
        let debian = format!("{root}/DEBIAN");
        vec![
            format!(
                "chown --no-dereference 0:0 {debian}/preinst {debian}/postinst {debian}/prerm {debian}/postrm"
            ),
            format!("chown root:root {root}/etc/mypkg.conf"),
            format!("chmod 644 {root}/etc/mypkg.conf"),
            format!("chown root:staff {root}/opt/mypkg"),
            format!("chmod 755 {root}/opt/mypkg"),
            format!("chown --no-dereference root:root {root}/usr/bin/mypkg"),
            format!("du -s {root}"),
            format!("chown --no-dereference 0:0 {debian}/control {debian}/conffiles"),
            format!("dpkg-deb -b {root} mypkg-1.0-1.amd64.deb"),
        ]
    }
}

#[fixture]
fn workspace() -> Workspace {
    let temp = TempDir::new().expect("temp dir");
    let base = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("temp path is UTF-8");
    let root = base.join("stage");
    let target = base.join("out");
    fs::create_dir_all(&root).expect("create staging root");
    fs::create_dir_all(&target).expect("create target dir");

    Workspace {
        staging: StagingRoot::new(root),
        target,
        definition: PackageDefinition::parse(DEFINITION).expect("valid definition"),
        _temp: temp,
    }
}

/// Expect `commands` in order; the command at `failing_index` exits 1.
fn ordered_executor(commands: Vec<String>, failing_index: Option<usize>) -> MockCommandExecutor {
    let mut executor = MockCommandExecutor::new();
    let mut seq = Sequence::new();
    for (index, expected) in commands.into_iter().enumerate() {
        let fails = Some(index) == failing_index;
        let stdout = if expected.starts_with("du ") {
            "16\t/stage\n"
        } else {
            ""
        };
        executor
            .expect_run()
            .withf(move |invocation| invocation.to_string() == expected)
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| {
                Ok(if fails {
                    failure_output("")
                } else {
                    output_with_stdout(stdout)
                })
            });
    }
    executor
}

#[rstest]
fn runs_every_step_in_order(workspace: Workspace) {
    let executor = ordered_executor(workspace.expected_commands(), None);

    let outcome = run_pipeline(&workspace.context(), &executor).expect("pipeline succeeds");

    assert_eq!(outcome.filename(), "mypkg-1.0-1.amd64.deb");
    let control = fs::read_to_string(workspace.staging.control_path("control")).expect("control");
    assert!(control.contains("Installed-Size: 16\n"));
    assert!(control.contains("Depends:      libc6\n"));
    let sentinel = fs::read_to_string(workspace.target.join(SENTINEL_FILE)).expect("sentinel");
    assert_eq!(sentinel, "mypkg-1.0-1.amd64.deb\n");
}

#[rstest]
fn skip_flag_stops_before_dpkg(mut workspace: Workspace) {
    workspace.definition.variables.skip_building_package = true;
    let mut commands = workspace.expected_commands();
    commands.pop();
    let executor = ordered_executor(commands, None);

    let outcome = run_pipeline(&workspace.context(), &executor).expect("pipeline succeeds");

    assert!(matches!(outcome, BuildOutcome::Skipped { .. }));
    assert!(workspace.staging.control_path("conffiles").is_file());
    assert!(!workspace.target.join(SENTINEL_FILE).exists());
}

#[rstest]
#[case::scripts_chown(0)]
#[case::file_chmod(2)]
#[case::link_chown(5)]
#[case::disk_usage(6)]
#[case::control_chown(7)]
#[case::archive(8)]
fn stops_at_first_failing_command(workspace: Workspace, #[case] failing_index: usize) {
    let mut commands = workspace.expected_commands();
    commands.truncate(failing_index + 1);
    let executor = ordered_executor(commands, Some(failing_index));

    let err = run_pipeline(&workspace.context(), &executor).expect_err("pipeline fails");

    let expected_kind = match failing_index {
        0 | 7 => matches!(err, BuildError::OwnershipChange { .. }),
        2 => matches!(err, BuildError::PermissionChange { .. }),
        5 => matches!(err, BuildError::LinkOwnershipChange { .. }),
        6 => matches!(err, BuildError::DiskUsage { .. }),
        8 => matches!(err, BuildError::ArchiveBuild { .. }),
        _ => false,
    };
    assert!(expected_kind, "unexpected error {err:?} at {failing_index}");
}

#[test]
fn missing_staging_root_fails_before_any_command() {
    let temp = TempDir::new().expect("temp dir");
    let base = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("temp path is UTF-8");
    let staging = StagingRoot::new(base.join("absent"));
    let definition = PackageDefinition::parse(DEFINITION).expect("valid definition");
    let context = PipelineContext {
        staging: &staging,
        target_dir: &base,
        definition: &definition,
    };

    let err = run_pipeline(&context, &MockCommandExecutor::new()).expect_err("missing root");
    assert!(matches!(err, BuildError::StagingRootMissing { .. }));
}

#[test]
fn stage_labels_are_readable() {
    assert_eq!(PipelineStage::PermissionsApplied.to_string(), "permissions applied");
    assert_eq!(PipelineStage::Done.to_string(), "done");
}
