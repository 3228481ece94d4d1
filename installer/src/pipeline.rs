//! Packaging pipeline orchestration.
//!
//! The pipeline drives every component in a fixed order against one staging
//! root. Each step must succeed before the next starts: maintainer scripts
//! and entry attributes are applied first so the size and metadata reflect
//! the final tree, then the control files are written and the archive built.
//! The first failing step ends the run and its error is returned unchanged.

use crate::control::write_control_files;
use crate::definition::PackageDefinition;
use crate::error::Result;
use crate::package::{BuildOutcome, build_package};
use crate::permissions::apply_permissions;
use crate::process::CommandExecutor;
use crate::scripts::write_scripts;
use crate::size::installed_size;
use crate::staging::StagingRoot;
use camino::Utf8Path;
use log::{debug, info, warn};
use std::fmt;

/// Progress of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Nothing has run yet.
    Init,
    /// Maintainer scripts are written and owned by root.
    ScriptsWritten,
    /// Declared ownership and modes are applied.
    PermissionsApplied,
    /// The installed size is known.
    SizeComputed,
    /// `control` and `conffiles` are written and owned by root.
    ControlWritten,
    /// The archive build was skipped.
    Skipped,
    /// The archive was built.
    Built,
    /// The run completed.
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Init => "init",
            Self::ScriptsWritten => "scripts written",
            Self::PermissionsApplied => "permissions applied",
            Self::SizeComputed => "size computed",
            Self::ControlWritten => "control written",
            Self::Skipped => "skipped",
            Self::Built => "built",
            Self::Done => "done",
        };
        f.write_str(label)
    }
}

/// Inputs for a pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineContext<'a> {
    /// Pre-populated staging tree.
    pub staging: &'a StagingRoot,
    /// Directory receiving the archive and the sentinel file.
    pub target_dir: &'a Utf8Path,
    /// Package variables and sections.
    pub definition: &'a PackageDefinition,
}

/// Run every packaging step against the staging root.
///
/// # Errors
///
/// Returns the error of the first failing step. Side effects of earlier
/// steps are not rolled back.
pub fn run_pipeline(
    context: &PipelineContext<'_>,
    executor: &dyn CommandExecutor,
) -> Result<BuildOutcome> {
    let mut stage = PipelineStage::Init;
    let result = run_stages(context, executor, &mut stage);
    match &result {
        Ok(outcome) => info!("packaging of {} finished", outcome.filename()),
        Err(err) => warn!("packaging failed after stage '{stage}': {err}"),
    }
    result
}

fn run_stages(
    context: &PipelineContext<'_>,
    executor: &dyn CommandExecutor,
    stage: &mut PipelineStage,
) -> Result<BuildOutcome> {
    let PipelineContext {
        staging,
        target_dir,
        definition,
    } = *context;
    let sections = &definition.sections;

    debug!("preparing staging root {}", staging.path());
    staging.prepare()?;

    write_scripts(staging, &sections.scripts, executor)?;
    advance(stage, PipelineStage::ScriptsWritten);

    apply_permissions(staging, sections, executor)?;
    advance(stage, PipelineStage::PermissionsApplied);

    let size = installed_size(staging, executor)?;
    advance(stage, PipelineStage::SizeComputed);

    write_control_files(staging, definition, size, executor)?;
    advance(stage, PipelineStage::ControlWritten);

    let outcome = build_package(staging, target_dir, &definition.variables, executor)?;
    advance(
        stage,
        match outcome {
            BuildOutcome::Skipped { .. } => PipelineStage::Skipped,
            BuildOutcome::Built { .. } => PipelineStage::Built,
        },
    );

    advance(stage, PipelineStage::Done);
    Ok(outcome)
}

fn advance(stage: &mut PipelineStage, next: PipelineStage) {
    debug!("pipeline stage: {stage} -> {next}");
    *stage = next;
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
