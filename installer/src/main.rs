//! debstage CLI entrypoint.
//!
//! This binary loads a package definition, drives the packaging pipeline
//! against a pre-populated staging directory, and is the only place where a
//! failure becomes a non-zero exit status.

use clap::Parser;
use debstage::cli::Cli;
use debstage::definition::PackageDefinition;
use debstage::error::Result;
use debstage::output::{outcome_message, write_stderr_line};
use debstage::package::BuildOutcome;
use debstage::pipeline::{PipelineContext, run_pipeline};
use debstage::process::{CommandExecutor, SystemCommandExecutor};
use debstage::staging::StagingRoot;
use log::debug;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &SystemCommandExecutor, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Install `env_logger` at the level implied by the flags; `RUST_LOG` still
/// takes precedence.
fn init_logging(cli: &Cli) {
    if env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
        .is_err()
    {
        // A logger is already installed; keep it.
    }
}

fn run(cli: &Cli, executor: &dyn CommandExecutor, stderr: &mut dyn Write) -> Result<BuildOutcome> {
    let mut definition = PackageDefinition::load(&cli.definition)?;
    cli.apply_overrides(&mut definition.variables);

    if let Some(dir) = &cli.intermediate_dir {
        debug!("intermediate directory {dir} is not used by the packaging pipeline");
    }

    let staging = StagingRoot::new(cli.staging_dir.clone());
    let context = PipelineContext {
        staging: &staging,
        target_dir: &cli.target_dir,
        definition: &definition,
    };
    let outcome = run_pipeline(&context, executor)?;

    if !cli.quiet {
        write_stderr_line(stderr, outcome_message(&outcome));
    }
    Ok(outcome)
}

fn exit_code_for_run_result<T>(result: Result<T>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
