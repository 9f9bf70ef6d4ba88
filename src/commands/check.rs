//! The `check` command: build a fresh context per module, run the engine,
//! and hand the reports to the selected writer. Modules share no state and
//! may be checked fully in parallel.

use crate::checks::{run_checks, CheckConfig};
use crate::config::ModlintConfig;
use crate::context::ModuleContext;
use crate::core::errors::Error;
use crate::core::CheckReport;
use crate::io::output::{create_writer, OutputFormat};
use anyhow::Context;
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

pub struct CheckOptions {
    pub paths: Vec<PathBuf>,
    pub accepted_version: Option<String>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub parallel: bool,
}

/// Exit codes: 0 clean, 1 at least one error-severity finding, 2 a module's
/// pass aborted (unloadable manifest) or bad configuration.
pub fn run(options: CheckOptions) -> anyhow::Result<i32> {
    let config = ModlintConfig::load(options.config.as_deref())?;
    let check_config = CheckConfig {
        accepted_version: config.resolve_accepted_version(options.accepted_version)?,
    };

    let outcomes: Vec<(PathBuf, Result<CheckReport, Error>)> = if options.parallel {
        options
            .paths
            .par_iter()
            .map(|path| (path.clone(), check_module(path, &config, &check_config, true)))
            .collect()
    } else {
        options
            .paths
            .iter()
            .map(|path| (path.clone(), check_module(path, &config, &check_config, false)))
            .collect()
    };

    let mut reports = Vec::new();
    let mut aborted = false;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => reports.push(report),
            Err(err) => {
                log::error!("check pass aborted for {}: {err}", path.display());
                aborted = true;
            }
        }
    }

    let out: Box<dyn Write> = match &options.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    create_writer(out, options.format).write_reports(&reports)?;

    if aborted {
        return Ok(2);
    }
    Ok(if reports.iter().any(CheckReport::has_errors) {
        1
    } else {
        0
    })
}

fn check_module(
    path: &PathBuf,
    config: &ModlintConfig,
    check_config: &CheckConfig,
    parallel: bool,
) -> Result<CheckReport, Error> {
    let ctx = ModuleContext::build(path, &config.ignore)?;
    let findings = run_checks(&ctx, check_config, parallel);
    Ok(CheckReport::new(ctx.root().to_path_buf(), findings))
}
