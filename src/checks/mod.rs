//! The rule engine: independent checks that read the [`ModuleContext`] and
//! append findings to a [`DiagnosticSink`]. Checks are order-insensitive,
//! so the engine may fan them out across rayon workers; the sink is the
//! only shared state and findings are stable-sorted before emission.

pub mod coverage;
pub mod duplicates;
pub mod images;
pub mod presence;
pub mod records;
pub mod templates;
pub mod version;

use crate::context::ModuleContext;
use crate::core::Finding;
use parking_lot::Mutex;
use rayon::prelude::*;

/// Host-supplied knobs consumed read-only by the checks.
#[derive(Clone, Debug)]
pub struct CheckConfig {
    /// Accepted platform version, e.g. "14.0".
    pub accepted_version: String,
}

pub trait Check: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run the check once. Per-file read errors degrade to negative results
    /// inside the check and never abort the pass.
    fn run(&self, ctx: &ModuleContext, config: &CheckConfig, sink: &dyn DiagnosticSink);
}

/// Accepts findings from concurrent producers.
pub trait DiagnosticSink: Sync {
    fn report(&self, finding: Finding);
}

/// Mutex-guarded append-only collector.
#[derive(Default)]
pub struct CollectingSink {
    findings: Mutex<Vec<Finding>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings.into_inner()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, finding: Finding) {
        self.findings.lock().push(finding);
    }
}

/// All checks, one instance each per module pass.
pub fn registry() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(presence::FilePresence),
        Box::new(templates::TemplatePlaceholders),
        Box::new(duplicates::DuplicateXmlIds),
        Box::new(version::VersionCompliance),
        Box::new(images::ManifestImages),
        Box::new(coverage::JsCoverage),
    ]
}

/// Run every registered check against one module and return the findings
/// in stable `(code, file, line, args)` order.
pub fn run_checks(ctx: &ModuleContext, config: &CheckConfig, parallel: bool) -> Vec<Finding> {
    let sink = CollectingSink::new();
    let checks = registry();

    if parallel {
        checks.par_iter().for_each(|check| {
            log::debug!("running check {}", check.name());
            check.run(ctx, config, &sink);
        });
    } else {
        for check in &checks {
            log::debug!("running check {}", check.name());
            check.run(ctx, config, &sink);
        }
    }

    let mut findings = sink.into_findings();
    findings.sort_by(Finding::cmp_stable);
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CheckCode, Location};
    use std::fs;

    fn fixture_module() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("__manifest__.py"),
            "{'name': 'demo', 'version': '14.0.1.0.0', 'installable': True}",
        )
        .unwrap();
        dir
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let dir = fixture_module();
        let ctx = ModuleContext::build(dir.path(), &[]).unwrap();
        let config = CheckConfig {
            accepted_version: "14.0".to_string(),
        };
        let sequential = run_checks(&ctx, &config, false);
        let parallel = run_checks(&ctx, &config, true);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let dir = fixture_module();
        let ctx = ModuleContext::build(dir.path(), &[]).unwrap();
        let config = CheckConfig {
            accepted_version: "14.0".to_string(),
        };
        assert_eq!(
            run_checks(&ctx, &config, true),
            run_checks(&ctx, &config, true)
        );
    }

    #[test]
    fn sink_accepts_concurrent_producers() {
        let sink = CollectingSink::new();
        rayon::scope(|s| {
            for i in 0..8 {
                let sink = &sink;
                s.spawn(move |_| {
                    sink.report(Finding::new(
                        CheckCode::AbsentDoc,
                        vec![],
                        Location::new(format!("f{i}"), 0),
                    ));
                });
            }
        });
        assert_eq!(sink.into_findings().len(), 8);
    }
}
