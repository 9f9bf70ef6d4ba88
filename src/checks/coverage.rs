//! JS test-coverage heuristic: when a module ships front-end scripts, at
//! least one test-suite source must invoke a known browser test helper.
//! Purely textual; a marker reached via indirection is a known false
//! negative and accepted.

use super::{Check, CheckConfig, DiagnosticSink};
use crate::context::ModuleContext;
use crate::core::{CheckCode, Finding, Location};

/// Known UI-test invocation markers.
pub const UI_TEST_MARKERS: &[&str] = &["self.phantom_js", "self.browser_js", "start_tour"];

/// Bundled third-party assets are not the module's own front-end code.
const LIB_PREFIX: &str = "static/lib";

const TESTS_PREFIX: &str = "tests";

pub struct JsCoverage;

impl Check for JsCoverage {
    fn name(&self) -> &'static str {
        "js-coverage"
    }

    fn run(&self, ctx: &ModuleContext, _config: &CheckConfig, sink: &dyn DiagnosticSink) {
        let has_own_js = ctx
            .files_with_ext("js")
            .iter()
            .any(|rel| !rel.starts_with(LIB_PREFIX));
        if !has_own_js {
            return;
        }

        for rel in ctx.files_with_ext("py") {
            if !rel.starts_with(TESTS_PREFIX) {
                continue;
            }
            match ctx.read_to_string(rel) {
                Ok(content) if has_marker(&content) => return,
                Ok(_) => {}
                Err(err) => log::warn!("skipping unreadable {}: {err}", rel.display()),
            }
        }

        sink.report(Finding::new(
            CheckCode::JsEmptyCoverage,
            vec![],
            Location::file(ctx.manifest_file()),
        ));
    }
}

fn has_marker(content: &str) -> bool {
    UI_TEST_MARKERS.iter().any(|marker| content.contains(marker))
}
