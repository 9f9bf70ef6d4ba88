//! Conventionally-required files: documentation index, changelog, icon
//! asset, and the HTML description page.

use super::{Check, CheckConfig, DiagnosticSink};
use crate::context::ModuleContext;
use crate::core::{CheckCode, Finding, Location};

const REQUIRED_FILES: &[(&str, CheckCode)] = &[
    ("doc/index.rst", CheckCode::AbsentDoc),
    ("doc/changelog.rst", CheckCode::AbsentChangelog),
    ("static/description/icon.png", CheckCode::AbsentIcon),
    ("static/description/index.html", CheckCode::AbsentIndexHtml),
];

pub struct FilePresence;

impl Check for FilePresence {
    fn name(&self) -> &'static str {
        "file-presence"
    }

    fn run(&self, ctx: &ModuleContext, _config: &CheckConfig, sink: &dyn DiagnosticSink) {
        for (path, code) in REQUIRED_FILES {
            if !ctx.exists(path) {
                sink.report(Finding::new(*code, vec![], Location::file(*path)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CollectingSink;
    use std::fs;

    fn check(files: &[&str]) -> Vec<CheckCode> {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("__manifest__.py"), "{}").unwrap();
        for file in files {
            let full = dir.path().join(file);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, "x").unwrap();
        }
        let ctx = ModuleContext::build(dir.path(), &[]).unwrap();
        let config = CheckConfig {
            accepted_version: "14.0".into(),
        };
        let sink = CollectingSink::new();
        FilePresence.run(&ctx, &config, &sink);
        let mut codes: Vec<_> = sink.into_findings().into_iter().map(|f| f.code).collect();
        codes.sort();
        codes
    }

    #[test]
    fn complete_module_yields_nothing() {
        assert!(check(&[
            "doc/index.rst",
            "doc/changelog.rst",
            "static/description/icon.png",
            "static/description/index.html",
        ])
        .is_empty());
    }

    #[test]
    fn each_missing_file_maps_to_its_own_code() {
        let codes = check(&["doc/index.rst", "static/description/icon.png"]);
        assert_eq!(
            codes,
            vec![CheckCode::AbsentChangelog, CheckCode::AbsentIndexHtml]
        );
    }
}
