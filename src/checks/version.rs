//! Version compliance: the manifest's declared platform version (the first
//! two dot-separated components of `version`) must equal the configured
//! accepted platform version. Non-installable modules are exempt.

use super::{Check, CheckConfig, DiagnosticSink};
use crate::context::ModuleContext;
use crate::core::{CheckCode, Finding, Location};
use serde_json::{Map, Value};

/// First two dot-separated components, e.g. "14.0.1.0.0" -> "14.0".
pub fn platform_of(version: &str) -> String {
    version.split('.').take(2).collect::<Vec<_>>().join(".")
}

/// The args of the finding to emit, or None when compliant. A missing or
/// empty version is non-compliant, not a skip.
pub fn version_violation(
    manifest: &Map<String, Value>,
    accepted_version: &str,
) -> Option<[String; 2]> {
    let installable = manifest
        .get("installable")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    if !installable {
        return None;
    }
    let declared = platform_of(manifest.get("version").and_then(Value::as_str).unwrap_or(""));
    if declared == accepted_version {
        None
    } else {
        Some([declared, accepted_version.to_string()])
    }
}

pub struct VersionCompliance;

impl Check for VersionCompliance {
    fn name(&self) -> &'static str {
        "version-compliance"
    }

    fn run(&self, ctx: &ModuleContext, config: &CheckConfig, sink: &dyn DiagnosticSink) {
        if let Some(args) = version_violation(ctx.manifest(), &config.accepted_version) {
            sink.report(Finding::new(
                CheckCode::ManifestVersion,
                args.to_vec(),
                Location::file(ctx.manifest_file()),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn manifest(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn platform_is_the_first_two_components() {
        assert_eq!(platform_of("14.0.1.0.0"), "14.0");
        assert_eq!(platform_of("15.0"), "15.0");
        assert_eq!(platform_of("14"), "14");
        assert_eq!(platform_of(""), "");
    }

    #[test]
    fn matching_platform_passes() {
        let m = manifest(json!({"version": "14.0.1.0.0", "installable": true}));
        assert_eq!(version_violation(&m, "14.0"), None);
    }

    #[test]
    fn mismatch_reports_declared_and_accepted() {
        let m = manifest(json!({"version": "14.0.1.0.0", "installable": true}));
        assert_eq!(
            version_violation(&m, "15.0"),
            Some(["14.0".to_string(), "15.0".to_string()])
        );
    }

    #[test]
    fn non_installable_is_vacuously_compliant() {
        let m = manifest(json!({"version": "1.2.3", "installable": false}));
        assert_eq!(version_violation(&m, "15.0"), None);
        let m = manifest(json!({"installable": false}));
        assert_eq!(version_violation(&m, "15.0"), None);
    }

    #[test]
    fn missing_or_empty_version_is_non_compliant() {
        let m = manifest(json!({"installable": true}));
        assert_eq!(
            version_violation(&m, "14.0"),
            Some(["".to_string(), "14.0".to_string()])
        );
        let m = manifest(json!({"version": ""}));
        assert_eq!(
            version_violation(&m, "14.0"),
            Some(["".to_string(), "14.0".to_string()])
        );
    }

    #[test]
    fn installable_defaults_to_true() {
        let m = manifest(json!({"version": "13.0.1.0"}));
        assert!(version_violation(&m, "14.0").is_some());
    }
}
