//! Declared image assets: the manifest's `images` entries must all be
//! rooted under `images/` and exist on disk. Every entry is validated; a
//! module with no declared images fails outright.

use super::{Check, CheckConfig, DiagnosticSink};
use crate::context::ModuleContext;
use crate::core::{CheckCode, Finding, Location};
use serde_json::Value;

/// Arg used when the manifest declares no images at all, keeping the code
/// at a fixed arity of one.
const NO_IMAGES: &str = "(no images declared)";

const IMAGES_PREFIX: &str = "images/";

pub struct ManifestImages;

impl Check for ManifestImages {
    fn name(&self) -> &'static str {
        "manifest-images"
    }

    fn run(&self, ctx: &ModuleContext, _config: &CheckConfig, sink: &dyn DiagnosticSink) {
        let location = Location::file(ctx.manifest_file());
        let declared: Vec<&str> = ctx
            .manifest()
            .get("images")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        if declared.is_empty() {
            sink.report(Finding::new(
                CheckCode::ManifestImage,
                vec![NO_IMAGES.to_string()],
                location,
            ));
            return;
        }

        for entry in declared {
            if !entry.starts_with(IMAGES_PREFIX) || !ctx.exists(entry) {
                sink.report(Finding::new(
                    CheckCode::ManifestImage,
                    vec![entry.to_string()],
                    location.clone(),
                ));
            }
        }
    }
}
