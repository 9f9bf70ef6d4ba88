//! Unfilled template placeholders: `{...}` tokens left behind by module
//! scaffolding, in manifest string values (prefix match) and in the named
//! documentation files (match anywhere).

use super::{Check, CheckConfig, DiagnosticSink};
use crate::context::ModuleContext;
use crate::core::{CheckCode, Finding, Location};
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;

/// Documentation files scanned for placeholders, by module-relative path.
pub const TEMPLATE_FILES: &[&str] = &["README.rst", "doc/index.rst", "doc/changelog.rst"];

/// Character before a token that marks it as intentional, not a template.
const ESCAPE_CHAR: u8 = b'$';

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\{[_ a-zA-Z0-9,./'"]*\}"#).unwrap())
}

fn escaped(text: &str, start: usize) -> bool {
    start > 0 && text.as_bytes()[start - 1] == ESCAPE_CHAR
}

/// All non-overlapping unescaped tokens in a text blob, with byte offsets.
pub fn find_tokens(text: &str) -> Vec<(usize, &str)> {
    token_re()
        .find_iter(text)
        .filter(|m| !escaped(text, m.start()))
        .map(|m| (m.start(), m.as_str()))
        .collect()
}

/// The token a text blob starts with, if any. Manifest fields are short
/// template-generated sentences, so only a leading token counts there.
pub fn leading_token(text: &str) -> Option<&str> {
    token_re()
        .find(text)
        .filter(|m| m.start() == 0)
        .map(|m| m.as_str())
}

fn line_of(text: &str, offset: usize) -> usize {
    1 + text.as_bytes()[..offset].iter().filter(|b| **b == b'\n').count()
}

pub struct TemplatePlaceholders;

impl TemplatePlaceholders {
    fn check_manifest(&self, ctx: &ModuleContext, sink: &dyn DiagnosticSink) {
        for value in ctx.manifest().values() {
            if let Value::String(text) = value {
                if leading_token(text).is_some() {
                    sink.report(Finding::new(
                        CheckCode::ManifestTemplateField,
                        vec![text.clone()],
                        Location::file(ctx.manifest_file()),
                    ));
                }
            }
        }
    }

    fn check_docs(&self, ctx: &ModuleContext, sink: &dyn DiagnosticSink) {
        for rel in ctx.files_with_ext("rst") {
            if !TEMPLATE_FILES.iter().any(|t| rel == Path::new(t)) {
                continue;
            }
            let content = match ctx.read_to_string(rel) {
                Ok(content) => content,
                Err(err) => {
                    log::warn!("skipping unreadable {}: {err}", rel.display());
                    continue;
                }
            };
            let name = rel.to_string_lossy().into_owned();
            for (offset, token) in find_tokens(&content) {
                sink.report(Finding::new(
                    CheckCode::RstTemplateField,
                    vec![name.clone(), token.to_string()],
                    Location::new(rel.clone(), line_of(&content, offset)),
                ));
            }
        }
    }
}

impl Check for TemplatePlaceholders {
    fn name(&self) -> &'static str {
        "template-placeholders"
    }

    fn run(&self, ctx: &ModuleContext, _config: &CheckConfig, sink: &dyn DiagnosticSink) {
        self.check_manifest(ctx, sink);
        self.check_docs(ctx, sink);
    }
}
