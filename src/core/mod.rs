pub mod errors;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

/// Stable diagnostic codes emitted by the check engine. Test suites assert
/// against the kebab-case string forms.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum CheckCode {
    ManifestTemplateField,
    AbsentDoc,
    AbsentChangelog,
    RstTemplateField,
    AbsentIcon,
    XmlIdDuplicated,
    JsEmptyCoverage,
    AbsentIndexHtml,
    ManifestImage,
    ManifestVersion,
}

/// All codes, for arity/severity sweeps in tests and docs.
pub const ALL_CODES: &[CheckCode] = &[
    CheckCode::ManifestTemplateField,
    CheckCode::AbsentDoc,
    CheckCode::AbsentChangelog,
    CheckCode::RstTemplateField,
    CheckCode::AbsentIcon,
    CheckCode::XmlIdDuplicated,
    CheckCode::JsEmptyCoverage,
    CheckCode::AbsentIndexHtml,
    CheckCode::ManifestImage,
    CheckCode::ManifestVersion,
];

impl CheckCode {
    pub fn as_str(&self) -> &'static str {
        static STRINGS: &[(CheckCode, &str)] = &[
            (CheckCode::ManifestTemplateField, "manifest-template-field"),
            (CheckCode::AbsentDoc, "absent-doc"),
            (CheckCode::AbsentChangelog, "absent-changelog"),
            (CheckCode::RstTemplateField, "rst-template-field"),
            (CheckCode::AbsentIcon, "absent-icon"),
            (CheckCode::XmlIdDuplicated, "xml-id-duplicated"),
            (CheckCode::JsEmptyCoverage, "js-empty-coverage"),
            (CheckCode::AbsentIndexHtml, "absent-index-html"),
            (CheckCode::ManifestImage, "manifest-image"),
            (CheckCode::ManifestVersion, "manifest-version"),
        ];

        STRINGS
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, s)| *s)
            .unwrap_or("unknown")
    }

    /// Message template for the code. `%s` markers are substituted with the
    /// finding's positional args, in order.
    pub fn message_template(&self) -> &'static str {
        match self {
            CheckCode::ManifestTemplateField => "Placeholder \"%s\" is not updated",
            CheckCode::AbsentDoc => "File doc/index.rst is absent in module",
            CheckCode::AbsentChangelog => "File doc/changelog.rst is absent in module",
            CheckCode::RstTemplateField => {
                "File: %s - Template placeholder \"%s\" is not updated"
            }
            CheckCode::AbsentIcon => "File static/description/icon.png is absent in module",
            CheckCode::XmlIdDuplicated => {
                "Duplicated xml id \"%s\" in file \"%s\" and file \"%s\". \
                 Did you forget to update it after copy-paste?"
            }
            CheckCode::JsEmptyCoverage => {
                "JS files are not covered (no browser test helper is used). Please add js tests"
            }
            CheckCode::AbsentIndexHtml => {
                "File static/description/index.html is absent in module"
            }
            CheckCode::ManifestImage => "Manifest image \"%s\" is absent or not rooted at images/",
            CheckCode::ManifestVersion => {
                "Module version \"%s\" does not match accepted platform version \"%s\""
            }
        }
    }

    /// Number of positional args the code's template expects.
    pub fn arity(&self) -> usize {
        self.message_template().matches("%s").count()
    }

    pub fn severity(&self) -> Severity {
        match self {
            CheckCode::JsEmptyCoverage => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for CheckCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{label}")
    }
}

/// Position a finding points at, relative to the module root. Line 0 means
/// the finding concerns the file (or the module) as a whole.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Whole-file location (line 0).
    pub fn file(file: impl Into<PathBuf>) -> Self {
        Self::new(file, 0)
    }
}

/// One diagnostic produced by a check. Append-only: findings are never
/// mutated after creation.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Finding {
    pub code: CheckCode,
    pub severity: Severity,
    pub message_template: &'static str,
    pub args: Vec<String>,
    pub location: Location,
}

impl Finding {
    /// Build a finding for `code`. The arg count must match the template's
    /// `%s` count; a mismatch is a programming error in the emitting check.
    pub fn new(code: CheckCode, args: Vec<String>, location: Location) -> Self {
        debug_assert_eq!(
            args.len(),
            code.arity(),
            "arg count mismatch for {}",
            code.as_str()
        );
        Self {
            code,
            severity: code.severity(),
            message_template: code.message_template(),
            args,
            location,
        }
    }

    /// Render the message template with the positional args substituted.
    pub fn message(&self) -> String {
        let mut out = String::with_capacity(self.message_template.len());
        let mut rest = self.message_template;
        for arg in &self.args {
            match rest.split_once("%s") {
                Some((head, tail)) => {
                    out.push_str(head);
                    out.push_str(arg);
                    rest = tail;
                }
                None => break,
            }
        }
        out.push_str(rest);
        out
    }

    /// Stable ordering key: `(code, file, line, args)`. The engine sorts
    /// findings with this before emission so concurrent check execution
    /// cannot perturb the output.
    pub fn cmp_stable(&self, other: &Self) -> Ordering {
        self.code
            .as_str()
            .cmp(other.code.as_str())
            .then_with(|| self.location.file.cmp(&other.location.file))
            .then_with(|| self.location.line.cmp(&other.location.line))
            .then_with(|| self.args.cmp(&other.args))
    }
}

/// A record identifier declared in a structured data file, with provenance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclaredRecord {
    pub file: PathBuf,
    pub id: String,
    pub line: usize,
}

/// The outcome of one module's check pass.
#[derive(Clone, Debug, Serialize)]
pub struct CheckReport {
    pub module: PathBuf,
    pub findings: Vec<Finding>,
    pub summary: ReportSummary,
}

#[derive(Clone, Copy, Debug, Serialize, Default)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
}

impl CheckReport {
    pub fn new(module: PathBuf, findings: Vec<Finding>) -> Self {
        let summary = ReportSummary {
            errors: findings
                .iter()
                .filter(|f| f.severity == Severity::Error)
                .count(),
            warnings: findings
                .iter()
                .filter(|f| f.severity == Severity::Warning)
                .count(),
        };
        Self {
            module,
            findings,
            summary,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_matching_arity_and_template() {
        for code in ALL_CODES {
            let template = code.message_template();
            assert_eq!(
                code.arity(),
                template.matches("%s").count(),
                "{code} template drifted"
            );
            assert_ne!(code.as_str(), "unknown");
        }
    }

    #[test]
    fn coverage_is_the_only_warning() {
        for code in ALL_CODES {
            let expected = if *code == CheckCode::JsEmptyCoverage {
                Severity::Warning
            } else {
                Severity::Error
            };
            assert_eq!(code.severity(), expected);
        }
    }

    #[test]
    fn message_substitutes_args_in_order() {
        let finding = Finding::new(
            CheckCode::XmlIdDuplicated,
            vec!["view_1".into(), "a.xml".into(), "b.xml".into()],
            Location::file("b.xml"),
        );
        assert_eq!(
            finding.message(),
            "Duplicated xml id \"view_1\" in file \"a.xml\" and file \"b.xml\". \
             Did you forget to update it after copy-paste?"
        );
    }

    #[test]
    fn stable_ordering_breaks_ties_on_args() {
        let a = Finding::new(
            CheckCode::RstTemplateField,
            vec!["README.rst".into(), "{alpha}".into()],
            Location::new("README.rst", 3),
        );
        let b = Finding::new(
            CheckCode::RstTemplateField,
            vec!["README.rst".into(), "{beta}".into()],
            Location::new("README.rst", 3),
        );
        assert_eq!(a.cmp_stable(&b), Ordering::Less);
    }

    #[test]
    fn code_serializes_to_kebab_case() {
        let json = serde_json::to_string(&CheckCode::AbsentIndexHtml).unwrap();
        assert_eq!(json, "\"absent-index-html\"");
    }
}
