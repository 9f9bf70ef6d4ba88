//! Duplicate record identifiers across all declarative data files. The
//! detector must see every file before concluding, so it owns the record
//! accumulation pass.

use super::{records, Check, CheckConfig, DiagnosticSink};
use crate::context::ModuleContext;
use crate::core::{CheckCode, DeclaredRecord, Finding, Location};

pub struct DuplicateXmlIds;

/// All-pairs comparison over the accumulated records, in scan order.
/// Quadratic, which is fine at module scale (tens to low hundreds of
/// records). When three or more records share an id, the first occurrence
/// is paired with each later one; later occurrences are not paired among
/// themselves, keeping message output stable.
pub fn find_duplicates(records: &[DeclaredRecord]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for i in 0..records.len() {
        if records[..i].iter().any(|r| r.id == records[i].id) {
            continue; // not the first occurrence of this id
        }
        for later in &records[i + 1..] {
            if later.id == records[i].id {
                findings.push(Finding::new(
                    CheckCode::XmlIdDuplicated,
                    vec![
                        later.id.clone(),
                        records[i].file.to_string_lossy().into_owned(),
                        later.file.to_string_lossy().into_owned(),
                    ],
                    Location::new(later.file.clone(), later.line),
                ));
            }
        }
    }
    findings
}

impl Check for DuplicateXmlIds {
    fn name(&self) -> &'static str {
        "duplicate-xml-ids"
    }

    fn run(&self, ctx: &ModuleContext, _config: &CheckConfig, sink: &dyn DiagnosticSink) {
        let mut all = Vec::new();
        for rel in ctx.files_with_ext("xml") {
            match records::scan_file(ctx.root(), rel) {
                Ok(mut found) => all.append(&mut found),
                Err(err) => log::warn!("no records from {}: {err}", rel.display()),
            }
        }
        for finding in find_duplicates(&all) {
            sink.report(finding);
        }
    }
}
