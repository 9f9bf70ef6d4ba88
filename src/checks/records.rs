//! Declarative record scanner: streams each XML data file and extracts the
//! `id` attributes of `<record>` elements under the document's `data`
//! container. Files that are not well-formed, or whose root is not a known
//! document root, degrade to an empty record set.

use crate::core::errors::{Error, Result};
use crate::core::DeclaredRecord;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// Accepted document roots for declarative data files.
const DOCUMENT_ROOTS: &[&[u8]] = &[b"odoo", b"openerp"];

/// Scan one file on disk. The returned records carry `rel` as provenance.
pub fn scan_file(root: &Path, rel: &Path) -> Result<Vec<DeclaredRecord>> {
    let content = fs::read_to_string(root.join(rel))?;
    scan_str(&content, rel)
}

/// Scan XML text for declared records. Returns `MalformedDocument` only for
/// unparsable input; an unexpected root structure yields an empty set.
pub fn scan_str(content: &str, rel: &Path) -> Result<Vec<DeclaredRecord>> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut records = Vec::new();

    loop {
        match reader.read_event() {
            Err(err) => return Err(Error::malformed_document(rel, err.to_string())),
            Ok(Event::Eof) => break,
            Ok(Event::Start(element)) => {
                let name = element.local_name().as_ref().to_vec();
                if stack.is_empty() && !DOCUMENT_ROOTS.contains(&name.as_slice()) {
                    // Not a declarative data document; nothing to scan.
                    return Ok(vec![]);
                }
                if at_record_position(&stack, &name) {
                    let position = reader.buffer_position() as usize;
                    if let Some(id) = record_id(&element, rel)? {
                        records.push(DeclaredRecord {
                            file: rel.to_path_buf(),
                            id,
                            line: line_of(content, position),
                        });
                    }
                }
                stack.push(name);
            }
            Ok(Event::Empty(element)) => {
                let name = element.local_name().as_ref().to_vec();
                if stack.is_empty() && !DOCUMENT_ROOTS.contains(&name.as_slice()) {
                    return Ok(vec![]);
                }
                if at_record_position(&stack, &name) {
                    let position = reader.buffer_position() as usize;
                    if let Some(id) = record_id(&element, rel)? {
                        records.push(DeclaredRecord {
                            file: rel.to_path_buf(),
                            id,
                            line: line_of(content, position),
                        });
                    }
                }
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(_) => {}
        }
    }

    Ok(records)
}

/// A record declaration lives at `root/data/record`.
fn at_record_position(stack: &[Vec<u8>], name: &[u8]) -> bool {
    name == b"record"
        && stack.len() == 2
        && DOCUMENT_ROOTS.contains(&stack[0].as_slice())
        && stack[1] == b"data"
}

fn record_id(
    element: &quick_xml::events::BytesStart<'_>,
    rel: &Path,
) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| Error::malformed_document(rel, e.to_string()))?;
        if attr.key.as_ref() == b"id" {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::malformed_document(rel, e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn line_of(content: &str, byte_position: usize) -> usize {
    let end = byte_position.min(content.len());
    1 + content.as_bytes()[..end]
        .iter()
        .filter(|b| **b == b'\n')
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn ids(content: &str) -> Vec<String> {
        scan_str(content, Path::new("views/test.xml"))
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn extracts_record_ids_with_lines() {
        let content = indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <odoo>
                <data>
                    <record id="view_a" model="ir.ui.view">
                        <field name="name">a</field>
                    </record>
                    <record id="view_b" model="ir.ui.view"/>
                </data>
            </odoo>
        "#};
        let records = scan_str(content, Path::new("views/v.xml")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "view_a");
        assert_eq!(records[0].line, 4);
        assert_eq!(records[1].id, "view_b");
        assert_eq!(records[1].line, 7);
        assert_eq!(records[0].file, PathBuf::from("views/v.xml"));
    }

    #[test]
    fn accepts_legacy_openerp_root() {
        assert_eq!(
            ids(r#"<openerp><data><record id="r1"/></data></openerp>"#),
            vec!["r1"]
        );
    }

    #[test]
    fn records_outside_a_data_container_are_not_declarations() {
        assert!(ids(r#"<odoo><record id="loose"/></odoo>"#).is_empty());
        assert!(ids(r#"<odoo><data><template><record id="nested"/></template></data></odoo>"#)
            .is_empty());
    }

    #[test]
    fn unexpected_root_degrades_to_no_records() {
        assert!(ids(r#"<html><body>not data</body></html>"#).is_empty());
    }

    #[test]
    fn csv_masquerading_as_xml_degrades_to_no_records() {
        assert!(ids("id,name\nrow1,Row One\n").is_empty());
    }

    #[test]
    fn broken_record_markup_is_malformed_not_fatal() {
        let err = scan_str(
            r#"<odoo><data><record id=broken/></data></odoo>"#,
            Path::new("data/rows.xml"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn records_without_id_are_skipped() {
        assert!(ids(r#"<odoo><data><record model="ir.ui.view"/></data></odoo>"#).is_empty());
    }
}
