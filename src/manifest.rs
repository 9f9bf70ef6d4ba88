//! Manifest loader: locates the module's manifest file and parses its
//! top-level Python-style mapping literal into a `serde_json` map.
//!
//! Only literal structures are understood (strings, booleans, None, numbers,
//! lists, tuples, nested dicts, `#` comments, trailing commas, implicit
//! string concatenation). Anything else is a malformed manifest, which is
//! fatal for the module's whole check pass.

use crate::core::errors::{Error, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Recognized manifest file names, preferred name first.
pub const MANIFEST_FILES: &[&str] = &["__manifest__.py", "__openerp__.py"];

/// Find the manifest file under a module root, if any.
pub fn locate(root: &Path) -> Option<PathBuf> {
    MANIFEST_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Load and parse the module manifest. Returns the manifest file name and
/// the parsed mapping.
pub fn load(root: &Path) -> Result<(String, Map<String, Value>)> {
    let path = locate(root).ok_or_else(|| {
        Error::manifest_parse(root.join(MANIFEST_FILES[0]), "manifest file is absent")
    })?;
    let content =
        fs::read_to_string(&path).map_err(|e| Error::manifest_parse(&path, e.to_string()))?;
    let mapping = parse_literal(&content).map_err(|e| Error::manifest_parse(&path, e.to_string()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((name, mapping))
}

/// Parse failure inside the mapping literal, with a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parse a top-level mapping literal. The whole input must be one dict,
/// modulo surrounding whitespace and comments.
pub fn parse_literal(text: &str) -> std::result::Result<Map<String, Value>, ParseError> {
    let mut parser = LiteralParser::new(text);
    parser.skip_trivia();
    if parser.peek() != Some('{') {
        return Err(parser.error("expected a top-level mapping literal"));
    }
    let mapping = match parser.parse_value()? {
        Value::Object(map) => map,
        _ => return Err(parser.error("expected a top-level mapping literal")),
    };
    parser.skip_trivia();
    if parser.peek().is_some() {
        return Err(parser.error("trailing content after the mapping literal"));
    }
    Ok(mapping)
}

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralParser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let line = 1 + self.chars[..self.pos.min(self.chars.len())]
            .iter()
            .filter(|c| **c == '\n')
            .count();
        ParseError {
            line,
            message: message.into(),
        }
    }

    /// Skip whitespace and `#` comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.pos += 1;
                }
                Some('#') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn parse_value(&mut self) -> std::result::Result<Value, ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some('{') => self.parse_dict(),
            Some('[') => self.parse_sequence('[', ']'),
            Some('(') => self.parse_sequence('(', ')'),
            Some(c) if c == '\'' || c == '"' || self.at_string_start() => {
                self.parse_string().map(Value::String)
            }
            Some('T') => self.parse_keyword("True", Value::Bool(true)),
            Some('F') => self.parse_keyword("False", Value::Bool(false)),
            Some('N') => self.parse_keyword("None", Value::Null),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' => self.parse_number(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_dict(&mut self) -> std::result::Result<Value, ParseError> {
        self.bump(); // '{'
        let mut map = Map::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                }
                Some(c) if c == '\'' || c == '"' || self.at_string_start() => {
                    let key = self.parse_string()?;
                    self.skip_trivia();
                    if self.bump() != Some(':') {
                        return Err(self.error(format!("expected ':' after key \"{key}\"")));
                    }
                    let value = self.parse_value()?;
                    map.insert(key, value);
                    self.skip_trivia();
                    match self.peek() {
                        Some(',') => {
                            self.bump();
                        }
                        Some('}') => {}
                        _ => return Err(self.error("expected ',' or '}' in mapping")),
                    }
                }
                Some(_) => return Err(self.error("mapping keys must be string literals")),
                None => return Err(self.error("unterminated mapping literal")),
            }
        }
        Ok(Value::Object(map))
    }

    fn parse_sequence(
        &mut self,
        open: char,
        close: char,
    ) -> std::result::Result<Value, ParseError> {
        debug_assert_eq!(self.peek(), Some(open));
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(c) if c == close => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    items.push(self.parse_value()?);
                    self.skip_trivia();
                    match self.peek() {
                        Some(',') => {
                            self.bump();
                        }
                        Some(c) if c == close => {}
                        _ => return Err(self.error("expected ',' or sequence close")),
                    }
                }
                None => return Err(self.error("unterminated sequence literal")),
            }
        }
        Ok(Value::Array(items))
    }

    /// True when the cursor sits on a string literal, including ones led by
    /// `u`/`b`/`r` prefixes.
    fn at_string_start(&self) -> bool {
        let mut i = self.pos;
        let mut prefixes = 0;
        while prefixes < 2 {
            match self.chars.get(i) {
                Some('u' | 'U' | 'b' | 'B' | 'r' | 'R') => {
                    i += 1;
                    prefixes += 1;
                }
                _ => break,
            }
        }
        matches!(self.chars.get(i), Some('\'' | '"'))
    }

    /// Parse a string, folding Python's implicit adjacent-literal
    /// concatenation into one value.
    fn parse_string(&mut self) -> std::result::Result<String, ParseError> {
        let mut out = self.parse_string_literal()?;
        loop {
            let mark = self.pos;
            self.skip_trivia();
            if self.at_string_start() {
                out.push_str(&self.parse_string_literal()?);
            } else {
                self.pos = mark;
                break;
            }
        }
        Ok(out)
    }

    fn parse_string_literal(&mut self) -> std::result::Result<String, ParseError> {
        let mut raw = false;
        while let Some(c) = self.peek() {
            match c {
                'u' | 'U' | 'b' | 'B' => {
                    self.bump();
                }
                'r' | 'R' => {
                    raw = true;
                    self.bump();
                }
                _ => break,
            }
        }
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected a string literal")),
        };
        let triple = self.chars.get(self.pos) == Some(&quote)
            && self.chars.get(self.pos + 1) == Some(&quote);
        if triple {
            self.pos += 2;
        }
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string literal")),
                Some('\\') if !raw => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('\n') => {} // line continuation
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some(c) => {
                        // Python keeps unknown escapes verbatim
                        out.push('\\');
                        out.push(c);
                    }
                    None => return Err(self.error("unterminated string literal")),
                },
                Some(c) if c == quote => {
                    if !triple {
                        break;
                    }
                    if self.chars.get(self.pos) == Some(&quote)
                        && self.chars.get(self.pos + 1) == Some(&quote)
                    {
                        self.pos += 2;
                        break;
                    }
                    out.push(c);
                }
                Some(c) => out.push(c),
            }
        }
        Ok(out)
    }

    fn parse_keyword(
        &mut self,
        word: &str,
        value: Value,
    ) -> std::result::Result<Value, ParseError> {
        let end = self.pos + word.chars().count();
        let matches_word = self
            .chars
            .get(self.pos..end)
            .map(|slice| slice.iter().collect::<String>() == word)
            .unwrap_or(false);
        let boundary = self
            .chars
            .get(end)
            .map(|c| !c.is_alphanumeric() && *c != '_')
            .unwrap_or(true);
        if matches_word && boundary {
            self.pos = end;
            Ok(value)
        } else {
            Err(self.error(format!("expected keyword '{word}'")))
        }
    }

    fn parse_number(&mut self) -> std::result::Result<Value, ParseError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '.' | '_' | 'e' | 'E') {
                self.bump();
            } else if matches!(c, '-' | '+')
                && matches!(self.chars.get(self.pos - 1), Some('e' | 'E'))
            {
                self.bump();
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        if text.contains(['.', 'e', 'E']) {
            let f: f64 = text
                .parse()
                .map_err(|_| self.error(format!("invalid number literal '{text}'")))?;
            serde_json::Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| self.error(format!("invalid number literal '{text}'")))
        } else {
            let i: i64 = text
                .parse()
                .map_err(|_| self.error(format!("invalid number literal '{text}'")))?;
            Ok(Value::Number(i.into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_typical_manifest() {
        let text = indoc! {r#"
            # -*- coding: utf-8 -*-
            {
                'name': "Point of Sale Kiosk",
                'version': '14.0.1.0.0',
                'installable': True,
                'depends': ['base', 'web'],
                'images': ['images/main.png'],
                'price': 49.99,
                'sequence': 10,
                'auto_install': False,
                'external_dependencies': {'python': ['requests']},
            }
        "#};
        let map = parse_literal(text).unwrap();
        assert_eq!(map["name"], Value::String("Point of Sale Kiosk".into()));
        assert_eq!(map["version"], Value::String("14.0.1.0.0".into()));
        assert_eq!(map["installable"], Value::Bool(true));
        assert_eq!(map["depends"].as_array().unwrap().len(), 2);
        assert_eq!(map["sequence"], Value::Number(10.into()));
        assert_eq!(
            map["external_dependencies"]["python"][0],
            Value::String("requests".into())
        );
    }

    #[test]
    fn handles_triple_quotes_tuples_and_concat() {
        let text = indoc! {r#"
            {
                'summary': """Multi
            line""",
                'author': 'Alpha ' 'Beta',
                'maintainers': ('x', 'y',),
                'license': None,
            }
        "#};
        let map = parse_literal(text).unwrap();
        assert_eq!(map["summary"], Value::String("Multi\nline".into()));
        assert_eq!(map["author"], Value::String("Alpha Beta".into()));
        assert_eq!(map["maintainers"].as_array().unwrap().len(), 2);
        assert_eq!(map["license"], Value::Null);
    }

    #[test]
    fn handles_escapes_and_raw_strings() {
        let map = parse_literal(r#"{'a': 'it\'s', 'b': r'c:\d', 'c': 'x\qy'}"#).unwrap();
        assert_eq!(map["a"], Value::String("it's".into()));
        assert_eq!(map["b"], Value::String(r"c:\d".into()));
        assert_eq!(map["c"], Value::String(r"x\qy".into()));
    }

    #[test]
    fn rejects_non_mapping_top_level() {
        let err = parse_literal("['not', 'a', 'dict']").unwrap_err();
        assert!(err.message.contains("mapping literal"));
    }

    #[test]
    fn rejects_trailing_content_and_reports_line() {
        let err = parse_literal("{'a': 1}\nextra").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn load_reports_absent_manifest_as_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn load_reads_legacy_openerp_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("__openerp__.py"), "{'name': 'legacy'}").unwrap();
        let (file, map) = load(dir.path()).unwrap();
        assert_eq!(file, "__openerp__.py");
        assert_eq!(map["name"], Value::String("legacy".into()));
    }
}
