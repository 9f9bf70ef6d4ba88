//! Per-module context: resolved root path, cached manifest mapping, and
//! file lists memoized by extension. Built once per module and immutable
//! for the duration of the check pass; nothing here outlives one module.

use crate::core::errors::Result;
use crate::io::walker::FileWalker;
use crate::manifest;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ModuleContext {
    root: PathBuf,
    manifest_file: String,
    manifest: Map<String, Value>,
    files_by_ext: BTreeMap<String, Vec<PathBuf>>,
}

impl ModuleContext {
    /// Build the context for one module. Fails only on manifest problems or
    /// an unwalkable tree, both of which abort the pass for this module.
    pub fn build(root: &Path, ignore_patterns: &[String]) -> Result<Self> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let (manifest_file, manifest) = manifest::load(&root)?;
        let files = FileWalker::new(root.clone())
            .with_ignore_patterns(ignore_patterns.to_vec())
            .walk()?;

        let mut files_by_ext: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for file in files {
            let ext = file
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            files_by_ext.entry(ext).or_default().push(file);
        }

        Ok(Self {
            root,
            manifest_file,
            manifest,
            files_by_ext,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the manifest file the mapping was read from.
    pub fn manifest_file(&self) -> &str {
        &self.manifest_file
    }

    pub fn manifest(&self) -> &Map<String, Value> {
        &self.manifest
    }

    /// Relative paths of module files with the given extension (lowercase,
    /// without the dot), in lexicographic order.
    pub fn files_with_ext(&self, ext: &str) -> &[PathBuf] {
        self.files_by_ext.get(ext).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Existence probe relative to the module root. An unreadable path
    /// counts as absent.
    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.root.join(relative).is_file()
    }

    pub fn read_to_string(&self, relative: &Path) -> std::io::Result<String> {
        fs::read_to_string(self.root.join(relative))
    }
}
