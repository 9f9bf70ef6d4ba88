use crate::core::errors::Result;
use ignore::WalkBuilder;
use std::io;
use std::path::{Path, PathBuf};

/// Lists the files of a module tree as relative paths in lexicographic
/// order. Ordering is part of the contract: the duplicate-id detector's
/// scan order and the report ordering both depend on it.
pub struct FileWalker {
    root: PathBuf,
    ignore_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ignore_patterns: vec![],
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry.map_err(io::Error::other)?;
            let path = entry.path();

            if path.is_file() && self.should_process(path) {
                let relative = path.strip_prefix(&self.root).unwrap_or(path);
                files.push(relative.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let path_str = relative.to_string_lossy();
        for pattern in &self.ignore_patterns {
            if glob::Pattern::new(pattern)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false)
            {
                return false;
            }
        }
        true
    }
}
