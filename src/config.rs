//! Configuration file support. A `.modlint.toml` discovered from the
//! working directory upward supplies defaults; CLI flags win.

use crate::core::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".modlint.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModlintConfig {
    /// Accepted platform version, e.g. "14.0".
    #[serde(default)]
    pub accepted_version: Option<String>,

    /// Glob patterns of module-relative paths to exclude from the file
    /// listing (and therefore from all checks).
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl ModlintConfig {
    /// Load from an explicit path, or discover `.modlint.toml` walking up
    /// from the working directory. No file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir().ok().and_then(|cwd| discover(&cwd)),
        };
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid {}: {e}", path.display())))
    }

    /// Merge the CLI override in and produce the version the checks compare
    /// against. The accepted version must come from somewhere.
    pub fn resolve_accepted_version(&self, cli_override: Option<String>) -> Result<String> {
        cli_override
            .or_else(|| self.accepted_version.clone())
            .ok_or_else(|| {
                Error::Config(
                    "accepted platform version not set; pass --accepted-version \
                     or set accepted_version in .modlint.toml"
                        .to_string(),
                )
            })
    }
}

fn discover(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
