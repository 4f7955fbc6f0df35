use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Substrings that may not appear anywhere in the checked tree.
pub const DEFAULT_BANNED_WORDS: &[&str] = &["mock", "fallback", "simulate", "pretend", "fake"];

/// Version-control metadata directories. Always skipped, whatever the config says.
pub const VCS_SKIP_DIRS: &[&str] = &[".git"];

pub const DEFAULT_PYTHON: &str = "python3";
pub const DEFAULT_TEST_ROOT: &str = "src";
pub const CONFIG_FILE_NAME: &str = "dazpycheck.json";

pub const PYTHON_ENV: &str = "DAZPYCHECK_PYTHON";
pub const BANNED_WORDS_ENV: &str = "DAZPYCHECK_BANNED_WORDS";

/// On-disk shape of `dazpycheck.json`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    banned_words: Option<Vec<String>>,
    python: Option<String>,
    skip_dirs: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub root_dir: PathBuf,
    pub banned_words: Vec<String>,
    /// Interpreter used for every `-m <tool>` invocation.
    pub python: String,
    pub skip_dirs: HashSet<String>,
}

impl GateConfig {
    /// Defaults only: no config file, no environment.
    pub fn from_root(root: &Path) -> Self {
        Self {
            root_dir: root.to_path_buf(),
            banned_words: DEFAULT_BANNED_WORDS.iter().map(|w| w.to_string()).collect(),
            python: DEFAULT_PYTHON.to_string(),
            skip_dirs: VCS_SKIP_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Validate the root, then layer `dazpycheck.json` and the process environment over the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        Self::load_with(root, |key| env::var(key).ok())
    }

    pub fn load_with<F>(root: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        ensure_directory(root)?;

        let mut config = Self::from_root(root);
        let file_path = root.join(CONFIG_FILE_NAME);
        if file_path.is_file() {
            let raw = fs::read_to_string(&file_path).map_err(|source| Error::ConfigRead {
                path: file_path.clone(),
                source,
            })?;
            let file: FileConfig = serde_json::from_str(&raw).map_err(|source| Error::ConfigParse {
                path: file_path.clone(),
                source,
            })?;
            config.apply_file(file);
        }

        config.apply_env(lookup);
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(words) = file.banned_words {
            self.banned_words = words
                .into_iter()
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .collect();
        }
        if let Some(python) = file.python.filter(|p| !p.trim().is_empty()) {
            self.python = python;
        }
        if let Some(dirs) = file.skip_dirs {
            self.skip_dirs.extend(dirs);
        }
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(python) = lookup(PYTHON_ENV).filter(|p| !p.trim().is_empty()) {
            self.python = python.trim().to_string();
        }
        if let Some(words) = lookup(BANNED_WORDS_ENV) {
            self.banned_words = parse_word_list(&words);
        }
    }
}

/// The target root must exist and be a directory.
pub fn ensure_directory(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(Error::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(Error::RootNotDirectory(root.to_path_buf()));
    }
    Ok(())
}

fn parse_word_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
