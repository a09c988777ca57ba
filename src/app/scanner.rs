use crate::app::error::{DumpError, Result};
use crate::app::models::{relative_slash_path, DumpConfig, DUMP_FILE_NAME};
use crate::app::pattern::{compile_all, GlobPattern};
use ignore::{DirEntry, WalkBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Scanner {
    root: PathBuf,
    rules: Arc<Rules>,
}

/// Exclusion rules shared with the walker's entry filter.
struct Rules {
    root: PathBuf,
    output_rel: String,
    ignored_dirs: BTreeSet<String>,
    patterns: Vec<GlobPattern>,
}

impl Scanner {
    /// Compiles the ignore patterns; fails before any traversal on a bad one.
    pub fn new(config: &DumpConfig) -> Result<Self> {
        let config = config.resolved().map_err(|e| DumpError::InvalidRoot {
            path: config.root_dir.clone(),
            reason: e.to_string(),
        })?;
        let root = config.root_dir;
        let rules = Rules {
            root: root.clone(),
            output_rel: relative_slash_path(&config.output_file, &root),
            ignored_dirs: config.ignored_dirs,
            patterns: compile_all(&config.ignored_patterns)?,
        };
        Ok(Self {
            root,
            rules: Arc::new(rules),
        })
    }

    /// Absolute paths of every selected file, in pre-order with siblings sorted by name.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        // A missing root is reported by the walker itself.
        if fs::metadata(&self.root).is_ok_and(|m| !m.is_dir()) {
            return Err(DumpError::InvalidRoot {
                path: self.root.clone(),
                reason: "not a directory".to_string(),
            });
        }

        let mut files = Vec::new();

        let filter_rules = Arc::clone(&self.rules);
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false) // every entry is visible; exclusion is ours alone
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| filter_rules.keep_dir(entry))
            .build();

        for result in walker {
            let entry = result.map_err(|source| DumpError::Walk {
                path: error_path(&source).unwrap_or(self.root.as_path()).to_path_buf(),
                source,
            })?;

            let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
            if is_file && self.rules.keep_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }
}

impl Rules {
    /// Prunes ignored directory subtrees. Non-directories always pass here.
    fn keep_dir(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        if self.ignored_dirs.contains(name.as_ref()) {
            log::debug!("Skipping ignored directory {}", entry.path().display());
            return false;
        }

        let relative = relative_slash_path(entry.path(), &self.root);
        if let Some(pattern) = self.matching_pattern(&relative, true) {
            log::debug!("Skipping directory {} (pattern `{}`)", relative, pattern.as_str());
            return false;
        }
        true
    }

    fn keep_file(&self, path: &Path) -> bool {
        let relative = relative_slash_path(path, &self.root);

        if relative == self.output_rel {
            log::debug!("Skipping output file {}", relative);
            return false;
        }
        if path.file_name().is_some_and(|n| n == DUMP_FILE_NAME) {
            log::debug!("Skipping dump artifact {}", relative);
            return false;
        }
        if let Some(pattern) = self.matching_pattern(&relative, false) {
            log::debug!("Skipping file {} (pattern `{}`)", relative, pattern.as_str());
            return false;
        }
        true
    }

    fn matching_pattern(&self, relative: &str, is_dir: bool) -> Option<&GlobPattern> {
        self.patterns.iter().find(|p| p.matches(relative, is_dir))
    }
}

/// The entry path carried by a walk error, if any.
fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}
