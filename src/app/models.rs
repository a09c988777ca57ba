use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Basename of the dump artifact. Files with this name are never collected.
pub const DUMP_FILE_NAME: &str = "context-dump.md";

/// Default directory names that are skipped during collection.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[".git", "node_modules"];

const DEFAULT_LANGUAGES: &[(&str, &str)] = &[
    ("js", "js"),
    ("ts", "ts"),
    ("json", "json"),
    ("md", "md"),
    ("sh", "bash"),
    ("yml", "yaml"),
    ("yaml", "yaml"),
    ("txt", "txt"),
    ("lic", "txt"),
    ("rs", "rust"),
    ("toml", "toml"),
    ("py", "python"),
    ("html", "html"),
    ("css", "css"),
];

/// Built-in extension to fence-tag table.
pub fn default_language_map() -> BTreeMap<String, String> {
    DEFAULT_LANGUAGES
        .iter()
        .map(|(ext, lang)| (ext.to_string(), lang.to_string()))
        .collect()
}

/// Represents the final configuration after merging the config file and CLI args.
#[derive(Debug, Clone)]
pub struct DumpConfig {
    pub root_dir: PathBuf,
    /// Relative to `root_dir` unless absolute.
    pub output_file: PathBuf,
    pub ignored_dirs: BTreeSet<String>,
    pub ignored_patterns: Vec<String>,
    pub language_map: BTreeMap<String, String>,
}

impl DumpConfig {
    /// Defaults rooted at `root_dir`.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            output_file: PathBuf::from(DUMP_FILE_NAME),
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|d| d.to_string()).collect(),
            ignored_patterns: Vec::new(),
            language_map: default_language_map(),
        }
    }

    /// Merges `overrides` over the built-in table; keys are lowercased.
    pub fn with_languages<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (ext, lang) in overrides {
            self.language_map
                .insert(ext.as_ref().to_lowercase(), lang.into());
        }
        self
    }

    /// Where the dump gets written.
    pub fn output_path(&self) -> PathBuf {
        if self.output_file.is_absolute() {
            self.output_file.clone()
        } else {
            self.root_dir.join(&self.output_file)
        }
    }

    /// Copy with an absolute, normalized root and an absolute, normalized output file.
    pub fn resolved(&self) -> io::Result<Self> {
        let root_dir = normalize_path(&self.root_dir)?;
        let output_file = if self.output_file.is_absolute() {
            normalize_path(&self.output_file)?
        } else {
            normalize_path(&root_dir.join(&self.output_file))?
        };
        Ok(Self {
            root_dir,
            output_file,
            ..self.clone()
        })
    }
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self::new(env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

/// A file selected for the dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub relative_path: String,
}

impl FileEntry {
    pub fn new(path: PathBuf, root: &Path) -> Self {
        let relative_path = relative_slash_path(&path, root);
        Self {
            path,
            relative_path,
        }
    }

    /// Lowercased extension, empty when there is none.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

/// The rendered unit for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub relative_path: String,
    pub language: String,
    pub content: String,
}

/// Makes `path` absolute against the working directory and folds `.` and `..`
/// lexically. Symlinks are not resolved.
pub fn normalize_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// `path` relative to `root`, using `/` as the separator on every platform.
pub fn relative_slash_path(path: &Path, root: &Path) -> String {
    let relative = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
