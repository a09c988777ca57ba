use crate::app::cli::Cli;
use crate::app::models::{DumpConfig, DUMP_FILE_NAME};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "dump.toml";
const DEFAULT_PROFILE: &str = "default";

#[derive(Deserialize, Debug)]
struct ProfilesFile {
    #[serde(flatten)]
    profiles: HashMap<String, Profile>,
}

/// One table of `dump.toml`. Every key is optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub root_dir: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub ignored_dirs: Option<Vec<String>>,
    pub ignored_patterns: Option<Vec<String>>,
    pub language_map: Option<BTreeMap<String, String>>,
}

/// `dump.toml` in `cwd`, falling back to the user config directory.
fn locate_config_file(cwd: &Path) -> Option<PathBuf> {
    let local = cwd.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    let global = dirs::config_dir()?.join("context-dump").join(CONFIG_FILE_NAME);
    global.is_file().then_some(global)
}

pub fn load_profiles(path: &Path) -> Result<HashMap<String, Profile>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let parsed: ProfilesFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(parsed.profiles)
}

/// A missing named profile is an error; a missing `[default]` is not.
pub fn select_profile(
    mut profiles: HashMap<String, Profile>,
    name: Option<&str>,
) -> Result<Profile> {
    match name {
        Some(name) => match profiles.remove(name) {
            Some(profile) => {
                log::info!("Using config profile: {}", name);
                Ok(profile)
            }
            None => bail!("No config profile named \"{}\" found in {}", name, CONFIG_FILE_NAME),
        },
        None => Ok(profiles.remove(DEFAULT_PROFILE).unwrap_or_default()),
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Flags override the profile, which overrides the built-in defaults.
pub fn merge_config(cli: Cli, profile: Profile, cwd: &Path) -> Result<DumpConfig> {
    let cli_root = cli.root_arg().map(|r| cwd.join(r));
    let root_dir = cli_root
        .clone()
        .or_else(|| profile.root_dir.map(|r| cwd.join(r)))
        .unwrap_or_else(|| cwd.to_path_buf());

    let mut config = DumpConfig::new(root_dir);

    // An explicit root without an explicit output writes the dump where the tool was run.
    if let Some(output) = cli.output {
        config.output_file = output;
    } else if cli_root.is_some() {
        config.output_file = cwd.join(DUMP_FILE_NAME);
    } else if let Some(output) = profile.output_file {
        config.output_file = output;
    }

    if let Some(dirs) = cli.ignore_dirs.or(profile.ignored_dirs) {
        config.ignored_dirs = clean_list(dirs).into_iter().collect();
    }
    if let Some(patterns) = cli.ignore_patterns.or(profile.ignored_patterns) {
        config.ignored_patterns = clean_list(patterns);
    }

    let languages = match cli.language_map {
        Some(json) => serde_json::from_str::<BTreeMap<String, String>>(&json)
            .context("Failed to parse --language-map JSON")?,
        None => profile.language_map.unwrap_or_default(),
    };
    Ok(config.with_languages(languages))
}

pub fn resolve_config(cli: Cli, cwd: &Path) -> Result<DumpConfig> {
    let profile = match locate_config_file(cwd) {
        Some(path) => {
            log::debug!("Loading config from {}", path.display());
            select_profile(load_profiles(&path)?, cli.config.as_deref())?
        }
        None => {
            if let Some(name) = cli.config.as_deref() {
                bail!("Config profile \"{}\" requested but no {} was found", name, CONFIG_FILE_NAME);
            }
            log::warn!("No {} found. Using built-in defaults.", CONFIG_FILE_NAME);
            Profile::default()
        }
    };

    merge_config(cli, profile, cwd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
[default]
ignored_dirs = ["vendor"]
ignored_patterns = ["**/*.lock"]

[docs]
root_dir = "docs"
output_file = "docs-dump.md"
language_map = { mdx = "markdown" }
"#;

    fn write_sample() -> (tempfile::TempDir, HashMap<String, Profile>) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, SAMPLE).unwrap();
        let profiles = load_profiles(&path).unwrap();
        (dir, profiles)
    }

    #[test]
    fn loads_named_profiles() {
        let (_dir, profiles) = write_sample();
        assert_eq!(profiles.len(), 2);
        assert_eq!(
            profiles["default"].ignored_dirs,
            Some(vec!["vendor".to_string()])
        );
        assert_eq!(profiles["docs"].root_dir, Some(PathBuf::from("docs")));
    }

    #[test]
    fn missing_named_profile_is_an_error() {
        let (_dir, profiles) = write_sample();
        let err = select_profile(profiles, Some("nope")).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn missing_default_profile_is_empty() {
        assert_eq!(select_profile(HashMap::new(), None).unwrap(), Profile::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[default]\nignore_dir = [\"x\"]\n").unwrap();
        assert!(load_profiles(&path).is_err());
    }

    #[test]
    fn defaults_when_nothing_is_given() {
        let cwd = Path::new("/work");
        let config = merge_config(Cli::default(), Profile::default(), cwd).unwrap();
        assert_eq!(config.root_dir, PathBuf::from("/work"));
        assert_eq!(config.output_file, PathBuf::from(DUMP_FILE_NAME));
        assert!(config.ignored_dirs.contains(".git"));
        assert!(config.ignored_dirs.contains("node_modules"));
        assert!(config.ignored_patterns.is_empty());
        assert_eq!(config.language_map["js"], "js");
    }

    #[test]
    fn profile_overrides_defaults() {
        let (_dir, mut profiles) = write_sample();
        let docs = profiles.remove("docs").unwrap();
        let config = merge_config(Cli::default(), docs, Path::new("/work")).unwrap();
        assert_eq!(config.root_dir, PathBuf::from("/work/docs"));
        assert_eq!(config.output_file, PathBuf::from("docs-dump.md"));
        assert_eq!(config.language_map["mdx"], "markdown");
        assert_eq!(config.language_map["md"], "md");
    }

    #[test]
    fn flags_override_profile() {
        let (_dir, mut profiles) = write_sample();
        let profile = profiles.remove("default").unwrap();
        let cli = Cli {
            ignore_dirs: Some(vec![" skip ".to_string(), "".to_string()]),
            language_map: Some(r#"{"abc":"alpha"}"#.to_string()),
            ..Cli::default()
        };
        let config = merge_config(cli, profile, Path::new("/work")).unwrap();
        assert_eq!(config.ignored_dirs.iter().collect::<Vec<_>>(), vec!["skip"]);
        assert_eq!(config.ignored_patterns, vec!["**/*.lock"]);
        assert_eq!(config.language_map["abc"], "alpha");
    }

    #[test]
    fn cli_root_without_output_writes_to_cwd() {
        let cli = Cli {
            path: Some(PathBuf::from("project")),
            ..Cli::default()
        };
        let profile = Profile {
            output_file: Some(PathBuf::from("ignored.md")),
            ..Profile::default()
        };
        let config = merge_config(cli, profile, Path::new("/work")).unwrap();
        assert_eq!(config.root_dir, PathBuf::from("/work/project"));
        assert_eq!(config.output_file, PathBuf::from("/work/context-dump.md"));
    }

    #[test]
    fn invalid_language_map_json_is_an_error() {
        let cli = Cli {
            language_map: Some("{not json".to_string()),
            ..Cli::default()
        };
        let err = merge_config(cli, Profile::default(), Path::new("/work")).unwrap_err();
        assert!(err.to_string().contains("--language-map"));
    }

    #[test]
    fn local_config_file_is_found() {
        let (dir, _) = write_sample();
        assert_eq!(
            locate_config_file(dir.path()),
            Some(dir.path().join(CONFIG_FILE_NAME))
        );
    }
}
