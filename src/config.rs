use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".gleanrc.json";

/// Source file extensions handled by the markup adapter.
pub const MARKUP_EXTENSIONS: &[&str] = &["html", "htm"];

/// Source file extensions handled by the program-source adapter.
pub const SCRIPT_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx"];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Baseline catalog, read at build start and used for the diff.
    #[serde(default = "default_src", alias = "baseline")]
    pub src: String,
    /// Naming template for the merged catalog, relative to `output_dir`.
    #[serde(default = "default_dest")]
    pub dest: String,
    /// Index file name, relative to `output_dir`. No index is written when unset.
    #[serde(default = "default_index")]
    pub index: Option<String>,
    #[serde(default)]
    pub create_diff: bool,
    #[serde(default)]
    pub duplicate_warnings: bool,
    /// Publish the baseline with extracted keys applied on top, so keys that
    /// only exist there (plural and ordinal forms) are kept.
    #[serde(default = "default_keep_baseline_keys")]
    pub keep_baseline_keys: bool,
    #[serde(default = "default_i18n_function_name")]
    pub i18n_function_name: String,
    #[serde(default)]
    pub function_aliases: Vec<String>,
    #[serde(default = "default_marker_attribute")]
    pub marker_attribute: String,
    #[serde(default = "default_exclude_paths")]
    pub exclude_paths: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_translation_file_pattern")]
    pub translation_file_pattern: String,
    #[serde(default = "default_variant_pattern")]
    pub variant_pattern: String,
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_output_dir() -> String {
    "./dist".to_string()
}

fn default_src() -> String {
    "./locales/en/translation.json".to_string()
}

fn default_dest() -> String {
    "locales/en/[name].[hash:8].json".to_string()
}

fn default_index() -> Option<String> {
    Some("locales/index.json".to_string())
}

fn default_keep_baseline_keys() -> bool {
    true
}

fn default_i18n_function_name() -> String {
    "i18next.t".to_string()
}

fn default_marker_attribute() -> String {
    "t".to_string()
}

fn default_exclude_paths() -> Vec<String> {
    vec!["node_modules".to_string()]
}

pub fn default_translation_file_pattern() -> String {
    r"locales/([^/]+)/([^/.]+)(?:\.[^/.]+)?\.json$".to_string()
}

pub fn default_variant_pattern() -> String {
    r"_(\d+|plural)$".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            output_dir: default_output_dir(),
            src: default_src(),
            dest: default_dest(),
            index: default_index(),
            create_diff: false,
            duplicate_warnings: false,
            keep_baseline_keys: default_keep_baseline_keys(),
            i18n_function_name: default_i18n_function_name(),
            function_aliases: Vec::new(),
            marker_attribute: default_marker_attribute(),
            exclude_paths: default_exclude_paths(),
            ignores: Vec::new(),
            translation_file_pattern: default_translation_file_pattern(),
            variant_pattern: default_variant_pattern(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob in `ignores` or any regular expression
    /// is invalid, or if required names are empty.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        self.translation_file_regex()?;
        self.variant_regex()?;

        if self.i18n_function_name.trim().is_empty() {
            anyhow::bail!("'i18nFunctionName' must not be empty");
        }
        if self.marker_attribute.trim().is_empty() {
            anyhow::bail!("'markerAttribute' must not be empty");
        }
        if self.dest.trim().is_empty() {
            anyhow::bail!("'dest' must not be empty");
        }

        Ok(())
    }

    pub fn translation_file_regex(&self) -> Result<Regex> {
        Regex::new(&self.translation_file_pattern).with_context(|| {
            format!(
                "Invalid regex in 'translationFilePattern': \"{}\"",
                self.translation_file_pattern
            )
        })
    }

    pub fn variant_regex(&self) -> Result<Regex> {
        Regex::new(&self.variant_pattern).with_context(|| {
            format!(
                "Invalid regex in 'variantPattern': \"{}\"",
                self.variant_pattern
            )
        })
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory containing the config file, or the start directory when defaults are used.
    pub root_dir: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let root_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                root_dir,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            root_dir: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.ignores.is_empty());
        assert_eq!(config.exclude_paths, vec!["node_modules"]);
        assert_eq!(config.i18n_function_name, "i18next.t");
        assert!(!config.create_diff);
        assert!(config.keep_baseline_keys);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "src": "./i18n/en.json",
              "dest": "[name].json",
              "createDiff": true,
              "duplicateWarnings": true,
              "i18nFunctionName": "t",
              "functionAliases": ["_this.t"]
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.src, "./i18n/en.json");
        assert_eq!(config.dest, "[name].json");
        assert!(config.create_diff);
        assert!(config.duplicate_warnings);
        assert_eq!(config.i18n_function_name, "t");
        assert_eq!(config.function_aliases, vec!["_this.t"]);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "ignores": ["**/dist/**"] }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.ignores, vec!["**/dist/**"]);
        assert_eq!(
            config.translation_file_pattern,
            default_translation_file_pattern()
        );
        assert_eq!(config.index.as_deref(), Some("locales/index.json"));
    }

    #[test]
    fn test_index_can_be_disabled() {
        let config: Config = serde_json::from_str(r#"{ "index": null }"#).unwrap();
        assert!(config.index.is_none());
    }

    #[test]
    fn test_keep_baseline_keys_defaults_on() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.keep_baseline_keys);

        let config: Config = serde_json::from_str(r#"{ "keepBaselineKeys": false }"#).unwrap();
        assert!(!config.keep_baseline_keys);
    }

    #[test]
    fn test_baseline_alias() {
        let config: Config = serde_json::from_str(r#"{ "baseline": "./base.json" }"#).unwrap();
        assert_eq!(config.src, "./base.json");
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("views");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "outputDir": "./build" }"#,
        )
        .unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file);
        assert_eq!(result.config.output_dir, "./build");
        assert_eq!(result.root_dir, dir.path());
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.config.output_dir, "./dist");
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            ignores: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("ignores"));
    }

    #[test]
    fn test_validate_invalid_translation_file_pattern() {
        let config = Config {
            translation_file_pattern: "locales/(".to_string(),
            ..Default::default()
        };
        let result = config.validate();
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("translationFilePattern")
        );
    }

    #[test]
    fn test_validate_empty_function_name() {
        let config = Config {
            i18n_function_name: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "variantPattern": "(" }"#,
        )
        .unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let json = default_config_json().unwrap();
        assert!(json.contains("i18nFunctionName"));
        assert!(json.contains("translationFilePattern"));
        assert!(!json.contains("i18n_function_name"));
    }
}
