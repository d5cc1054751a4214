// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `disposer.toml` parsing and validation.
//!
//! **DDD Context:** Configuration
//!
//! ```toml
//! [lint]
//! language = "csharp"
//! parallel = true
//!
//! [rules]
//! CA2215 = "warning"
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::collections::BTreeMap;
use std::fs;

use camino::Utf8Path;
use disposer_core::lint::{RuleLevel, find_rule};
use disposer_core::prelude::{Language, LintOptions};
use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;

/// File name looked up next to the linted path.
pub const CONFIG_FILE_NAME: &str = "disposer.toml";

/// The top-level structure parsed from `disposer.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub lint: LintSection,
    /// Rule id to level name.
    #[serde(default)]
    pub rules: BTreeMap<String, String>,
}

/// The `[lint]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintSection {
    pub language: Option<String>,
    pub parallel: Option<bool>,
}

/// Validated settings for one lint run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub language: Language,
    pub lint: LintOptions,
}

/// Configuration problems that are not TOML syntax errors.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    #[error("unknown language `{0}`")]
    #[diagnostic(code(disposer::config::language), help("expected `csharp` or `visual-basic`"))]
    UnknownLanguage(String),

    #[error("unknown rule `{0}` in [rules]")]
    #[diagnostic(code(disposer::config::rule), help("run `disposer rules` to list rule ids"))]
    UnknownRule(String),

    #[error("invalid level for rule `{rule}`")]
    #[diagnostic(code(disposer::config::level))]
    InvalidLevel {
        rule: String,
        #[source]
        source: disposer_core::lint::UnknownRuleLevel,
    },
}

/// Parse a `disposer.toml` file.
pub fn parse_config(path: &Utf8Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read config '{path}'"))?;

    toml::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to parse config '{path}'"))
}

/// Look for `disposer.toml` in `dir` and parse it if found.
///
/// Returns `None` if no config file exists. Returns an error if the file
/// exists but is malformed.
pub fn find_config(dir: &Utf8Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path
        .try_exists()
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to stat config '{config_path}'"))?
    {
        tracing::debug!(path = %config_path, "using configuration file");
        parse_config(&config_path).map(Some)
    } else {
        Ok(None)
    }
}

fn parse_language(name: &str) -> Result<Language, ConfigError> {
    Language::from_name(name).ok_or_else(|| ConfigError::UnknownLanguage(name.to_string()))
}

impl ConfigFile {
    /// Validates the file into [`Settings`].
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let mut settings = Settings::default();
        if let Some(language) = &self.lint.language {
            settings.language = parse_language(language)?;
        }
        if let Some(parallel) = self.lint.parallel {
            settings.lint.parallel = parallel;
        }
        for (rule, level) in self.rules {
            let Some(found) = find_rule(&rule) else {
                return Err(ConfigError::UnknownRule(rule));
            };
            let level: RuleLevel = level
                .parse()
                .map_err(|source| ConfigError::InvalidLevel {
                    rule: rule.clone(),
                    source,
                })?;
            settings
                .lint
                .rule_levels
                .insert(found.descriptor().id.into(), level);
        }
        Ok(settings)
    }
}

impl Settings {
    /// Applies command-line overrides.
    pub fn with_overrides(
        mut self,
        language: Option<&str>,
        sequential: bool,
    ) -> Result<Self, ConfigError> {
        if let Some(language) = language {
            self.language = parse_language(language)?;
        }
        if sequential {
            self.lint.parallel = false;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::write(path.join(CONFIG_FILE_NAME), content).unwrap();
        path
    }

    #[test]
    fn parse_full_config() {
        let temp = TempDir::new().unwrap();
        let dir = write_config(
            &temp,
            r#"
[lint]
language = "visual-basic"
parallel = false

[rules]
ca2215 = "warning"
"#,
        );

        let settings = parse_config(&dir.join(CONFIG_FILE_NAME))
            .unwrap()
            .into_settings()
            .unwrap();
        assert_eq!(settings.language, Language::VisualBasic);
        assert!(!settings.lint.parallel);
        assert_eq!(settings.lint.level("CA2215"), Some(RuleLevel::Warning));
        assert!(settings.lint.rule_levels.contains_key("CA2215"));
    }

    #[test]
    fn empty_config_is_default() {
        let temp = TempDir::new().unwrap();
        let dir = write_config(&temp, "");
        let settings = find_config(&dir).unwrap().unwrap().into_settings().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn missing_config_is_none() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        assert!(find_config(&dir).unwrap().is_none());
    }

    #[test]
    fn unknown_rule_is_an_error() {
        let config: ConfigFile = toml::from_str("[rules]\nCA9999 = \"off\"\n").unwrap();
        let err = config.into_settings().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRule(ref id) if id == "CA9999"));
    }

    #[test]
    fn invalid_level_is_an_error() {
        let config: ConfigFile = toml::from_str("[rules]\nCA2215 = \"loud\"\n").unwrap();
        let err = config.into_settings().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel { .. }));
    }

    #[test]
    fn unknown_language_is_an_error() {
        let config: ConfigFile = toml::from_str("[lint]\nlanguage = \"cobol\"\n").unwrap();
        assert!(matches!(
            config.into_settings(),
            Err(ConfigError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = TempDir::new().unwrap();
        let dir = write_config(&temp, "[lint]\nthreads = 4\n");
        let result = parse_config(&dir.join(CONFIG_FILE_NAME));
        let err = format!("{:?}", result.unwrap_err());
        assert!(err.contains(CONFIG_FILE_NAME), "error should mention file: {err}");
    }

    #[test]
    fn flags_override_file_values() {
        let settings = Settings::default()
            .with_overrides(Some("vb"), true)
            .unwrap();
        assert_eq!(settings.language, Language::VisualBasic);
        assert!(!settings.lint.parallel);
    }
}
