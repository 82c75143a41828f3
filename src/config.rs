//! Naming policy resolution.
//!
//! A policy comes from one of two sources: pattern flags given on the command
//! line, or a JSON document named by `--json`. When a JSON document is given it
//! replaces the command line entirely; fields are never merged across sources.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::pattern;

/// Errors that stop a run before any model is checked.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("\"{pattern}\" is not a valid regular expression: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("configuration file not found: {}", .0.display())]
    MissingJson(PathBuf),
    #[error("reading configuration file {}: {source}", .path.display())]
    ReadJson {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing configuration file {}: {source}", .path.display())]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolved naming policy for one run.
///
/// A `None` pattern disables its category entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    pub variable: Option<String>,
    pub member_variable: Option<String>,
    pub global_variable: Option<String>,
    pub private_member_variable: Option<String>,
    pub constant: Option<String>,
    pub class: Option<String>,
    pub function: Option<String>,
    /// Path patterns; findings in matching files are never reported.
    pub exclude: Vec<String>,
    /// Function names exempt from the function pattern.
    pub function_whitelist: BTreeSet<String>,
}

impl Policy {
    /// Check every pattern in the policy, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let slots = [
            &self.variable,
            &self.member_variable,
            &self.global_variable,
            &self.class,
            &self.constant,
            &self.private_member_variable,
            &self.function,
        ];
        for p in slots.into_iter().flatten() {
            validate_pattern(p)?;
        }
        for p in &self.exclude {
            validate_pattern(p)?;
        }
        Ok(())
    }

    /// Whether no naming check is enabled at all.
    pub fn is_empty(&self) -> bool {
        self.variable.is_none()
            && self.member_variable.is_none()
            && self.global_variable.is_none()
            && self.private_member_variable.is_none()
            && self.constant.is_none()
            && self.class.is_none()
            && self.function.is_none()
    }

    pub fn is_whitelisted_function(&self, name: &str) -> bool {
        self.function_whitelist.contains(name)
    }
}

/// Patterns given directly as command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliPatterns {
    pub var: Option<String>,
    pub memvar: Option<String>,
    pub gvar: Option<String>,
    pub class: Option<String>,
    pub constant: Option<String>,
    pub private_member_variable: Option<String>,
    pub function: Option<String>,
}

impl From<CliPatterns> for Policy {
    fn from(cli: CliPatterns) -> Self {
        Policy {
            variable: cli.var,
            member_variable: cli.memvar,
            global_variable: cli.gvar,
            private_member_variable: cli.private_member_variable,
            constant: cli.constant,
            class: cli.class,
            function: cli.function,
            ..Default::default()
        }
    }
}

/// On-disk JSON configuration. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonConfig {
    #[serde(default)]
    pub var: Option<String>,
    #[serde(default)]
    pub memvar: Option<String>,
    #[serde(default)]
    pub gvar: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub function_whitelist: Vec<String>,
}

impl JsonConfig {
    /// Read a JSON configuration from disk.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingJson(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadJson {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::ParseJson {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl From<JsonConfig> for Policy {
    fn from(json: JsonConfig) -> Self {
        Policy {
            variable: json.var,
            member_variable: json.memvar,
            global_variable: json.gvar,
            class: json.class,
            function: json.function,
            exclude: json.exclude.unwrap_or_default(),
            function_whitelist: json.function_whitelist.into_iter().collect(),
            ..Default::default()
        }
    }
}

/// Where the policy was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from a JSON document.
    Json(PathBuf),
    /// Built from command-line pattern flags.
    CommandLine,
}

/// Resolve and validate the policy for a run.
///
/// If `json` is given, `cli` is discarded without being validated.
pub fn resolve(cli: CliPatterns, json: Option<&Path>) -> Result<(Policy, ConfigSource), ConfigError> {
    let (policy, source) = match json {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading JSON naming configuration");
            let config = JsonConfig::parse_file(path)?;
            (Policy::from(config), ConfigSource::Json(path.to_path_buf()))
        }
        None => (Policy::from(cli), ConfigSource::CommandLine),
    };
    policy.validate()?;
    Ok((policy, source))
}

fn validate_pattern(p: &str) -> Result<(), ConfigError> {
    pattern::validate(p).map_err(|source| ConfigError::InvalidPattern {
        pattern: p.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_json(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("naming.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_resolve_from_cli() {
        let cli = CliPatterns {
            var: Some("[a-z].*".to_string()),
            constant: Some("k[A-Z].*".to_string()),
            ..Default::default()
        };
        let (policy, source) = resolve(cli, None).unwrap();
        assert_eq!(source, ConfigSource::CommandLine);
        assert_eq!(policy.variable.as_deref(), Some("[a-z].*"));
        assert_eq!(policy.constant.as_deref(), Some("k[A-Z].*"));
        assert!(policy.exclude.is_empty());
        assert!(policy.function_whitelist.is_empty());
    }

    #[test]
    fn test_json_replaces_cli() {
        let temp = TempDir::new().unwrap();
        let path = write_json(
            &temp,
            r#"{"function": "[A-Z].*", "function_whitelist": ["main"], "exclude": ["third_party/.*"]}"#,
        );
        let cli = CliPatterns {
            var: Some("[a-z].*".to_string()),
            constant: Some("k.*".to_string()),
            ..Default::default()
        };

        let (policy, source) = resolve(cli, Some(&path)).unwrap();
        assert_eq!(source, ConfigSource::Json(path));
        assert_eq!(policy.variable, None);
        assert_eq!(policy.constant, None);
        assert_eq!(policy.function.as_deref(), Some("[A-Z].*"));
        assert!(policy.is_whitelisted_function("main"));
        assert_eq!(policy.exclude, vec!["third_party/.*".to_string()]);
    }

    #[test]
    fn test_json_discards_invalid_cli_pattern() {
        let temp = TempDir::new().unwrap();
        let path = write_json(&temp, r#"{"var": "[a-z].*"}"#);
        let cli = CliPatterns {
            function: Some("[unclosed".to_string()),
            ..Default::default()
        };
        assert!(resolve(cli, Some(&path)).is_ok());
    }

    #[test]
    fn test_unknown_json_fields_ignored() {
        let temp = TempDir::new().unwrap();
        let path = write_json(&temp, r#"{"var": "[a-z]", "const": "k.*", "comment": 3}"#);
        let (policy, _) = resolve(CliPatterns::default(), Some(&path)).unwrap();
        assert_eq!(policy.variable.as_deref(), Some("[a-z]"));
        assert_eq!(policy.constant, None);
    }

    #[test]
    fn test_missing_json_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.json");
        let err = resolve(CliPatterns::default(), Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingJson(_)));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = write_json(&temp, r#"{"var": 42}"#);
        let err = resolve(CliPatterns::default(), Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseJson { .. }));
    }

    #[test]
    fn test_invalid_pattern_names_offender() {
        let cli = CliPatterns {
            var: Some("[a-z].*".to_string()),
            gvar: Some("g_(".to_string()),
            ..Default::default()
        };
        let err = resolve(cli, None).unwrap_err();
        match &err {
            ConfigError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "g_("),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("\"g_(\" is not a valid regular expression"));
    }

    #[test]
    fn test_invalid_exclude_entry() {
        let temp = TempDir::new().unwrap();
        let path = write_json(&temp, r#"{"exclude": ["ok/.*", "bad/[" ]}"#);
        let err = resolve(CliPatterns::default(), Some(&path)).unwrap_err();
        match err {
            ConfigError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "bad/["),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_policy() {
        assert!(Policy::default().is_empty());
        let policy = Policy {
            class: Some("[A-Z]".to_string()),
            ..Default::default()
        };
        assert!(!policy.is_empty());
    }
}
