//! Step environment resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Upstream step outputs: inline JSON or a path to a JSON file.
pub const STEPS_ENV: &str = "PIPEDREAM_STEPS";

/// File that `name:json=<value>` export lines are appended to.
pub const EXPORTS_ENV: &str = "PIPEDREAM_EXPORTS";

/// Log filter for stderr logging.
pub const LOG_ENV: &str = "PIPEDREAM_LOG";

/// Filter used when `PIPEDREAM_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "pipedream=info,pipedream_sdk=info,warn";

/// Where the steps payload comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StepsSource {
    /// The JSON document itself.
    Inline(String),
    /// A file containing the JSON document.
    File(PathBuf),
}

impl StepsSource {
    /// Classify a raw `PIPEDREAM_STEPS` value.
    ///
    /// Values that start like a JSON document (`{`, `[`, `"`), JSON literals
    /// and numbers are inline; anything else names a file.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let inline = trimmed.starts_with(['{', '[', '"'])
            || matches!(trimmed, "null" | "true" | "false")
            || serde_json::from_str::<serde_json::Number>(trimmed).is_ok();
        if inline {
            StepsSource::Inline(raw.to_string())
        } else {
            StepsSource::File(PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            StepsSource::Inline(s) => format!("inline ({} bytes)", s.len()),
            StepsSource::File(p) => format!("file {}", p.display()),
        }
    }
}

/// Resolved environment of one step process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptEnv {
    /// Source of upstream step outputs, if the host provided one.
    pub steps: Option<StepsSource>,

    /// Exports file, if the host provided one.
    pub exports_path: Option<PathBuf>,

    /// Log filter directive, if set.
    pub log_filter: Option<String>,
}

impl ScriptEnv {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| match std::env::var(var) {
            Ok(v) => Ok(Some(v)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode {
                var: var.to_string(),
            }),
        })
    }

    /// Resolve through an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<Option<String>>,
    {
        let get = |var: &str| -> Result<Option<String>> {
            Ok(lookup(var)?.filter(|v| !v.trim().is_empty()))
        };

        let env = Self {
            steps: get(STEPS_ENV)?.as_deref().map(StepsSource::parse),
            exports_path: get(EXPORTS_ENV)?.map(PathBuf::from),
            log_filter: get(LOG_ENV)?,
        };
        tracing::debug!(
            steps = ?env.steps.as_ref().map(StepsSource::describe),
            exports = ?env.exports_path,
            "resolved step environment"
        );
        Ok(env)
    }

    /// The exports file, or an error naming the missing variable.
    pub fn require_exports_path(&self) -> Result<&Path> {
        self.exports_path
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar {
                var: EXPORTS_ENV.to_string(),
            })
    }

    /// The steps source, or an error naming the missing variable.
    pub fn require_steps(&self) -> Result<&StepsSource> {
        self.steps.as_ref().ok_or_else(|| ConfigError::MissingVar {
            var: STEPS_ENV.to_string(),
        })
    }

    /// Effective log filter.
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn with_steps(mut self, steps: StepsSource) -> Self {
        self.steps = Some(steps);
        self
    }

    pub fn with_exports_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.exports_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<Option<String>> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| Ok(map.get(var).cloned())
    }

    #[test]
    fn test_inline_steps() {
        let env = ScriptEnv::from_lookup(lookup(&[(STEPS_ENV, r#"{"foo": true}"#)])).unwrap();
        assert_eq!(
            env.steps,
            Some(StepsSource::Inline(r#"{"foo": true}"#.into()))
        );
    }

    #[test]
    fn test_steps_file_path() {
        let env = ScriptEnv::from_lookup(lookup(&[(STEPS_ENV, "/tmp/steps.json")])).unwrap();
        assert_eq!(
            env.steps,
            Some(StepsSource::File(PathBuf::from("/tmp/steps.json")))
        );
    }

    #[test]
    fn test_literal_values_are_inline() {
        for raw in ["null", "true", "false", "3.5", " [1, 2]", "\"text\""] {
            assert!(
                matches!(StepsSource::parse(raw), StepsSource::Inline(_)),
                "{raw} should be inline"
            );
        }
        assert!(matches!(
            StepsSource::parse("steps.json"),
            StepsSource::File(_)
        ));
    }

    #[test]
    fn test_non_json_number_words_are_paths() {
        for raw in ["inf", "nan", "infinity", "NaN", "1e5x"] {
            assert_eq!(
                StepsSource::parse(raw),
                StepsSource::File(PathBuf::from(raw)),
                "{raw} should be a path"
            );
        }
        assert!(matches!(StepsSource::parse("-1e5"), StepsSource::Inline(_)));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let env =
            ScriptEnv::from_lookup(lookup(&[(STEPS_ENV, ""), (EXPORTS_ENV, "  ")])).unwrap();
        assert!(env.steps.is_none());
        assert!(env.exports_path.is_none());
    }

    #[test]
    fn test_require_exports_path() {
        let env = ScriptEnv::default();
        let err = env.require_exports_path().unwrap_err();
        assert!(err.to_string().contains(EXPORTS_ENV));

        let env = env.with_exports_path("/tmp/exports");
        assert_eq!(env.require_exports_path().unwrap(), Path::new("/tmp/exports"));
    }

    #[test]
    fn test_require_steps() {
        let err = ScriptEnv::default().require_steps().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar { ref var } if var == STEPS_ENV));
    }

    #[test]
    fn test_log_filter_default() {
        assert_eq!(ScriptEnv::default().log_filter(), DEFAULT_LOG_FILTER);
        let env = ScriptEnv::from_lookup(lookup(&[(LOG_ENV, "debug")])).unwrap();
        assert_eq!(env.log_filter(), "debug");
    }

    #[test]
    fn test_lookup_error_propagates() {
        let err = ScriptEnv::from_lookup(|var| {
            Err(ConfigError::NotUnicode {
                var: var.to_string(),
            })
        })
        .unwrap_err();
        assert!(err.to_string().contains("not valid unicode"));
    }

    #[test]
    fn test_roundtrips_as_json() {
        let env = ScriptEnv::default()
            .with_steps(StepsSource::File("/x.json".into()))
            .with_exports_path("/e");
        let json = serde_json::to_string(&env).unwrap();
        let back: ScriptEnv = serde_json::from_str(&json).unwrap();
        assert_eq!(back, env);
    }
}
