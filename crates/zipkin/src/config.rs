use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::event::FieldRef;

/// Default source and target field.
pub const DEFAULT_FIELD: &str = "span";

/// Tag added to events whose span could not be decoded.
pub const DECODE_FAILURE_TAG: &str = "_decodefailure";

/// Environment variable overriding the source field.
pub const SOURCE_ENV: &str = "ZIPKIN_FILTER_SOURCE";

/// Environment variable overriding the target field.
pub const TARGET_ENV: &str = "ZIPKIN_FILTER_TARGET";

/// Configuration of a [`ZipkinFilter`](crate::ZipkinFilter).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Field holding the base64-encoded span.
    pub source: FieldRef,
    /// Field the normalized span is written to.
    pub target: FieldRef,
    /// Tags added when decoding fails.
    pub tag_on_failure: Vec<String>,
    /// Tags added after a successful decode.
    pub add_tag: Vec<String>,
    /// Tags removed after a successful decode.
    pub remove_tag: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            source: FieldRef::parse(DEFAULT_FIELD),
            target: FieldRef::parse(DEFAULT_FIELD),
            tag_on_failure: vec![DECODE_FAILURE_TAG.to_string()],
            add_tag: Vec::new(),
            remove_tag: Vec::new(),
        }
    }
}

impl FilterConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid filter config")
    }

    /// Load the config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading filter config {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// Replace the source and target fields with values from `lookup`,
    /// keyed by [`SOURCE_ENV`] and [`TARGET_ENV`]. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v: &String| !v.is_empty());
        if let Some(source) = lookup(SOURCE_ENV) {
            self.source = FieldRef::parse(source);
        }
        if let Some(target) = lookup(TARGET_ENV) {
            self.target = FieldRef::parse(target);
        }
        self
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = FilterConfig::from_json("{}").unwrap();
        assert_eq!(cfg, FilterConfig::default());
        assert_eq!(cfg.source.as_str(), "span");
        assert_eq!(cfg.target.as_str(), "span");
        assert_eq!(cfg.tag_on_failure, vec!["_decodefailure"]);
    }

    #[test]
    fn test_from_json() {
        let cfg = FilterConfig::from_json(
            r#"{
                "source": "message",
                "target": "[@metadata][span]",
                "add_tag": ["zipkin"],
                "tag_on_failure": ["_zipkinfailure"]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.source.as_str(), "message");
        assert_eq!(cfg.target.path(), ["@metadata", "span"]);
        assert_eq!(cfg.add_tag, vec!["zipkin"]);
        assert_eq!(cfg.tag_on_failure, vec!["_zipkinfailure"]);
        assert!(cfg.remove_tag.is_empty());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = FilterConfig::from_json(r#"{"sauce": "span"}"#).unwrap_err();
        assert!(format!("{err:#}").contains("unknown field"));
    }

    #[test]
    fn test_overrides() {
        let cfg = FilterConfig::default().with_overrides(|key| match key {
            SOURCE_ENV => Some("encoded".to_string()),
            TARGET_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(cfg.source.as_str(), "encoded");
        assert_eq!(cfg.target.as_str(), "span");
    }

    #[test]
    fn test_load_missing_file() {
        let err = FilterConfig::load(Path::new("/nonexistent/zipkin.json")).unwrap_err();
        assert!(err.to_string().contains("failed reading filter config"));
    }
}
