//! User configuration: which engines to run and which paths to skip.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::{OrchestratorError, Result};

/// Default configuration file name, looked up in the source directory.
pub const CONFIG_FILE: &str = ".analyzer.yml";

/// Per-engine settings as declared by the user.
pub trait EngineSettings {
    fn is_enabled(&self) -> bool;

    fn raw_settings(&self) -> &Map<String, Value>;
}

/// One entry under `engines:`. Everything the user wrote is kept and
/// later handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EngineEntry(Map<String, Value>);

impl EngineEntry {
    pub fn new(settings: Map<String, Value>) -> Self {
        Self(settings)
    }

    pub fn enabled() -> Self {
        Self::default().with_setting("enabled", Value::Bool(true))
    }

    pub fn disabled() -> Self {
        Self::default().with_setting("enabled", Value::Bool(false))
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }
}

impl EngineSettings for EngineEntry {
    /// Only an explicit true value enables an engine. The YAML 1.1 spellings
    /// (`yes`, `on`, `y`) still count, since serde_yaml reads them as strings.
    fn is_enabled(&self) -> bool {
        match self.0.get("enabled") {
            Some(Value::Bool(enabled)) => *enabled,
            Some(Value::String(enabled)) => is_yaml11_true(enabled),
            _ => false,
        }
    }

    fn raw_settings(&self) -> &Map<String, Value> {
        &self.0
    }
}

fn is_yaml11_true(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "on"
    )
}

impl<'de> Deserialize<'de> for EngineEntry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let settings = Option::<Map<String, Value>>::deserialize(deserializer)?;
        Ok(Self(settings.unwrap_or_default()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default, deserialize_with = "deserialize_engines")]
    engines: Vec<(String, EngineEntry)>,
    #[serde(default)]
    exclude_paths: Option<Vec<String>>,
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, name: impl Into<String>, entry: EngineEntry) -> Self {
        let name = name.into();
        match self.engines.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = entry,
            None => self.engines.push((name, entry)),
        }
        self
    }

    pub fn with_exclude_paths<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_paths = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Engines in declaration order.
    pub fn engines(&self) -> impl Iterator<Item = (&str, &EngineEntry)> {
        self.engines.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn engine(&self, name: &str) -> Option<&EngineEntry> {
        self.engines
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, entry)| entry)
    }

    pub fn exclude_paths(&self) -> &[String] {
        self.exclude_paths.as_deref().unwrap_or_default()
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from a YAML file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            OrchestratorError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::from_yaml_str(&content)?;
        debug!(
            path = %path.display(),
            engines = config.engines.len(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Collect `engines:` keeping the order the user declared them in.
fn deserialize_engines<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, EngineEntry)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EnginesVisitor;

    impl<'de> Visitor<'de> for EnginesVisitor {
        type Value = Vec<(String, EngineEntry)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of engine name to engine settings")
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut engines: Vec<(String, EngineEntry)> =
                Vec::with_capacity(map.size_hint().unwrap_or(0));

            while let Some((name, entry)) = map.next_entry::<String, EngineEntry>()? {
                if engines.iter().any(|(existing, _)| *existing == name) {
                    return Err(de::Error::custom(format!("duplicate engine '{}'", name)));
                }
                engines.push((name, entry));
            }

            Ok(engines)
        }
    }

    deserializer.deserialize_any(EnginesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
engines:
  structure:
    enabled: true
  rubocop:
    enabled: true
    config:
      file: .rubocop.yml
  eslint:
    enabled: false
  duplication:
    channel: beta
exclude_paths:
  - "tmp/**"
  - vendor/
"#;

    #[test]
    fn test_parse_preserves_declaration_order() {
        let config = AnalyzerConfig::from_yaml_str(SAMPLE).unwrap();
        let names: Vec<&str> = config.engines().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["structure", "rubocop", "eslint", "duplication"]);
        assert_eq!(config.exclude_paths(), ["tmp/**", "vendor/"]);
    }

    #[test]
    fn test_enabled_requires_explicit_true() {
        let config = AnalyzerConfig::from_yaml_str(SAMPLE).unwrap();

        assert!(config.engine("structure").unwrap().is_enabled());
        assert!(!config.engine("eslint").unwrap().is_enabled());
        assert!(!config.engine("duplication").unwrap().is_enabled());
    }

    #[test]
    fn test_yaml11_booleans_enable() {
        let config = AnalyzerConfig::from_yaml_str(
            "engines:\n  a: {enabled: yes}\n  b: {enabled: On}\n  c: {enabled: no}\n  d: {enabled: maybe}\n  e: {enabled: 1}\n",
        )
        .unwrap();

        assert!(config.engine("a").unwrap().is_enabled());
        assert!(config.engine("b").unwrap().is_enabled());
        assert!(!config.engine("c").unwrap().is_enabled());
        assert!(!config.engine("d").unwrap().is_enabled());
        assert!(!config.engine("e").unwrap().is_enabled());
    }

    #[test]
    fn test_raw_settings_keep_everything() {
        let config = AnalyzerConfig::from_yaml_str(SAMPLE).unwrap();
        let rubocop = config.engine("rubocop").unwrap().raw_settings();

        assert_eq!(rubocop.get("config"), Some(&json!({ "file": ".rubocop.yml" })));
        assert_eq!(rubocop.get("enabled"), Some(&json!(true)));
    }

    #[test]
    fn test_empty_and_null_sections() {
        assert_eq!(AnalyzerConfig::from_yaml_str("").unwrap().engines().count(), 0);

        let config = AnalyzerConfig::from_yaml_str("engines:\nexclude_paths:\n").unwrap();
        assert_eq!(config.engines().count(), 0);
        assert!(config.exclude_paths().is_empty());

        let config = AnalyzerConfig::from_yaml_str("engines:\n  rubocop:\n").unwrap();
        assert!(!config.engine("rubocop").unwrap().is_enabled());
    }

    #[test]
    fn test_duplicate_engine_rejected() {
        let err = AnalyzerConfig::from_yaml_str("engines:\n  a: {enabled: true}\n  a: {enabled: false}\n")
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_with_engine_replaces_in_place() {
        let config = AnalyzerConfig::new()
            .with_engine("a", EngineEntry::enabled())
            .with_engine("b", EngineEntry::enabled())
            .with_engine("a", EngineEntry::disabled());

        let names: Vec<&str> = config.engines().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(!config.engine("a").unwrap().is_enabled());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        tokio::fs::write(&path, SAMPLE).await.unwrap();

        let config = AnalyzerConfig::load(&path).await.unwrap();
        assert_eq!(config.engines().count(), 4);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = AnalyzerConfig::load(&dir.path().join(CONFIG_FILE)).await;
        assert!(matches!(result, Err(OrchestratorError::Config(_))));
    }
}
