//! Loading the engine registry and the `--dev` fallback.

use analyzer_core::EngineMetadata;
use anyhow::{Context, Result};
use orchestrator::{EngineRegistry, StaticRegistry};
use std::path::Path;
use tracing::debug;

use crate::error::CliError;

/// Prefix of the command a development engine is launched with.
pub const DEV_ENGINE_PREFIX: &str = "analyzer-engine-";

/// Parse a TOML registry of `[engines.<name>]` tables.
pub fn parse_registry(content: &str, path: &Path) -> Result<StaticRegistry> {
    toml::from_str(content).map_err(|e| {
        CliError::InvalidRegistry {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

pub async fn load_registry(path: &Path) -> Result<StaticRegistry> {
    if !path.exists() {
        return Err(CliError::RegistryNotFound(path.to_path_buf()).into());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read registry {}", path.display()))?;
    let registry = parse_registry(&content, path)?;
    debug!(path = %path.display(), engines = registry.len(), "Registry loaded");
    Ok(registry)
}

/// Registry used with `--dev`: unknown engines resolve to a local
/// `analyzer-engine-<name>` command instead of being skipped.
pub struct DevRegistry {
    inner: StaticRegistry,
}

impl DevRegistry {
    pub fn new(inner: StaticRegistry) -> Self {
        Self { inner }
    }
}

impl EngineRegistry for DevRegistry {
    fn lookup(&self, name: &str) -> Option<EngineMetadata> {
        self.inner.lookup(name).or_else(|| {
            Some(
                EngineMetadata::default()
                    .with_command([format!("{}{}", DEV_ENGINE_PREFIX, name)])
                    .with_description("development engine"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REGISTRY: &str = r#"
[engines.rubocop]
command = ["rubocop-engine", "--json"]
description = "Ruby style"
timeout_secs = 900

[engines.rubocop.channels]
stable = "analyzer/rubocop:1.0"

[engines.structure]
image = "analyzer/structure"
"#;

    #[test]
    fn test_parse_registry() {
        let registry = parse_registry(REGISTRY, Path::new("engines.toml")).unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["rubocop", "structure"]);

        let rubocop = registry.lookup("rubocop").unwrap();
        assert_eq!(rubocop.command, vec!["rubocop-engine", "--json"]);
        assert_eq!(rubocop.description.as_deref(), Some("Ruby style"));
        assert_eq!(rubocop.timeout_secs, Some(900));
        assert_eq!(
            rubocop.channels.get("stable").map(String::as_str),
            Some("analyzer/rubocop:1.0")
        );

        let structure = registry.lookup("structure").unwrap();
        assert_eq!(structure.image.as_deref(), Some("analyzer/structure"));
        assert!(structure.command.is_empty());
    }

    #[test]
    fn test_parse_registry_rejects_bad_toml() {
        let err = parse_registry("[engines.x]\ncommand = 3\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::InvalidRegistry { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_registry_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_registry(&dir.path().join("engines.toml")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::RegistryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_load_registry_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("engines.toml");
        std::fs::write(&path, REGISTRY).unwrap();

        let registry = load_registry(&path).await.unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_dev_registry_falls_back() {
        let registry = DevRegistry::new(parse_registry(REGISTRY, Path::new("r.toml")).unwrap());

        assert_eq!(
            registry.lookup("rubocop").unwrap().command,
            vec!["rubocop-engine", "--json"]
        );
        assert_eq!(
            registry.lookup("eslint").unwrap().command,
            vec!["analyzer-engine-eslint"]
        );
        assert!(registry.contains_key("anything"));
    }
}
