use analyzer_core::EngineMetadata;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::{OrchestratorError, Result};

/// Engine names double as container and log identifiers.
fn engine_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("engine name pattern is valid")
    })
}

/// Read-only lookup of engine metadata by name.
pub trait EngineRegistry: Send + Sync {
    fn lookup(&self, name: &str) -> Option<EngineMetadata>;

    fn contains_key(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Enforce the naming contract for engines taken from this registry.
    fn validate_name(&self, name: &str) -> Result<()> {
        if engine_name_pattern().is_match(name) {
            Ok(())
        } else {
            Err(OrchestratorError::invalid_name(
                name,
                "must start with an alphanumeric character and contain only [A-Za-z0-9_.-]",
            ))
        }
    }
}

/// Registry backed by an in-memory map, typically loaded from a file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticRegistry {
    #[serde(default)]
    engines: BTreeMap<String, EngineMetadata>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, name: impl Into<String>, metadata: EngineMetadata) -> Self {
        self.register(name, metadata);
        self
    }

    pub fn register(&mut self, name: impl Into<String>, metadata: EngineMetadata) {
        self.engines.insert(name.into(), metadata);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.engines.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EngineMetadata)> {
        self.engines.iter().map(|(name, metadata)| (name.as_str(), metadata))
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl EngineRegistry for StaticRegistry {
    fn lookup(&self, name: &str) -> Option<EngineMetadata> {
        self.engines.get(name).cloned()
    }

    fn contains_key(&self, name: &str) -> bool {
        self.engines.contains_key(name)
    }
}
