use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key under which the resolved exclusion set is handed to every engine.
pub const EXCLUDE_PATHS_KEY: &str = "exclude_paths";

/// Registry entry describing how an engine is packaged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMetadata {
    /// Container image, when the engine ships as one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Program and arguments used to launch the engine
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Release channel name to image/tag
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub channels: BTreeMap<String, String>,
    /// Upper bound on a single run, enforced by the engine implementation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl EngineMetadata {
    pub fn with_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Configuration document passed to a single engine.
///
/// After the orchestrator builds it, the payload always carries
/// [`EXCLUDE_PATHS_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigPayload(Map<String, Value>);

impl ConfigPayload {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn exclude_paths(&self) -> Vec<&str> {
        self.0
            .get(EXCLUDE_PATHS_KEY)
            .and_then(Value::as_array)
            .map(|paths| paths.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }
}

impl From<Map<String, Value>> for ConfigPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One engine instantiated for a run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineDescriptor {
    name: String,
    metadata: EngineMetadata,
    source_dir: PathBuf,
    config: ConfigPayload,
    label: String,
}

impl EngineDescriptor {
    pub fn new(
        name: impl Into<String>,
        metadata: EngineMetadata,
        source_dir: impl Into<PathBuf>,
        config: ConfigPayload,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            metadata,
            source_dir: source_dir.into(),
            config,
            label: label.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &EngineMetadata {
        &self.metadata
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn config(&self) -> &ConfigPayload {
        &self.config
    }

    /// Correlation token for side effects of this engine (e.g. a container name).
    pub fn label(&self) -> &str {
        &self.label
    }
}
