use analyzer_core::{ConfigPayload, EXCLUDE_PATHS_KEY};
use serde_json::{Map, Value};

use crate::exclusions::ExclusionSet;

/// Key of the engine-specific section inside an engine's settings.
const CONFIG_KEY: &str = "config";
const LEGACY_FILE_KEY: &str = "file";

/// Builds the payload handed to one engine.
pub struct EngineConfigBuilder;

impl EngineConfigBuilder {
    /// Merge the exclusion set into `settings` and apply the legacy
    /// `config.file` flattening. No other key is touched.
    pub fn build(settings: &Map<String, Value>, exclusions: &ExclusionSet) -> ConfigPayload {
        let mut config = settings.clone();
        config.insert(EXCLUDE_PATHS_KEY.to_string(), exclusions.to_value());
        Self::normalize_legacy_config(&mut config);
        ConfigPayload::new(config)
    }

    /// Engines written against the old contract expect `config` to be the
    /// config file path itself, so `{"config": {"file": x}}` becomes
    /// `{"config": x}`. Any other shape is left alone.
    pub fn normalize_legacy_config(config: &mut Map<String, Value>) {
        let file = match config.get(CONFIG_KEY) {
            Some(Value::Object(section)) if section.len() == 1 => section.get(LEGACY_FILE_KEY).cloned(),
            _ => None,
        };

        if let Some(file) = file {
            config.insert(CONFIG_KEY.to_string(), file);
        }
    }
}
