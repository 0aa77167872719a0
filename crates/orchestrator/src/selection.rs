use tracing::debug;

use crate::config::{AnalyzerConfig, EngineEntry, EngineSettings};
use crate::error::{OrchestratorError, Result};
use crate::registry::EngineRegistry;

/// Picks the engines a run will execute.
pub struct EngineSelector;

impl EngineSelector {
    /// Every engine that is enabled and registered, in declaration order.
    ///
    /// Fails with [`OrchestratorError::NoEnabledEngines`] when nothing is left.
    pub fn select<'a>(
        config: &'a AnalyzerConfig,
        registry: &dyn EngineRegistry,
    ) -> Result<Vec<(&'a str, &'a EngineEntry)>> {
        let selected: Vec<(&str, &EngineEntry)> = config
            .engines()
            .filter(|(name, entry)| {
                let eligible = entry.is_enabled() && registry.contains_key(name);
                if !eligible {
                    debug!(engine = %name, enabled = entry.is_enabled(), "Skipping engine");
                }
                eligible
            })
            .collect();

        if selected.is_empty() {
            return Err(OrchestratorError::NoEnabledEngines);
        }

        Ok(selected)
    }
}
