//! The run loop: select engines, drive the reporter lifecycle, run each
//! engine in turn.

use analyzer_core::EngineDescriptor;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use uuid::Uuid;
use vcs::GitVcs;

use crate::config::{AnalyzerConfig, EngineSettings};
use crate::engine::{Engine, EngineFactory};
use crate::engine_config::EngineConfigBuilder;
use crate::error::{OrchestratorError, Result};
use crate::exclusions::PathExclusionResolver;
use crate::metrics::{engine_timer_key, Metrics, TracingMetrics, ENGINES_TIMER};
use crate::registry::EngineRegistry;
use crate::reporter::Reporter;
use crate::resources::ReporterGuard;
use crate::selection::EngineSelector;
use crate::state_machine::{RunState, RunStateMachine};

/// What a completed run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub engines: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runs the enabled engines of one configuration against a source tree.
///
/// Engines are selected and instantiated on first use and reused by later
/// runs. Each run consumes one reporter and always closes it once `started`
/// has been delivered.
pub struct EnginesRunner {
    registry: Arc<dyn EngineRegistry>,
    factory: Arc<dyn EngineFactory>,
    config: AnalyzerConfig,
    source_dir: PathBuf,
    resolver: PathExclusionResolver,
    label: Option<String>,
    metrics: Arc<dyn Metrics>,
    engines: OnceCell<Vec<Box<dyn Engine>>>,
}

impl EnginesRunner {
    pub fn new(
        registry: Arc<dyn EngineRegistry>,
        factory: Arc<dyn EngineFactory>,
        config: AnalyzerConfig,
        source_dir: impl Into<PathBuf>,
    ) -> Self {
        let source_dir = source_dir.into();
        let resolver = PathExclusionResolver::new(source_dir.clone(), Arc::new(GitVcs::new()));

        Self {
            registry,
            factory,
            config,
            source_dir,
            resolver,
            label: None,
            metrics: Arc::new(TracingMetrics),
            engines: OnceCell::new(),
        }
    }

    pub fn with_resolver(mut self, resolver: PathExclusionResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Share one label across all engines instead of a fresh UUID each.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Descriptors of the engines a run would execute.
    pub async fn descriptors(&self) -> Result<Vec<&EngineDescriptor>> {
        let engines = self.engines().await?;
        Ok(engines.iter().map(|engine| engine.descriptor()).collect())
    }

    pub async fn run<R: Reporter>(&self, reporter: R) -> Result<RunSummary> {
        let mut state = RunState::Idle;
        RunStateMachine::advance(&mut state, RunState::Selecting)?;

        let engines = match self.engines().await {
            Ok(engines) => engines,
            Err(e) => {
                RunStateMachine::advance(&mut state, RunState::Aborted)?;
                return Err(e);
            }
        };

        info!(count = engines.len(), "running {} engines", engines.len());
        let started_at = Utc::now();

        RunStateMachine::advance(&mut state, RunState::Started)?;
        let mut guard = ReporterGuard::start(reporter)?;

        RunStateMachine::advance(&mut state, RunState::Running)?;
        let outcome = match Self::run_engines(self, engines, guard.reporter()).await {
            Ok(()) => guard
                .finish()
                .map_err(OrchestratorError::from)
                .and_then(|()| RunStateMachine::advance(&mut state, RunState::Finished)),
            Err(e) => Err(e),
        };

        let closed = guard.close();
        RunStateMachine::advance(&mut state, RunState::Closed)?;
        debug!(state = %state, "Run closed");

        outcome?;
        closed?;

        Ok(RunSummary {
            engines: engines
                .iter()
                .map(|engine| engine.descriptor().name().to_string())
                .collect(),
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn run_engines(
        &self,
        engines: &[Box<dyn Engine>],
        reporter: &mut dyn Reporter,
    ) -> Result<()> {
        for engine in engines {
            self.run_engine(engine.as_ref(), reporter).await?;
        }
        Ok(())
    }

    async fn run_engine(&self, engine: &dyn Engine, reporter: &mut dyn Reporter) -> Result<()> {
        let descriptor = engine.descriptor();
        let name = descriptor.name();
        info!(engine = %name, label = %descriptor.label(), "starting engine {}", name);

        let timer = Instant::now();
        let outcome = Self::engine_running(engine, reporter).await;
        let elapsed = timer.elapsed();
        self.metrics.timing(&engine_timer_key(name), elapsed);
        self.metrics.timing(ENGINES_TIMER, elapsed);

        outcome?;

        info!(
            engine = %name,
            elapsed_ms = elapsed.as_millis() as u64,
            "finished engine {}",
            name
        );
        Ok(())
    }

    /// The reporter bracket around one engine. The bracket is closed even
    /// when the engine fails; the engine's error wins over a close error.
    async fn engine_running(engine: &dyn Engine, reporter: &mut dyn Reporter) -> Result<()> {
        let descriptor = engine.descriptor();
        reporter.engine_started(descriptor)?;

        let ran = engine
            .run(reporter)
            .await
            .map_err(|source| OrchestratorError::engine_failed(descriptor.name(), source));
        let exited = reporter
            .engine_finished(descriptor)
            .map_err(OrchestratorError::from);

        ran.and(exited)
    }

    async fn engines(&self) -> Result<&[Box<dyn Engine>]> {
        let engines = self
            .engines
            .get_or_try_init(|| self.build_engines())
            .await?;
        Ok(engines.as_slice())
    }

    async fn build_engines(&self) -> Result<Vec<Box<dyn Engine>>> {
        let selected = EngineSelector::select(&self.config, self.registry.as_ref())?;
        for (name, _) in &selected {
            self.registry.validate_name(name)?;
        }

        let exclusions = self.resolver.resolve(self.config.exclude_paths()).await?;

        let mut engines = Vec::with_capacity(selected.len());
        for (name, entry) in selected {
            let metadata = self
                .registry
                .lookup(name)
                .ok_or_else(|| OrchestratorError::UnknownEngine(name.to_string()))?;
            let label = self
                .label
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let config = EngineConfigBuilder::build(entry.raw_settings(), &exclusions);

            let descriptor =
                EngineDescriptor::new(name, metadata, self.source_dir.clone(), config, label);
            debug!(engine = %name, label = %descriptor.label(), "Engine instantiated");

            let engine = self
                .factory
                .create(descriptor)
                .map_err(|source| OrchestratorError::engine_failed(name, source))?;
            engines.push(engine);
        }

        Ok(engines)
    }
}
