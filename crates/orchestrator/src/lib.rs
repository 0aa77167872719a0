//! Orchestration of analysis engines against a source tree.
//!
//! - [`EngineSelector`] - enabled and registered engines, in declaration order
//! - [`EngineConfigBuilder`] - the payload handed to each engine
//! - [`PathExclusionResolver`] - user patterns plus ignored untracked files
//! - [`EnginesRunner`] - the run loop and reporter lifecycle

pub mod config;
pub mod engine;
pub mod engine_config;
pub mod error;
pub mod exclusions;
pub mod metrics;
pub mod registry;
pub mod reporter;
pub mod resources;
pub mod runner;
pub mod selection;
pub mod state_machine;

pub use config::{AnalyzerConfig, EngineEntry, EngineSettings, CONFIG_FILE};
pub use engine::{Engine, EngineError, EngineFactory};
pub use engine_config::EngineConfigBuilder;
pub use error::{OrchestratorError, Result};
pub use exclusions::{ExclusionSet, GlobPatternExpander, PathExclusionResolver, PatternExpander};
pub use metrics::{engine_timer_key, Metrics, RecordingMetrics, TracingMetrics, ENGINES_TIMER};
pub use registry::{EngineRegistry, StaticRegistry};
pub use reporter::{ReportError, Reporter};
pub use resources::ReporterGuard;
pub use runner::{EnginesRunner, RunSummary};
pub use selection::EngineSelector;
pub use state_machine::{RunState, RunStateMachine};
