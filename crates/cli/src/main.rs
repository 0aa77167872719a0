mod engine;
mod error;
mod registry;
mod reporters;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use orchestrator::{
    AnalyzerConfig, EngineRegistry, EngineSelector, EngineSettings, EnginesRunner,
    GlobPatternExpander, PatternExpander, StaticRegistry, CONFIG_FILE,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::engine::ProcessEngineFactory;
use crate::error::{exit_code, CliError};
use crate::registry::{load_registry, DevRegistry};
use crate::reporters::Format;

const DEFAULT_REGISTRY: &str = "engines.toml";

#[derive(Parser)]
#[command(name = "analyzer")]
#[command(about = "Run analysis engines against a source tree", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory to analyze
    #[arg(long, global = true, default_value = ".")]
    source_dir: PathBuf,

    /// Analyzer configuration [default: <source-dir>/.analyzer.yml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Engine registry (TOML)
    #[arg(long, global = true, default_value = DEFAULT_REGISTRY)]
    registry: PathBuf,

    /// Resolve engines missing from the registry to local development engines
    #[arg(long, global = true)]
    dev: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled engine (default)
    Analyze {
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Label shared by all engines instead of one UUID each
        #[arg(long)]
        label: Option<String>,
    },
    /// List the engines in the registry
    Engines,
    /// Check the configuration against the registry without running anything
    ValidateConfig,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.source_dir.join(CONFIG_FILE))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let outcome = match &cli.command {
        Some(Commands::Analyze { format, label }) => analyze(&cli, *format, label.clone()).await,
        Some(Commands::Engines) => list_engines(&cli).await,
        Some(Commands::ValidateConfig) => validate_config(&cli).await,
        None => analyze(&cli, Format::default(), None).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn analyze(cli: &Cli, format: Format, label: Option<String>) -> Result<()> {
    let config = load_config(&cli.config_path()).await?;
    let registry = engine_registry(cli).await?;

    let mut runner = EnginesRunner::new(
        registry,
        Arc::new(ProcessEngineFactory),
        config,
        cli.source_dir.clone(),
    );
    if let Some(label) = label {
        runner = runner.with_label(label);
    }

    let reporter = format.reporter(std::io::stdout());
    let summary = runner.run(reporter).await.context("Analysis failed")?;

    tracing::info!(
        engines = summary.engines.len(),
        elapsed_ms = summary.duration().num_milliseconds(),
        "Analysis finished"
    );
    Ok(())
}

async fn list_engines(cli: &Cli) -> Result<()> {
    let registry = load_registry(&cli.registry).await?;

    if registry.is_empty() {
        println!("No engines registered in {}", cli.registry.display());
        return Ok(());
    }

    println!("Engines ({}):", registry.len());
    for (name, metadata) in registry.iter() {
        println!(
            "  {:<24} {}",
            name,
            metadata.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

async fn validate_config(cli: &Cli) -> Result<()> {
    let path = cli.config_path();
    let config = load_config(&path).await?;
    let registry = engine_registry(cli).await?;

    println!("Configuration: {}", path.display());
    for (name, entry) in config.engines() {
        let state = if entry.is_enabled() { "enabled" } else { "disabled" };
        let known = if registry.contains_key(name) {
            ""
        } else {
            " (not in registry)"
        };
        println!("  {:<24} {}{}", name, state, known);
    }

    let expander = GlobPatternExpander;
    for pattern in config.exclude_paths() {
        expander.expand(pattern)?;
    }

    let selected = EngineSelector::select(&config, registry.as_ref())?;
    for (name, _) in &selected {
        registry.validate_name(name)?;
    }

    println!();
    println!("Configuration OK: {} engines will run", selected.len());
    Ok(())
}

async fn load_config(path: &Path) -> Result<AnalyzerConfig> {
    if !path.exists() {
        return Err(CliError::ConfigNotFound(path.to_path_buf()).into());
    }
    Ok(AnalyzerConfig::load(path).await?)
}

async fn engine_registry(cli: &Cli) -> Result<Arc<dyn EngineRegistry>> {
    if !cli.dev {
        return Ok(Arc::new(load_registry(&cli.registry).await?));
    }

    let registry = if cli.registry.exists() {
        load_registry(&cli.registry).await?
    } else {
        StaticRegistry::new()
    };
    Ok(Arc::new(DevRegistry::new(registry)))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analyzer=info,orchestrator=info".into()),
        )
        .init();
}
