use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tintlog_config::{LoggerConfig, RendererKind};
use tintlog_core::{field, Level};
use tintlog_engine::{Logger, PipelineMetrics, TokioScheduler};

use crate::demo::{self, Scenario};
use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "tintlog", version, about)]
pub struct Cli {
    /// Renderer to use (overrides the configuration)
    #[arg(long, value_enum, global = true)]
    pub renderer: Option<RendererArg>,

    /// Minimum level (overrides the configuration and LOG_LEVEL)
    #[arg(long, global = true)]
    pub level: Option<Level>,

    /// Disable terminal colors
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file to load instead of ./tintlog.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk through the logging features
    Demo(DemoArgs),
    /// Log the same line repeatedly to exercise repeat suppression
    Spam(SpamArgs),
    /// Print the resolved configuration as YAML
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DemoArgs {
    #[arg(value_enum, default_value_t = Scenario::All)]
    pub scenario: Scenario,
}

#[derive(Args, Debug, Clone)]
pub struct SpamArgs {
    /// How many times to log the message
    #[arg(long, default_value_t = 100)]
    pub count: u32,
    /// Pause between calls
    #[arg(long, default_value_t = 0)]
    pub interval_ms: u64,
    #[arg(long, default_value = "This is a spam message")]
    pub message: String,
    /// Print pipeline metrics when done
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Configuration file to resolve (same as the global --config)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererArg {
    Auto,
    Terminal,
    Browser,
}

impl From<RendererArg> for RendererKind {
    fn from(arg: RendererArg) -> Self {
        match arg {
            RendererArg::Auto => RendererKind::Auto,
            RendererArg::Terminal => RendererKind::Terminal,
            RendererArg::Browser => RendererKind::Browser,
        }
    }
}

pub async fn run_command(cli: Cli) -> Result<(), CliError> {
    tracing::debug!(command = ?cli.command, "Running command");

    let path = match &cli.command {
        Commands::Config(args) => args.path.clone().or_else(|| cli.config.clone()),
        _ => cli.config.clone(),
    };
    let config = resolve_config(&cli, path)?;

    match cli.command {
        Commands::Config(_) => {
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
        Commands::Demo(args) => {
            let logger = build_logger(&config, None)?;
            demo::run(&logger, args.scenario).await;
            Ok(())
        }
        Commands::Spam(args) => run_spam(&config, &args).await,
    }
}

/// Loads the configuration and applies command line overrides on top.
fn resolve_config(cli: &Cli, path: Option<PathBuf>) -> Result<LoggerConfig, CliError> {
    let mut config = match path {
        Some(path) => LoggerConfig::load_from_path(path)?,
        None => LoggerConfig::load()?,
    };
    apply_overrides(cli, &mut config);
    Ok(config)
}

fn apply_overrides(cli: &Cli, config: &mut LoggerConfig) {
    if let Some(renderer) = cli.renderer {
        config.renderer = renderer.into();
    }
    if let Some(level) = cli.level {
        config.level = level;
    }
    if cli.no_color {
        config.colors = Some(false);
    }
}

fn build_logger(
    config: &LoggerConfig,
    metrics: Option<Arc<PipelineMetrics>>,
) -> Result<Logger, CliError> {
    let scheduler = TokioScheduler::current()?;
    let mut builder = Logger::builder()
        .config(config.clone())
        .scheduler(Arc::new(scheduler));
    if let Some(metrics) = metrics {
        builder = builder.metrics(metrics);
    }
    Ok(builder.build())
}

async fn run_spam(config: &LoggerConfig, args: &SpamArgs) -> Result<(), CliError> {
    let metrics = Arc::new(PipelineMetrics::new()?);
    let logger = build_logger(config, Some(metrics.clone()))?;
    let interval = Duration::from_millis(args.interval_ms);

    for i in 0..args.count {
        logger.info(args.message.as_str());
        if !interval.is_zero() && i + 1 < args.count {
            tokio::time::sleep(interval).await;
        }
    }

    // Give the pending summary time to fire on its own.
    tokio::time::sleep(config.throttle.window() + Duration::from_millis(50)).await;
    logger.info_with(
        "Spam finished",
        [
            field("calls", args.count),
            field("emitted", metrics.emitted.get()),
        ],
    );

    if args.metrics {
        print!("{}", metrics.gather()?);
    }
    Ok(())
}
