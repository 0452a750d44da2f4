use thiserror::Error;
use tintlog_config::ConfigError;
use tintlog_engine::ScheduleError;
use tintlog_telemetry::TelemetryError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scheduler error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("Could not render configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
