use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Metrics registry error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("Metrics output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("Diagnostics subscriber could not be installed: {0}")]
    Subscriber(String),
}
