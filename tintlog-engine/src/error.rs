use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Flush worker could not be started: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Scheduler is shut down")]
    Shutdown,

    #[error("No async runtime available: {0}")]
    NoRuntime(String),
}
