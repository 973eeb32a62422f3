use thiserror::Error;
use vacancy_load::error::ApiError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Unable to install the Prometheus exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("Invalid target: {0}")]
    Target(#[from] ApiError),

    #[error("Unable to listen for termination signals: {0}")]
    Signal(#[from] std::io::Error),
}
