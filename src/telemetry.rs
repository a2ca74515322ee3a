use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Initialize structured JSON logging. `RUST_LOG` overrides the default `debug` level.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .json()
        .init();
}

/// Serve Prometheus metrics on `addr`. Must run inside a tokio runtime.
pub fn install_metrics(addr: &str) -> Result<(), TelemetryError> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|_| TelemetryError::InvalidAddr(addr.to_string()))?;

    PrometheusBuilder::new().with_http_listener(addr).install()?;

    metrics::describe_counter!("homework_poll_cycles_total", "Polling cycles started");
    metrics::describe_counter!(
        "homework_poll_failures_total",
        "Polling cycles that failed, by stage"
    );
    metrics::describe_counter!(
        "homework_notifications_sent_total",
        "Status notifications delivered to the chat"
    );

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid metrics listen address: {0}")]
    InvalidAddr(String),

    #[error("Failed to install Prometheus exporter: {0}")]
    Exporter(#[from] metrics_exporter_prometheus::BuildError),
}
