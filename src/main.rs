use homework_status_bot::{
    config::AppConfig,
    poller::{PollState, Poller},
    services::{practicum::PracticumClient, telegram::TelegramBot},
    telemetry,
};
use std::process;
use std::time::Duration;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(severity = "critical", error = %e, "Failed to load configuration");
            process::exit(1);
        }
    };

    // Without all three tokens the bot cannot even report the problem.
    let credentials = match config.check_tokens() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!(severity = "critical", error = %e, "Required tokens are missing");
            process::exit(1);
        }
    };

    if let Some(addr) = &config.metrics_addr {
        match telemetry::install_metrics(addr) {
            Ok(()) => tracing::info!(addr = %addr, "Serving Prometheus metrics"),
            Err(e) => tracing::warn!(error = %e, "Metrics exporter disabled"),
        }
    }

    let timeout = Duration::from_secs(config.request_timeout_secs);

    let source = match PracticumClient::new(
        &config.practicum_endpoint,
        &credentials.practicum_token,
        timeout,
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(severity = "critical", error = %e, "Failed to build homework API client");
            process::exit(1);
        }
    };

    let bot = match TelegramBot::new(
        &config.telegram_api_url,
        &credentials.bot_token,
        &credentials.chat_id,
        timeout,
    ) {
        Ok(bot) => bot,
        Err(e) => {
            tracing::error!(severity = "critical", error = %e, "Failed to build Telegram client");
            process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => tracing::warn!(error = %e, "Cannot listen for shutdown signal"),
        }
    });

    let poller = Poller::new(
        source,
        bot,
        PollState::starting_now(),
        Duration::from_secs(config.retry_period_secs),
    );
    poller.run(shutdown_rx).await;
}
