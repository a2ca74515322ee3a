//! Polling loop
//!
//! Each cycle fetches the homework statuses, validates the response,
//! translates the newest record into a message and sends it. Any failure in
//! a cycle is reported to the same chat on a best-effort basis; the loop then
//! sleeps for the retry period regardless of how the cycle ended.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

use crate::services::{
    practicum::{RequestFailure, StatusSource},
    telegram::{MessageNotSent, Messenger},
    validation::{self, ValidationError},
    verdict::{self, StatusError},
};

/// Prefix of the message sent when a cycle fails.
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// State carried across polling cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollState {
    /// Lower bound (Unix seconds) of the query window. Fixed at startup.
    pub since: i64,
}

impl PollState {
    pub fn starting_now() -> Self {
        Self {
            since: chrono::Utc::now().timestamp(),
        }
    }
}

/// Drives the fetch, validate, translate, notify and sleep cycle.
pub struct Poller<S, M> {
    source: S,
    messenger: M,
    state: PollState,
    retry_period: Duration,
}

impl<S: StatusSource, M: Messenger> Poller<S, M> {
    pub fn new(source: S, messenger: M, state: PollState, retry_period: Duration) -> Self {
        Self {
            source,
            messenger,
            state,
            retry_period,
        }
    }

    /// Run one cycle and return the message that was delivered.
    pub async fn run_cycle(&self) -> Result<String, CycleError> {
        let response = self.source.homework_statuses(self.state.since).await?;
        let homeworks = validation::check_response(&response)?;
        // The API lists the most recent submission first.
        let message = verdict::parse_status(&homeworks[0])?;
        self.messenger.send_message(&message).await?;
        metrics::counter!("homework_notifications_sent_total").increment(1);
        Ok(message)
    }

    /// Tell the chat that a cycle failed. Delivery failures are only logged.
    pub async fn report_failure(&self, error: &CycleError) {
        let message = format!("{}: {}", FAILURE_PREFIX, error);
        tracing::error!(stage = error.stage(), error = %error, "Polling cycle failed");
        metrics::counter!("homework_poll_failures_total", "stage" => error.stage()).increment(1);

        if let Err(e) = self.messenger.send_message(&message).await {
            tracing::error!(error = %e, "Failure report was not delivered");
        }
    }

    /// Poll until `shutdown` turns `true`.
    ///
    /// The signal is checked before each cycle and observed during the sleep.
    /// If the sender is dropped the loop keeps running.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            since = self.state.since,
            retry_period_secs = self.retry_period.as_secs(),
            "Starting polling loop"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            metrics::counter!("homework_poll_cycles_total").increment(1);
            match self.run_cycle().await {
                Ok(message) => tracing::info!(message = %message, "Status update delivered"),
                Err(e) => self.report_failure(&e).await,
            }

            if self.pause(&mut shutdown).await {
                break;
            }
        }

        tracing::info!("Polling loop stopped");
    }

    /// Sleep for the retry period. Returns `true` if shutdown was requested meanwhile.
    async fn pause(&self, shutdown: &mut watch::Receiver<bool>) -> bool {
        let nap = sleep(self.retry_period);
        tokio::pin!(nap);

        tokio::select! {
            _ = &mut nap => return false,
            requested = shutdown.wait_for(|stop| *stop) => {
                if requested.is_ok() {
                    return true;
                }
            }
        }

        // Sender dropped, nobody can request shutdown any more.
        nap.await;
        false
    }
}

/// Failure of a single polling cycle.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Request(#[from] RequestFailure),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Notify(#[from] MessageNotSent),
}

impl CycleError {
    /// Stage that failed, used as a metric label.
    pub fn stage(&self) -> &'static str {
        match self {
            CycleError::Request(_) => "fetch",
            CycleError::Validation(_) => "validate",
            CycleError::Status(_) => "translate",
            CycleError::Notify(_) => "notify",
        }
    }
}
