//! In-memory stand-ins for the homework API and the chat transport

use async_trait::async_trait;
use homework_status_bot::services::{
    practicum::{RequestCause, RequestFailure, StatusSource},
    telegram::{DeliveryCause, MessageNotSent, Messenger},
};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Window start used by every poller test.
pub const SINCE: i64 = 1_700_000_000;

/// Replays queued responses; `Err(code)` becomes a `RequestFailure` for that HTTP status.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Value, u16>>>,
    pub calls: Arc<Mutex<Vec<i64>>>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<Value, u16>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn homework_statuses(&self, from_date: i64) -> Result<Value, RequestFailure> {
        self.calls.lock().unwrap().push(from_date);
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left");
        next.map_err(|code| RequestFailure {
            cause: RequestCause::Status(StatusCode::from_u16(code).unwrap()),
        })
    }
}

/// Records every message. Can fail each send, and can request shutdown after a number of sends.
pub struct RecordingMessenger {
    pub sent: Arc<Mutex<Vec<String>>>,
    fail: bool,
    shutdown: Option<(watch::Sender<bool>, usize)>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: false,
            shutdown: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn stop_after(mut self, count: usize, shutdown: watch::Sender<bool>) -> Self {
        self.shutdown = Some((shutdown, count));
        self
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(&self, text: &str) -> Result<(), MessageNotSent> {
        let seen = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(text.to_string());
            sent.len()
        };

        if let Some((tx, count)) = &self.shutdown {
            if seen >= *count {
                let _ = tx.send(true);
            }
        }

        if self.fail {
            return Err(MessageNotSent {
                cause: DeliveryCause::Rejected {
                    status: StatusCode::BAD_REQUEST,
                    description: "Bad Request: chat not found".to_string(),
                },
            });
        }
        Ok(())
    }
}
