use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outbound chat transport.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver `text` to the configured chat. Never retried by the caller.
    async fn send_message(&self, text: &str) -> Result<(), MessageNotSent>;
}

/// Client for the Telegram Bot API `sendMessage` method.
pub struct TelegramBot {
    http: Client,
    api_url: String,
    token: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct BotApiResponse {
    ok: bool,
    description: Option<String>,
}

impl TelegramBot {
    pub fn new(
        api_url: &str,
        token: &str,
        chat_id: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    async fn deliver(&self, text: &str) -> Result<(), DeliveryCause> {
        // The URL carries the bot token, so it is stripped from every reqwest error.
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);

        let response = self
            .http
            .post(&url)
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(|e| DeliveryCause::Transport(e.without_url()))?;

        let status = response.status();
        // Bot API errors come back as JSON with `ok: false`, whatever the HTTP status.
        match response.json::<BotApiResponse>().await {
            Ok(reply) if reply.ok && status.is_success() => Ok(()),
            Ok(reply) => Err(DeliveryCause::Rejected {
                status,
                description: reply.description.unwrap_or_default(),
            }),
            Err(_) if !status.is_success() => Err(DeliveryCause::Rejected {
                status,
                description: String::new(),
            }),
            Err(e) => Err(DeliveryCause::Decode(e.without_url())),
        }
    }
}

#[async_trait]
impl Messenger for TelegramBot {
    async fn send_message(&self, text: &str) -> Result<(), MessageNotSent> {
        tracing::debug!(chat_id = %self.chat_id, "Sending message");

        match self.deliver(text).await {
            Ok(()) => {
                tracing::debug!(chat_id = %self.chat_id, "Message sent");
                Ok(())
            }
            Err(cause) => {
                tracing::error!(chat_id = %self.chat_id, error = %cause, "Message was not delivered");
                Err(MessageNotSent { cause })
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Message was not delivered: {cause}")]
pub struct MessageNotSent {
    #[source]
    pub cause: DeliveryCause,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryCause {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Bot API reply is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Bot API rejected the message (HTTP {status}): {description}")]
    Rejected {
        status: StatusCode,
        description: String,
    },
}
