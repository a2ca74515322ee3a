use serde::Deserialize;

/// Default Practicum homework status endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Practicum API OAuth token
    pub practicum_token: Option<String>,

    /// Telegram bot token
    pub bot_token: Option<String>,

    /// Telegram chat that receives every notification
    pub account_id: Option<String>,

    /// Seconds to sleep between polling cycles
    #[serde(default = "default_retry_period_secs")]
    pub retry_period_secs: u64,

    /// Upper bound for a single HTTP request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_endpoint")]
    pub practicum_endpoint: String,

    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    /// Prometheus listener address (e.g., "0.0.0.0:9000"). Disabled when unset.
    pub metrics_addr: Option<String>,
}

fn default_retry_period_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_telegram_api_url() -> String {
    DEFAULT_TELEGRAM_API_URL.to_string()
}

/// Tokens that passed `check_tokens`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub bot_token: String,
    pub chat_id: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        envy::from_env().map_err(ConfigError::Env)
    }

    /// Build from explicit key/value pairs instead of the process environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars).map_err(ConfigError::Env)
    }

    /// Confirm that every required token is present and non-empty.
    pub fn check_tokens(&self) -> Result<Credentials, ConfigError> {
        let required = [
            ("PRACTICUM_TOKEN", &self.practicum_token),
            ("BOT_TOKEN", &self.bot_token),
            ("ACCOUNT_ID", &self.account_id),
        ];

        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingTokens(missing));
        }

        Ok(Credentials {
            practicum_token: self.practicum_token.clone().unwrap_or_default(),
            bot_token: self.bot_token.clone().unwrap_or_default(),
            chat_id: self.account_id.clone().unwrap_or_default(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingTokens(Vec<&'static str>),
}
