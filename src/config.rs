use crate::error::{Error, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Production,
    #[default]
    Testnet,
}

impl Env {
    pub fn base_url(&self) -> &'static str {
        match self {
            Env::Production => "https://www.deribit.com/api/v2",
            Env::Testnet => "https://test.deribit.com/api/v2",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" | "mainnet" => Some(Env::Production),
            "test" | "testnet" => Some(Env::Testnet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-HTTP-request timeout enforced by the transport.
    pub request_timeout: Duration,
    /// Upper bound for a dispatched call, covering every request it makes.
    pub call_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_env(Env::default())
    }
}

impl ClientConfig {
    pub fn for_env(env: Env) -> Self {
        Self {
            base_url: env.base_url().to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Reads `DERIBIT_ENV`, `DERIBIT_BASE_URL` and `DERIBIT_TIMEOUT_SECS`,
    /// loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut builder = Self::builder();
        if let Ok(value) = env::var("DERIBIT_ENV") {
            let env = Env::parse(&value)
                .ok_or_else(|| Error::ConfigError(format!("unknown DERIBIT_ENV `{value}`")))?;
            builder = builder.env(env);
        }
        if let Ok(url) = env::var("DERIBIT_BASE_URL") {
            builder = builder.base_url(url);
        }
        if let Ok(value) = env::var("DERIBIT_TIMEOUT_SECS") {
            let secs: u64 = value.trim().parse().map_err(|_| {
                Error::ConfigError(format!("DERIBIT_TIMEOUT_SECS `{value}` is not a number"))
            })?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        builder.build()
    }
}

#[derive(Debug, Default, Clone)]
pub struct ClientConfigBuilder {
    env: Env,
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    call_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    pub fn env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    /// Overrides the endpoint chosen by `env`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| self.env.base_url().to_string())
            .trim_end_matches('/')
            .to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::ConfigError(format!(
                "base url `{base_url}` must start with http:// or https://"
            )));
        }
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let call_timeout = self.call_timeout.unwrap_or(DEFAULT_CALL_TIMEOUT);
        if request_timeout.is_zero() || call_timeout.is_zero() {
            return Err(Error::ConfigError("timeouts must be non-zero".into()));
        }
        Ok(ClientConfig {
            base_url,
            request_timeout,
            call_timeout,
        })
    }
}
