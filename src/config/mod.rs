//! Configuration module for Doorman.
//!
//! Loads configuration from environment variables.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use url::Url;

use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 8080;

/// Bot running mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Webhook endpoint settings. Only present in webhook mode.
#[derive(Clone)]
pub struct WebhookConfig {
    /// Public URL registered with `setWebhook`.
    pub url: Url,

    /// Local route the gateway listens on.
    pub path: String,

    /// Shared secret Telegram echoes back in every request.
    pub secret: String,

    /// Listen address.
    pub address: SocketAddr,

    pub drop_pending_updates: bool,
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("url", &self.url.as_str())
            .field("path", &self.path)
            .field("secret", &"<redacted>")
            .field("address", &self.address)
            .field("drop_pending_updates", &self.drop_pending_updates)
            .finish()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub bot_mode: BotMode,

    /// Bot username (without @) for `/start@name` matching.
    /// Optional - will be fetched via getMe if not set.
    pub bot_username: Option<String>,

    pub webhook: Option<WebhookConfig>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("bot_mode", &self.bot_mode)
            .field("bot_username", &self.bot_username)
            .field("webhook", &self.webhook)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = var("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let bot_mode = match var("BOT_MODE").map(|m| m.to_lowercase()).as_deref() {
            None | Some("polling") => BotMode::Polling,
            Some("webhook") => BotMode::Webhook,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "BOT_MODE",
                    reason: format!("expected `polling` or `webhook`, got `{other}`"),
                });
            }
        };

        // Parse bot username (strip @ if present)
        let bot_username = var("BOT_USERNAME")
            .map(|s| s.trim_start_matches('@').to_string())
            .filter(|s| !s.is_empty());

        let webhook = match bot_mode {
            BotMode::Polling => None,
            BotMode::Webhook => Some(webhook_from_lookup(&var)?),
        };

        Ok(Self {
            bot_token,
            bot_mode,
            bot_username,
            webhook,
        })
    }
}

fn webhook_from_lookup<F>(var: &F) -> Result<WebhookConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw_url = var("WEBHOOK_URL").ok_or(ConfigError::MissingForWebhook {
        name: "WEBHOOK_URL",
    })?;
    let url = Url::parse(&raw_url).map_err(|e| ConfigError::Invalid {
        name: "WEBHOOK_URL",
        reason: e.to_string(),
    })?;
    if url.scheme() != "https" {
        return Err(ConfigError::Invalid {
            name: "WEBHOOK_URL",
            reason: format!("Telegram only delivers to https URLs, got `{}`", url.scheme()),
        });
    }

    let secret = var("WEBHOOK_SECRET_TOKEN").ok_or(ConfigError::MissingForWebhook {
        name: "WEBHOOK_SECRET_TOKEN",
    })?;
    validate_secret(&secret)?;

    let path = match var("WEBHOOK_PATH") {
        Some(path) if path.starts_with('/') => path,
        Some(path) => format!("/{path}"),
        None => url.path().to_string(),
    };

    let port = match var("PORT") {
        Some(port) => port.parse::<u16>().map_err(|e| ConfigError::Invalid {
            name: "PORT",
            reason: e.to_string(),
        })?,
        None => DEFAULT_PORT,
    };

    let ip = match var("BIND_ADDRESS") {
        Some(ip) => ip.parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
            name: "BIND_ADDRESS",
            reason: e.to_string(),
        })?,
        None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    };

    let drop_pending = var("DROP_PENDING_UPDATES").map(|v| v.to_lowercase());
    let drop_pending_updates = match drop_pending.as_deref() {
        None | Some("false" | "0" | "no") => false,
        Some("true" | "1" | "yes") => true,
        Some(other) => {
            return Err(ConfigError::Invalid {
                name: "DROP_PENDING_UPDATES",
                reason: format!("expected a boolean, got `{other}`"),
            });
        }
    };

    Ok(WebhookConfig {
        url,
        path,
        secret,
        address: SocketAddr::new(ip, port),
        drop_pending_updates,
    })
}

/// Telegram accepts 1-256 characters of `A-Z`, `a-z`, `0-9`, `_` and `-`.
fn validate_secret(secret: &str) -> Result<(), ConfigError> {
    let valid_chars = secret
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if secret.len() > 256 || !valid_chars {
        return Err(ConfigError::Invalid {
            name: "WEBHOOK_SECRET_TOKEN",
            reason: "must be 1-256 characters of A-Z, a-z, 0-9, _ and -".to_string(),
        });
    }
    Ok(())
}
