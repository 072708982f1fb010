//! Webhook mode implementation for the bot.
//!
//! Serves an axum router that:
//! - accepts `POST` on the configured path from Telegram only (secret header)
//! - answers everything else with a static liveness response
//!
//! Around the server, the webhook is registered with `setWebhook` on start
//! and removed with `deleteWebhook` on shutdown.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;
use tracing::{debug, error, info, warn};

use super::ThrottledBot;
use super::actions::UpdateProcessor;
use crate::config::WebhookConfig;
use crate::events::Update;

/// Header Telegram uses to echo the secret passed to `setWebhook`.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Body for any request that is not a webhook delivery.
pub const ALIVE_TEXT: &str = "Telegram bot webhook endpoint";

/// Largest update body read after authentication.
const MAX_UPDATE_BYTES: usize = 2 * 1024 * 1024;

/// Shared gateway state. Immutable after startup.
#[derive(Clone)]
pub struct GatewayState {
    processor: UpdateProcessor,
    secret: Arc<str>,
}

impl GatewayState {
    pub fn new(processor: UpdateProcessor, secret: &str) -> Self {
        Self {
            processor,
            secret: Arc::from(secret),
        }
    }

    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get(SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|provided| constant_time_eq(provided, &self.secret))
    }
}

/// Build the gateway router for `path`.
pub fn router(path: &str, state: GatewayState) -> Router {
    Router::new()
        .route(path, post(receive_update).fallback(alive))
        .fallback(alive)
        .with_state(state)
}

async fn alive() -> &'static str {
    ALIVE_TEXT
}

// The body is only read once the secret header has been checked.
async fn receive_update(
    State(state): State<GatewayState>,
    request: Request,
) -> (StatusCode, &'static str) {
    if !state.is_authorized(request.headers()) {
        warn!("Rejected webhook request with missing or invalid secret token");
        return (StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let body = match to_bytes(request.into_body(), MAX_UPDATE_BYTES).await {
        Ok(body) => body,
        Err(e) => {
            warn!("Rejected webhook request with unreadable body: {}", e);
            return (StatusCode::BAD_REQUEST, "Bad JSON");
        }
    };

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Rejected webhook request with undecodable body: {}", e);
            return (StatusCode::BAD_REQUEST, "Bad JSON");
        }
    };

    debug!("Webhook received update {:?}", update.update_id);
    let outcome = state.processor.process(&update).await;
    debug!("Update {:?} handled: {:?}", update.update_id, outcome);

    (StatusCode::OK, "OK")
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Start the bot in webhook mode.
///
/// 1. Registers the webhook URL and secret with Telegram
/// 2. Serves the gateway until Ctrl+C / SIGTERM
/// 3. Deletes the webhook (best effort)
pub async fn start_webhook(
    config: &WebhookConfig,
    bot: ThrottledBot,
    processor: UpdateProcessor,
) -> anyhow::Result<()> {
    info!("🔗 Setting webhook URL: {}", config.url);
    bot.inner()
        .set_webhook(config.url.clone())
        .secret_token(config.secret.clone())
        .drop_pending_updates(config.drop_pending_updates)
        .allowed_updates(vec![AllowedUpdate::Message])
        .await
        .context("failed to register webhook with Telegram")?;

    let listener = tokio::net::TcpListener::bind(config.address)
        .await
        .with_context(|| format!("failed to bind {}", config.address))?;

    info!("📡 Listening on: {} (path {})", config.address, config.path);

    let app = router(&config.path, GatewayState::new(processor, &config.secret));
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("Shutting down, removing webhook...");
    if let Err(e) = bot.inner().delete_webhook().await {
        error!("Failed to delete webhook: {}", e);
    }

    served.context("webhook server failed")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
