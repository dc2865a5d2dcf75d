use super::Notifier;
use crate::config::TelegramConfig;
use crate::error::TradeError;
use crate::Result;
use reqwest::Client;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Sends alerts through the Telegram Bot API
///
/// Disabled (no network traffic at all) when either the bot token or the
/// chat id is missing.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    destination: Option<Destination>,
}

#[derive(Clone)]
struct Destination {
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let destination = match (&config.bot_token, &config.chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(Destination {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            destination,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.destination.is_some()
    }

    /// Deliver one message, surfacing the failure instead of logging it
    pub async fn try_send(&self, message: &str) -> std::result::Result<(), TradeError> {
        let destination = self.destination.as_ref().ok_or_else(|| {
            TradeError::NotificationFailure("Telegram token or chat_id not set".to_string())
        })?;

        let url = format!("{}/bot{}/sendMessage", self.api_base, destination.bot_token);
        let response = self
            .client
            .post(&url)
            .form(&[("chat_id", destination.chat_id.as_str()), ("text", message)])
            .send()
            .await
            .map_err(|e| TradeError::NotificationFailure(format!("Telegram error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TradeError::NotificationFailure(format!(
                "Telegram alert failed ({}): {}",
                status, body
            )));
        }

        Ok(())
    }
}

impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> bool {
        if !self.is_enabled() {
            tracing::warn!("⚠️ Telegram token or chat_id not set. Skipping alert.");
            return false;
        }

        match self.try_send(message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Alert not delivered");
                false
            }
        }
    }
}
