use crate::execution::RoundingPolicy;
use crate::indicators::DEFAULT_RSI_PERIOD;
use crate::models::TradingPair;
use crate::strategy::RsiThresholds;
use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

pub const DEFAULT_BINANCE_BASE_URL: &str = "https://api.binance.com";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_TRADE_AMOUNT: f64 = 10.0;
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5000;
pub const DEFAULT_CANDLE_LIMIT: u32 = 100;

/// Immutable run configuration, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub telegram: TelegramConfig,
    pub trading: TradingConfig,
}

#[derive(Clone)]
pub struct ExchangeConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub recv_window_ms: u64,
}

impl fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("recv_window_ms", &self.recv_window_ms)
            .finish()
    }
}

#[derive(Clone)]
pub struct TelegramConfig {
    pub api_base: String,
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_base", &self.api_base)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            bot_token: None,
            chat_id: None,
        }
    }
}

/// Everything the decision driver and executor need
#[derive(Debug, Clone)]
pub struct TradingConfig {
    pub pair: TradingPair,
    /// Base notional per buy, in quote currency
    pub trade_amount: f64,
    pub rounding: RoundingPolicy,
    /// Post a balance summary after each buy attempt
    pub report_balances: bool,
    pub rsi_period: usize,
    /// Klines fetched per interval
    pub candle_limit: u32,
    pub thresholds: RsiThresholds,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            pair: TradingPair::default(),
            trade_amount: DEFAULT_TRADE_AMOUNT,
            rounding: RoundingPolicy::default(),
            report_balances: true,
            rsi_period: DEFAULT_RSI_PERIOD,
            candle_limit: DEFAULT_CANDLE_LIMIT,
            thresholds: RsiThresholds::default(),
        }
    }
}

/// Flat view of the environment, one field per variable
#[derive(Debug, Deserialize)]
struct RawSettings {
    binance_api_key: Option<String>,
    binance_api_secret: Option<String>,
    binance_base_url: String,
    binance_recv_window: u64,
    telegram_bot_token: Option<String>,
    telegram_chat_id: Option<String>,
    telegram_api_base: String,
    trade_amount: f64,
    base_asset: String,
    quote_asset: String,
    order_rounding: String,
    report_balances: bool,
    rsi_period: usize,
    candle_limit: u32,
    rsi_overbought: f64,
    rsi_oversold: f64,
    oversold_multiplier: f64,
}

impl Config {
    /// Load from the process environment (call `dotenvy::dotenv()` first)
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::default())
    }

    /// Load from an explicit variable map instead of the process environment
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(config::Environment::default().source(Some(vars)))
    }

    fn load(environment: config::Environment) -> Result<Self> {
        let thresholds = RsiThresholds::default();

        let settings = config::Config::builder()
            .set_default("binance_base_url", DEFAULT_BINANCE_BASE_URL)?
            .set_default("binance_recv_window", DEFAULT_RECV_WINDOW_MS as i64)?
            .set_default("telegram_api_base", DEFAULT_TELEGRAM_API_BASE)?
            .set_default("trade_amount", DEFAULT_TRADE_AMOUNT)?
            .set_default("base_asset", "BTC")?
            .set_default("quote_asset", "USDT")?
            .set_default("order_rounding", "down")?
            .set_default("report_balances", true)?
            .set_default("rsi_period", DEFAULT_RSI_PERIOD as i64)?
            .set_default("candle_limit", DEFAULT_CANDLE_LIMIT as i64)?
            .set_default("rsi_overbought", thresholds.overbought)?
            .set_default("rsi_oversold", thresholds.oversold)?
            .set_default("oversold_multiplier", thresholds.oversold_multiplier)?
            .add_source(environment)
            .build()
            .context("Failed to read configuration")?;

        let raw: RawSettings = settings
            .try_deserialize()
            .context("Invalid configuration value")?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self> {
        let rounding = raw
            .order_rounding
            .parse::<RoundingPolicy>()
            .context("Invalid ORDER_ROUNDING")?;

        let trading = TradingConfig {
            pair: TradingPair::new(raw.base_asset, raw.quote_asset),
            trade_amount: raw.trade_amount,
            rounding,
            report_balances: raw.report_balances,
            rsi_period: raw.rsi_period,
            candle_limit: raw.candle_limit,
            thresholds: RsiThresholds {
                overbought: raw.rsi_overbought,
                oversold: raw.rsi_oversold,
                oversold_multiplier: raw.oversold_multiplier,
            },
        };
        trading.validate()?;

        Ok(Self {
            exchange: ExchangeConfig {
                base_url: raw.binance_base_url.trim_end_matches('/').to_string(),
                api_key: non_empty(raw.binance_api_key),
                api_secret: non_empty(raw.binance_api_secret),
                recv_window_ms: raw.binance_recv_window,
            },
            telegram: TelegramConfig {
                api_base: raw.telegram_api_base.trim_end_matches('/').to_string(),
                bot_token: non_empty(raw.telegram_bot_token),
                chat_id: non_empty(raw.telegram_chat_id),
            },
            trading,
        })
    }
}

impl TradingConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.trade_amount.is_finite() && self.trade_amount > 0.0,
            "TRADE_AMOUNT must be a positive number, got {}",
            self.trade_amount
        );
        ensure!(
            !self.pair.base.is_empty() && !self.pair.quote.is_empty(),
            "BASE_ASSET and QUOTE_ASSET must not be empty"
        );
        ensure!(self.rsi_period > 0, "RSI_PERIOD must be at least 1");
        ensure!(
            self.candle_limit as usize > self.rsi_period,
            "CANDLE_LIMIT ({}) must exceed RSI_PERIOD ({})",
            self.candle_limit,
            self.rsi_period
        );
        self.thresholds.validate()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
