use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A spot trading pair, e.g. BTC/USDT
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradingPair {
    pub base: String,
    pub quote: String,
}

impl TradingPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }

    /// Exchange symbol (base followed by quote, e.g. "BTCUSDT")
    pub fn symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl Default for TradingPair {
    fn default() -> Self {
        Self::new("BTC", "USDT")
    }
}

/// Kline interval as understood by the exchange
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Interval {
    OneHour,
    FourHours,
    OneDay,
    OneWeek,
    OneMonth,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneHour => "1h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1w",
            Interval::OneMonth => "1M",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OHLCV candlestick data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: DateTime<Utc>,
}

/// Exchange quantization rule for order quantities
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LotSize {
    pub min_qty: f64,
    pub step_size: f64,
}

/// RSI readings on both timeframes for one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiSnapshot {
    pub daily: f64,
    pub weekly: f64,
}

/// Exchange acknowledgement of a filled (or accepted) order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderConfirmation {
    pub symbol: String,
    pub order_id: u64,
    pub client_order_id: String,
    pub status: String,
    pub executed_qty: f64,
    pub cumulative_quote_qty: f64,
    pub transact_time: DateTime<Utc>,
}

impl OrderConfirmation {
    /// Average fill price, if anything was filled
    pub fn average_price(&self) -> Option<f64> {
        if self.executed_qty > 0.0 {
            Some(self.cumulative_quote_qty / self.executed_qty)
        } else {
            None
        }
    }
}

/// Account holdings for the traded pair, valued in both currencies
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub pair: TradingPair,
    pub base_balance: f64,
    pub quote_balance: f64,
    pub price: f64,
}

impl AccountSummary {
    pub fn total_in_quote(&self) -> f64 {
        self.quote_balance + self.base_balance * self.price
    }

    pub fn total_in_base(&self) -> f64 {
        self.total_in_quote() / self.price
    }
}

impl fmt::Display for AccountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "💼 Balance: {:.2} {} + {:.8} {} ≈ {:.2} {} / {:.8} {}",
            self.quote_balance,
            self.pair.quote,
            self.base_balance,
            self.pair.base,
            self.total_in_quote(),
            self.pair.quote,
            self.total_in_base(),
            self.pair.base,
        )
    }
}
