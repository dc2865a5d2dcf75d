// In-memory collaborators for unit tests
use crate::api::Exchange;
use crate::models::{Candle, Interval, LotSize, OrderConfirmation};
use crate::notify::Notifier;
use crate::Result;
use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Candles whose closes follow `closes`, one per day
pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open_time = start + Duration::days(i as i64);
            Candle {
                open_time,
                open: close,
                high: close,
                low: close,
                close,
                volume: 1.0,
                close_time: open_time + Duration::days(1) - Duration::milliseconds(1),
            }
        })
        .collect()
}

pub struct FakeExchange {
    pub candles: HashMap<&'static str, Vec<Candle>>,
    pub price: Option<f64>,
    pub lot_size: Option<LotSize>,
    pub reject_orders: bool,
    pub balances: HashMap<String, f64>,
    pub fail_balances: bool,
    pub orders: Mutex<Vec<(String, String)>>,
}

impl Default for FakeExchange {
    fn default() -> Self {
        Self {
            candles: HashMap::new(),
            price: Some(50000.0),
            lot_size: Some(LotSize {
                min_qty: 0.00001,
                step_size: 0.00001,
            }),
            reject_orders: false,
            balances: HashMap::new(),
            fail_balances: false,
            orders: Mutex::new(Vec::new()),
        }
    }
}

impl FakeExchange {
    pub fn with_candles(mut self, interval: Interval, closes: &[f64]) -> Self {
        self.candles.insert(interval.as_str(), candles_from_closes(closes));
        self
    }

    pub fn orders(&self) -> Vec<(String, String)> {
        self.orders.lock().unwrap().clone()
    }
}

impl Exchange for FakeExchange {
    async fn get_candles(&self, _symbol: &str, interval: Interval, limit: u32) -> Result<Vec<Candle>> {
        let candles = self
            .candles
            .get(interval.as_str())
            .ok_or_else(|| format!("no klines for {}", interval))?;
        let skip = candles.len().saturating_sub(limit as usize);
        Ok(candles[skip..].to_vec())
    }

    async fn get_spot_price(&self, _symbol: &str) -> Result<f64> {
        Ok(self.price.ok_or("ticker unavailable")?)
    }

    async fn get_lot_size(&self, _symbol: &str) -> Result<LotSize> {
        Ok(self.lot_size.ok_or("exchange info unavailable")?)
    }

    async fn submit_market_buy(&self, symbol: &str, quantity: &str) -> Result<OrderConfirmation> {
        if self.reject_orders {
            return Err("Binance API error (400 Bad Request): code -2010 - Account has insufficient balance".into());
        }

        self.orders
            .lock()
            .unwrap()
            .push((symbol.to_string(), quantity.to_string()));

        let executed_qty: f64 = quantity.parse()?;
        let price = self.price.unwrap_or(0.0);
        Ok(OrderConfirmation {
            symbol: symbol.to_string(),
            order_id: 1,
            client_order_id: "test-order".to_string(),
            status: "FILLED".to_string(),
            executed_qty,
            cumulative_quote_qty: executed_qty * price,
            transact_time: Utc::now(),
        })
    }

    async fn get_asset_balance(&self, asset: &str) -> Result<f64> {
        if self.fail_balances {
            return Err("account endpoint unavailable".into());
        }
        Ok(self.balances.get(asset).copied().unwrap_or(0.0))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> bool {
        self.messages.lock().unwrap().push(message.to_string());
        true
    }
}
