pub mod binance;

pub use binance::BinanceClient;

use crate::models::{Candle, Interval, LotSize, OrderConfirmation};
use crate::Result;

/// Market data and order capabilities the bot needs from an exchange
#[allow(async_fn_in_trait)]
pub trait Exchange {
    /// Most recent `limit` candles, oldest first
    async fn get_candles(&self, symbol: &str, interval: Interval, limit: u32) -> Result<Vec<Candle>>;

    async fn get_spot_price(&self, symbol: &str) -> Result<f64>;

    /// Lot-size filter for `symbol`, fetched fresh on every call
    async fn get_lot_size(&self, symbol: &str) -> Result<LotSize>;

    /// Market buy of an already quantized quantity
    async fn submit_market_buy(&self, symbol: &str, quantity: &str) -> Result<OrderConfirmation>;

    /// Free balance of `asset`, zero if the account holds none
    async fn get_asset_balance(&self, asset: &str) -> Result<f64>;
}
