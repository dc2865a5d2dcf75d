use crate::api::Exchange;
use crate::error::TradeError;
use crate::indicators::calculate_rsi;
use crate::models::{Interval, RsiSnapshot};

/// Turns exchange klines into RSI readings for one symbol
pub struct RsiFeed<'a, E: Exchange> {
    exchange: &'a E,
    symbol: String,
    candle_limit: u32,
    period: usize,
}

impl<'a, E: Exchange> RsiFeed<'a, E> {
    pub fn new(exchange: &'a E, symbol: impl Into<String>, candle_limit: u32, period: usize) -> Self {
        Self {
            exchange,
            symbol: symbol.into(),
            candle_limit,
            period,
        }
    }

    /// Latest RSI on `interval`, or `DataUnavailable` if it cannot be computed
    pub async fn fetch_rsi(&self, interval: Interval) -> Result<f64, TradeError> {
        let candles = self
            .exchange
            .get_candles(&self.symbol, interval, self.candle_limit)
            .await
            .map_err(|e| {
                TradeError::DataUnavailable(format!(
                    "failed to fetch {} klines for {}: {}",
                    interval, self.symbol, e
                ))
            })?;

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let rsi = calculate_rsi(&closes, self.period).ok_or_else(|| {
            TradeError::DataUnavailable(format!(
                "RSI ({}) needs {} closes, got {}",
                interval,
                self.period + 1,
                closes.len()
            ))
        })?;

        tracing::debug!(
            symbol = %self.symbol,
            %interval,
            candles = closes.len(),
            rsi = %format!("{:.2}", rsi),
            "Computed RSI"
        );

        Ok(rsi)
    }

    /// Daily and weekly RSI, daily first
    pub async fn snapshot(&self) -> Result<RsiSnapshot, TradeError> {
        let daily = self.fetch_rsi(Interval::OneDay).await?;
        let weekly = self.fetch_rsi(Interval::OneWeek).await?;
        Ok(RsiSnapshot { daily, weekly })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeExchange;

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    fn falling(n: usize) -> Vec<f64> {
        (0..n).map(|i| 1000.0 - i as f64).collect()
    }

    #[tokio::test]
    async fn test_snapshot() {
        let exchange = FakeExchange::default()
            .with_candles(Interval::OneDay, &rising(100))
            .with_candles(Interval::OneWeek, &falling(100));
        let feed = RsiFeed::new(&exchange, "BTCUSDT", 100, 14);

        let snapshot = feed.snapshot().await.unwrap();
        assert_eq!(snapshot.daily, 100.0);
        assert_eq!(snapshot.weekly, 0.0);
    }

    #[tokio::test]
    async fn test_insufficient_history_is_data_unavailable() {
        let exchange = FakeExchange::default().with_candles(Interval::OneWeek, &rising(10));
        let feed = RsiFeed::new(&exchange, "BTCUSDT", 100, 14);

        let err = feed.fetch_rsi(Interval::OneWeek).await.unwrap_err();
        assert!(matches!(err, TradeError::DataUnavailable(_)));
        assert!(err.to_string().contains("needs 15 closes, got 10"));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_data_unavailable() {
        let exchange = FakeExchange::default();
        let feed = RsiFeed::new(&exchange, "BTCUSDT", 100, 14);

        let err = feed.fetch_rsi(Interval::OneDay).await.unwrap_err();
        assert!(matches!(err, TradeError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_respects_candle_limit() {
        // 50 falling closes followed by 20 rising ones: the last 20 are all gains
        let mut closes = falling(50);
        closes.extend((0..20).map(|i| 951.0 + i as f64));
        let exchange = FakeExchange::default().with_candles(Interval::OneDay, &closes);
        let feed = RsiFeed::new(&exchange, "BTCUSDT", 20, 14);

        assert_eq!(feed.fetch_rsi(Interval::OneDay).await.unwrap(), 100.0);
    }
}
