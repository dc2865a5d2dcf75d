use super::executor::OrderExecutor;
use super::price_feed::RsiFeed;
use crate::api::Exchange;
use crate::config::TradingConfig;
use crate::error::TradeError;
use crate::models::{OrderConfirmation, RsiSnapshot};
use crate::notify::Notifier;
use crate::strategy::{decide, Decision};

/// What a single run ended with
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// RSI could not be computed; nothing was decided
    NoData(TradeError),
    /// Overbought on at least one timeframe
    Abstained(RsiSnapshot),
    Bought(OrderConfirmation),
    /// A buy was decided but did not go through
    OrderFailed(TradeError),
}

/// Runs fetch -> decide -> execute -> notify once, strictly in order
pub struct DecisionDriver<'a, E: Exchange, N: Notifier> {
    exchange: &'a E,
    notifier: &'a N,
    config: &'a TradingConfig,
}

impl<'a, E: Exchange, N: Notifier> DecisionDriver<'a, E, N> {
    pub fn new(exchange: &'a E, notifier: &'a N, config: &'a TradingConfig) -> Self {
        Self {
            exchange,
            notifier,
            config,
        }
    }

    pub async fn run(&self) -> RunOutcome {
        let symbol = self.config.pair.symbol();
        let feed = RsiFeed::new(
            self.exchange,
            symbol.as_str(),
            self.config.candle_limit,
            self.config.rsi_period,
        );

        let snapshot = match feed.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "Cannot compute RSI, skipping this run");
                self.notifier
                    .send(&format!("⚠️ RSI unavailable for {}: {}. Skipping buy.", symbol, e))
                    .await;
                return RunOutcome::NoData(e);
            }
        };

        self.announce(&format!(
            "📊 RSI (1D): {:.2}, RSI (1W): {:.2}",
            snapshot.daily, snapshot.weekly
        ))
        .await;

        let thresholds = &self.config.thresholds;
        match decide(&snapshot, self.config.trade_amount, thresholds) {
            Decision::Abstain => {
                self.announce("⛔ RSI condition not met. Skipping buy.").await;
                RunOutcome::Abstained(snapshot)
            }
            Decision::Buy { amount, oversold } => {
                self.announce(&format!(
                    "✅ RSI < {} on both timeframes.",
                    thresholds.overbought
                ))
                .await;
                if oversold {
                    self.announce(&format!("🔥 RSI daily < {} !", thresholds.oversold))
                        .await;
                }
                self.announce(&format!(
                    "💸 Buying {} for ${:.2}...",
                    self.config.pair.base, amount
                ))
                .await;

                let executor = OrderExecutor::new(self.exchange, self.notifier, self.config.pair.clone())
                    .with_rounding(self.config.rounding)
                    .with_balance_report(self.config.report_balances);

                match executor.buy(amount).await {
                    Ok(confirmation) => RunOutcome::Bought(confirmation),
                    Err(e) => RunOutcome::OrderFailed(e),
                }
            }
        }
    }

    async fn announce(&self, message: &str) {
        tracing::info!("{}", message);
        self.notifier.send(message).await;
    }
}
