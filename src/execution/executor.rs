use super::sizing::{size_order, RoundingPolicy};
use crate::api::Exchange;
use crate::error::TradeError;
use crate::models::{AccountSummary, OrderConfirmation, TradingPair};
use crate::notify::Notifier;

/// Sizes, submits and reports market buys for one pair
///
/// Every failure is logged, announced and returned as a `TradeError`; no
/// retries happen here.
pub struct OrderExecutor<'a, E: Exchange, N: Notifier> {
    exchange: &'a E,
    notifier: &'a N,
    pair: TradingPair,
    rounding: RoundingPolicy,
    report_balances: bool,
}

impl<'a, E: Exchange, N: Notifier> OrderExecutor<'a, E, N> {
    pub fn new(exchange: &'a E, notifier: &'a N, pair: TradingPair) -> Self {
        Self {
            exchange,
            notifier,
            pair,
            rounding: RoundingPolicy::default(),
            report_balances: true,
        }
    }

    pub fn with_rounding(mut self, rounding: RoundingPolicy) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_balance_report(mut self, enabled: bool) -> Self {
        self.report_balances = enabled;
        self
    }

    /// Spend roughly `usdt_amount` of the quote asset on the base asset
    pub async fn buy(&self, usdt_amount: f64) -> Result<OrderConfirmation, TradeError> {
        let (result, price) = self.try_buy(usdt_amount).await;

        match &result {
            Ok(confirmation) => {
                let fill_price = confirmation.average_price().or(price).unwrap_or(0.0);
                let msg = format!(
                    "✅ Bought {} {} at ${:.2}",
                    confirmation.executed_qty, self.pair.base, fill_price
                );
                tracing::info!(
                    order_id = confirmation.order_id,
                    status = %confirmation.status,
                    "{}",
                    msg
                );
                self.notifier.send(&msg).await;
            }
            Err(e) => {
                let msg = format!("❌ Error while buying {}: {}", self.pair.base, e);
                tracing::error!("{}", msg);
                self.notifier.send(&msg).await;
            }
        }

        if self.report_balances {
            self.report_account().await;
        }

        result
    }

    /// Returns the quoted price alongside the outcome, when one was fetched
    async fn try_buy(&self, usdt_amount: f64) -> (Result<OrderConfirmation, TradeError>, Option<f64>) {
        let symbol = self.pair.symbol();

        match self.exchange.get_spot_price(&symbol).await {
            Ok(price) => (self.submit(&symbol, usdt_amount, price).await, Some(price)),
            Err(e) => (
                Err(TradeError::ExecutionFailure(format!("price lookup failed: {}", e))),
                None,
            ),
        }
    }

    async fn submit(
        &self,
        symbol: &str,
        usdt_amount: f64,
        price: f64,
    ) -> Result<OrderConfirmation, TradeError> {
        let lot = self
            .exchange
            .get_lot_size(symbol)
            .await
            .map_err(|e| TradeError::ExecutionFailure(format!("lot size lookup failed: {}", e)))?;

        let order = size_order(usdt_amount, price, &lot, self.rounding)?;
        tracing::info!(
            symbol,
            notional = usdt_amount,
            price,
            raw_quantity = order.raw_quantity,
            quantity = %order.quantity_str,
            min_qty = lot.min_qty,
            step_size = lot.step_size,
            rounding = %self.rounding,
            "Submitting market buy"
        );

        self.exchange
            .submit_market_buy(symbol, &order.quantity_str)
            .await
            .map_err(|e| TradeError::ExecutionFailure(e.to_string()))
    }

    /// Fetch holdings for the pair; never fails the caller
    pub async fn account_summary(&self) -> Option<AccountSummary> {
        match self.fetch_balances().await {
            Ok((base_balance, quote_balance, price)) if price > 0.0 => Some(AccountSummary {
                pair: self.pair.clone(),
                base_balance,
                quote_balance,
                price,
            }),
            Ok((_, _, price)) => {
                tracing::warn!(price, "Cannot value account at a non-positive price");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch account balances");
                None
            }
        }
    }

    /// (base balance, quote balance, spot price)
    async fn fetch_balances(&self) -> crate::Result<(f64, f64, f64)> {
        let base_balance = self.exchange.get_asset_balance(&self.pair.base).await?;
        let quote_balance = self.exchange.get_asset_balance(&self.pair.quote).await?;
        let price = self.exchange.get_spot_price(&self.pair.symbol()).await?;
        Ok((base_balance, quote_balance, price))
    }

    async fn report_account(&self) {
        if let Some(summary) = self.account_summary().await {
            let msg = summary.to_string();
            tracing::info!("{}", msg);
            self.notifier.send(&msg).await;
        }
    }
}
