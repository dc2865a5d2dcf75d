use rsibot::api::BinanceClient;
use rsibot::config::Config;
use rsibot::execution::{DecisionDriver, RunOutcome};
use rsibot::notify::TelegramNotifier;
use rsibot::Result;
use tracing_subscriber::EnvFilter;

// One run per invocation; scheduling is left to cron or similar.
// Trade outcomes never change the exit code.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    tracing::info!("🚀 rsibot starting");

    let config = Config::from_env()?;
    log_configuration(&config);

    let exchange = BinanceClient::new(&config.exchange)?;
    if !exchange.has_credentials() {
        tracing::warn!("BINANCE_API_KEY/BINANCE_API_SECRET not set, orders will fail");
    }
    let notifier = TelegramNotifier::new(&config.telegram)?;

    let driver = DecisionDriver::new(&exchange, &notifier, &config.trading);
    match driver.run().await {
        RunOutcome::Bought(confirmation) => tracing::info!(
            order_id = confirmation.order_id,
            executed_qty = confirmation.executed_qty,
            "Run finished with a buy"
        ),
        RunOutcome::Abstained(snapshot) => tracing::info!(
            daily = snapshot.daily,
            weekly = snapshot.weekly,
            "Run finished without buying"
        ),
        RunOutcome::NoData(e) => tracing::warn!(error = %e, "Run finished without data"),
        RunOutcome::OrderFailed(e) => tracing::warn!(error = %e, "Run finished with a failed order"),
    }

    tracing::info!("👋 rsibot done");
    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rsibot=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn log_configuration(config: &Config) {
    let trading = &config.trading;
    tracing::info!("📊 Configuration:");
    tracing::info!("  Symbol: {}", trading.pair.symbol());
    tracing::info!("  Trade Amount: ${:.2}", trading.trade_amount);
    tracing::info!(
        "  RSI({}): overbought >= {}, oversold < {} (x{})",
        trading.rsi_period,
        trading.thresholds.overbought,
        trading.thresholds.oversold,
        trading.thresholds.oversold_multiplier
    );
    tracing::info!("  Rounding: {}", trading.rounding);
    tracing::info!("  Exchange: {}", config.exchange.base_url);
    tracing::info!(
        "  Telegram: {}",
        if config.telegram.bot_token.is_some() && config.telegram.chat_id.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
}
