// RSI accumulation rule: buy unless overbought, buy more when oversold
use crate::models::RsiSnapshot;
use anyhow::{ensure, Result};

/// Thresholds for the two-timeframe RSI rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiThresholds {
    /// Abstain when either timeframe is at or above this
    pub overbought: f64,
    /// Boost the notional when the daily RSI is below this
    pub oversold: f64,
    pub oversold_multiplier: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            overbought: 70.0,
            oversold: 30.0,
            oversold_multiplier: 2.0,
        }
    }
}

impl RsiThresholds {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=100.0).contains(&self.overbought) && (0.0..=100.0).contains(&self.oversold),
            "RSI thresholds must lie in [0, 100]"
        );
        ensure!(
            self.oversold < self.overbought,
            "RSI_OVERSOLD ({}) must be below RSI_OVERBOUGHT ({})",
            self.oversold,
            self.overbought
        );
        ensure!(
            self.oversold_multiplier.is_finite() && self.oversold_multiplier > 0.0,
            "OVERSOLD_MULTIPLIER must be positive"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Abstain,
    Buy { amount: f64, oversold: bool },
}

/// Decide whether, and how much, to buy this run
pub fn decide(snapshot: &RsiSnapshot, base_amount: f64, thresholds: &RsiThresholds) -> Decision {
    // NaN compares false everywhere, so reject it explicitly
    if !snapshot.daily.is_finite() || !snapshot.weekly.is_finite() {
        return Decision::Abstain;
    }

    if snapshot.daily >= thresholds.overbought || snapshot.weekly >= thresholds.overbought {
        return Decision::Abstain;
    }

    let oversold = snapshot.daily < thresholds.oversold;
    let amount = if oversold {
        base_amount * thresholds.oversold_multiplier
    } else {
        base_amount
    };

    Decision::Buy { amount, oversold }
}
