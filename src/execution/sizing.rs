use crate::error::TradeError;
use crate::models::LotSize;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Decimal places kept on `notional / price` before quantization
const RAW_QUANTITY_DECIMALS: u32 = 7;
/// Decimal places kept on `quantity / step_size` before floor/ceil
const STEP_RATIO_DECIMALS: u32 = 8;

/// How a quantity is snapped onto the exchange step grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingPolicy {
    /// Never spend more than the requested notional
    #[default]
    Down,
    /// Always spend at least the requested notional (may exceed balance)
    Up,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rounding policy '{0}' (expected down or up)")]
pub struct UnknownRoundingPolicy(pub String);

impl FromStr for RoundingPolicy {
    type Err = UnknownRoundingPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "down" | "floor" => Ok(RoundingPolicy::Down),
            "up" | "ceil" => Ok(RoundingPolicy::Up),
            other => Err(UnknownRoundingPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingPolicy::Down => f.write_str("down"),
            RoundingPolicy::Up => f.write_str("up"),
        }
    }
}

/// A quantity ready for submission
#[derive(Debug, Clone, PartialEq)]
pub struct SizedOrder {
    /// `notional / price`, before quantization
    pub raw_quantity: f64,
    /// Snapped to the step grid
    pub quantity: f64,
    /// Exchange-ready string, no trailing zeros
    pub quantity_str: String,
    pub precision: u32,
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Decimal places of the step size itself (0.001 -> 3, 0.5 -> 1, 1 -> 0)
pub fn step_precision(step_size: f64) -> u32 {
    if !step_size.is_finite() || step_size <= 0.0 {
        return 0;
    }
    // f64 Display is the shortest round-tripping form, never exponent notation
    Decimal::from_str(&step_size.to_string())
        .map(|step| step.normalize().scale())
        .unwrap_or(0)
}

/// Snap a quantity onto the step grid
///
/// Idempotent: an already quantized quantity comes back unchanged under
/// either policy.
pub fn quantize(quantity: f64, step_size: f64, policy: RoundingPolicy) -> f64 {
    let steps = round_to(quantity / step_size, STEP_RATIO_DECIMALS);
    let steps = match policy {
        RoundingPolicy::Down => steps.floor(),
        RoundingPolicy::Up => steps.ceil(),
    };
    round_to(steps * step_size, step_precision(step_size))
}

/// Render a quantity with at most `precision` decimals and no trailing zeros
pub fn format_quantity(quantity: f64, precision: u32) -> String {
    let fixed = format!("{:.*}", precision as usize, quantity);
    match Decimal::from_str(&fixed) {
        Ok(value) => value.normalize().to_string(),
        Err(_) => fixed,
    }
}

/// Turn a notional amount into a valid order quantity for `lot`
pub fn size_order(
    usdt_amount: f64,
    current_price: f64,
    lot: &LotSize,
    policy: RoundingPolicy,
) -> Result<SizedOrder, TradeError> {
    if !usdt_amount.is_finite() || usdt_amount <= 0.0 {
        return Err(TradeError::InvalidOrder(format!(
            "notional must be positive, got {}",
            usdt_amount
        )));
    }
    if !current_price.is_finite() || current_price <= 0.0 {
        return Err(TradeError::InvalidOrder(format!(
            "price must be positive, got {}",
            current_price
        )));
    }
    if !lot.step_size.is_finite() || lot.step_size <= 0.0 {
        return Err(TradeError::InvalidOrder(format!(
            "step size must be positive, got {}",
            lot.step_size
        )));
    }

    let raw_quantity = round_to(usdt_amount / current_price, RAW_QUANTITY_DECIMALS);
    let precision = step_precision(lot.step_size);
    let quantity = quantize(raw_quantity, lot.step_size, policy);

    if quantity < round_to(lot.min_qty, precision) {
        return Err(TradeError::InsufficientQuantity {
            quantity,
            min_qty: lot.min_qty,
        });
    }

    Ok(SizedOrder {
        raw_quantity,
        quantity,
        quantity_str: format_quantity(quantity, precision),
        precision,
    })
}
