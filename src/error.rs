use thiserror::Error;

/// Failure taxonomy for a single bot run
///
/// Every variant is caught at the boundary of the component that produced it
/// and turned into a reported outcome; none of them abort the process.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TradeError {
    /// Candles could not be fetched or the RSI is undefined
    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    /// Quantized quantity fell below the exchange minimum
    #[error("order quantity {quantity} is below the exchange minimum {min_qty}")]
    InsufficientQuantity { quantity: f64, min_qty: f64 },

    /// Sizing inputs that can never produce a valid order
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Price lookup, submission or network failure
    #[error("order execution failed: {0}")]
    ExecutionFailure(String),

    #[error("notification failed: {0}")]
    NotificationFailure(String),
}
