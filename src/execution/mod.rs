// Order sizing, execution and the per-run decision driver
pub mod driver;
pub mod executor;
pub mod price_feed;
pub mod sizing;

pub use driver::{DecisionDriver, RunOutcome};
pub use executor::OrderExecutor;
pub use price_feed::RsiFeed;
pub use sizing::{format_quantity, quantize, size_order, RoundingPolicy, SizedOrder, UnknownRoundingPolicy};
