// Best-effort alerting
pub mod telegram;

pub use telegram::TelegramNotifier;

/// Destination for human-readable alerts
///
/// Delivery is best-effort: implementations log failures and report them
/// through the return value only, never by erroring.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Returns `true` if the message was delivered
    async fn send(&self, message: &str) -> bool;
}
