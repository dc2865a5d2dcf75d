// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod execution;
pub mod indicators;
pub mod models;
pub mod notify;
pub mod strategy;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use api::Exchange;
pub use error::TradeError;
pub use models::*;
pub use notify::Notifier;

// Error handling
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
