//! Horizon account data integration
//!
//! - **Client** - async Horizon REST client implementing [`AccountDataProvider`]
//! - **Retry** - exponential backoff and timeout helpers
//!
//! [`AccountDataProvider`]: crate::provider::AccountDataProvider

pub mod client;
pub mod retry;

pub use client::HorizonClient;
pub use retry::{calculate_next_backoff, execute_with_timeout};
